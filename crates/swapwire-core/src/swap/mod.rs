// ============================================
// File: crates/swapwire-core/src/swap/mod.rs
// ============================================
//! # Swap Module
//!
//! ## Creation Reason
//! The swap aggregate and the guards checked before this node emits a
//! state-changing transaction.
//!
//! ### Submodules
//! - [`model`]: `Swap`, `SwapRole`, `SwapState`, `ActionState`, `SwapAction`
//! - [`validation`]: The four validators and `SwapDataValidationError`
//!
//! ## Last Modified
//! v0.1.0 - Initial swap module

pub mod model;
pub mod validation;

pub use model::{ActionState, Swap, SwapAction, SwapRole, SwapState};
pub use validation::{
    validate_swap_for, validate_swap_for_closing, validate_swap_for_filling,
    validate_swap_for_reporting_payment_received, validate_swap_for_reporting_payment_sent,
    SwapDataValidationError,
};
