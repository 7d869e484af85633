// ============================================
// File: crates/swapwire-common/src/lib.rs
// ============================================
//! # Swapwire Common - Shared Identifiers
//!
//! ## Creation Reason
//! Holds the identifier types every other swapwire crate passes around,
//! so that wire encodings of ids live in exactly one place.
//!
//! ## Main Functionality
//! - [`types`]: `InterfaceId`, `OfferId`, `SwapId`
//! - [`error`]: Common error type and result alias
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              swapwire-node                          │
//! │                    │                                │
//! │         ┌──────────┴──────────┐                     │
//! │         ▼                     ▼                     │
//! │   swapwire-core       swapwire-transport            │
//! │         │                     │                     │
//! │         └──────────┬──────────┘                     │
//! │                    ▼                                │
//! │             swapwire-common  ◄── You are here       │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Wire encodings are fixed by existing counterparties. Do not change
//!   how `OfferId` or `SwapId` render without checking both message types.
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod types;

pub use error::{CommonError, Result};
pub use types::{InterfaceId, OfferId, SwapId};
