// ============================================
// File: crates/swapwire-core/src/lib.rs
// ============================================
//! # Swapwire Core - Identity, Envelopes & Swap Guards
//!
//! ## Creation Reason
//! Holds everything a settlement node needs to authenticate and decrypt
//! peer messages, and to decide whether a swap action may start. Nothing
//! in here performs I/O.
//!
//! ## Main Functionality
//!
//! ### Crypto Module ([`crypto`])
//! - `KeyPair` / `PublicKey`: RSA-2048 identity with derived interface id
//! - `SymmetricCipher`: AES-256-CBC with a fresh IV per call
//!
//! ### Protocol Module ([`protocol`])
//! - Hybrid envelope codec (encrypted and announcement forms)
//! - Public Key Announcement, Taker Information, Maker Information
//!
//! ### Swap Module ([`swap`])
//! - Swap aggregate, roles, phases and per-action sub-states
//! - Validators for fill, close, report-payment-sent, report-payment-received
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              swapwire-node                          │
//! │                    │                                │
//! │         ┌──────────┴──────────┐                     │
//! │         ▼                     ▼                     │
//! │   swapwire-core  ◄──    swapwire-transport          │
//! │   You are here                │                     │
//! │         │                     │                     │
//! │         └──────────┬──────────┘                     │
//! │                    ▼                                │
//! │             swapwire-common                         │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - ALL cryptographic code uses RustCrypto implementations
//! - Wire field names and `msgType` literals are fixed by deployed peers
//! - Parsers return `None` for anything that is not a valid message;
//!   never turn inbound garbage into an error that stops a listener
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod crypto;
pub mod error;
pub mod protocol;
pub mod swap;

// Re-export commonly used items
pub use crypto::{AesCbcCipher, KeyPair, PublicKey, SymmetricCipher, SymmetricKey};
pub use error::{CoreError, Result};
pub use protocol::{
    MakerInformationMessage, MessageType, PublicKeyAnnouncement, TakerInformationMessage,
};
pub use swap::{ActionState, Swap, SwapAction, SwapDataValidationError, SwapRole, SwapState};
