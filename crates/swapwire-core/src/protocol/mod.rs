// ============================================
// File: crates/swapwire-core/src/protocol/mod.rs
// ============================================
//! # Protocol Module
//!
//! ## Creation Reason
//! Defines the off-chain messages swap counterparties exchange over the
//! shared peer room, and how they are sealed and authenticated.
//!
//! ## Main Functionality
//!
//! ### Submodules
//! - [`messages`]: Message types and their JSON payloads
//! - [`envelope`]: Encrypted and announcement envelopes, `Rejection`
//! - [`announcement`]: Public Key Announcement create/parse
//! - [`information`]: Taker and Maker Information create/parse
//!
//! ## Protocol Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Maker ─────── pka (signed, plaintext) ──────────► room     │
//! │                                                             │
//! │  Taker ─────── takerInfo (encrypted to maker) ───► Maker    │
//! │  Taker ◄────── makerInfo (encrypted to taker) ──── Maker    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format Principles
//! - UTF-8 JSON, binary values as standard Base64
//! - Creators are pure: inputs in, wire string out
//! - Parsers return `None` for anything that is not a valid message
//!
//! ## ⚠️ Important Note for Next Developer
//! - Literal field names and `msgType` values are shared with peers
//!   already deployed. Changing any of them breaks interop.
//!
//! ## Last Modified
//! v0.1.0 - Initial protocol definitions

pub mod announcement;
pub mod envelope;
pub mod information;
pub mod messages;

// Re-export primary types
pub use announcement::{
    create_public_key_announcement, decode_public_key_announcement, parse_public_key_announcement,
};
pub use envelope::{AnnouncementEnvelope, EncryptedEnvelope, EnvelopeCodec, Rejection};
pub use information::{
    create_maker_information_message, create_taker_information_message, open_maker_information,
    open_taker_information, parse_maker_information_message, parse_taker_information_message,
};
pub use messages::{
    MakerInformationMessage, MessageType, PublicKeyAnnouncement, TakerInformationMessage,
};
