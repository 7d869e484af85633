// ============================================
// File: crates/swapwire-transport/src/lib.rs
// ============================================
//! # Swapwire Transport - Peer Room I/O
//!
//! ## Creation Reason
//! Swap counterparties talk through a shared room (topic) that carries
//! opaque wire strings. This crate defines that boundary and an
//! in-process room for tests and local runs.
//!
//! ## Main Functionality
//!
//! ### Modules
//! - [`traits`]: `PeerTransport` trait and `InboundMessage`
//! - [`memory`]: `MemoryRoom` / `MemoryTransport`
//! - [`error`]: Transport-specific error types
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              swapwire-node                          │
//! │                    │                                │
//! │         ┌──────────┴──────────┐                     │
//! │         ▼                     ▼                     │
//! │   swapwire-core       swapwire-transport            │
//! │         │             You are here ◄──              │
//! │         ▼                                           │
//! │   swapwire-common                                   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - The transport never interprets message contents
//! - Always program against `PeerTransport` for testability
//!
//! ## Last Modified
//! v0.1.0 - Initial transport layer implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{Result, TransportError};
pub use memory::{MemoryRoom, MemoryTransport};
pub use traits::{InboundMessage, PeerTransport};
