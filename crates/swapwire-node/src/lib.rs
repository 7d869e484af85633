// ============================================
// File: crates/swapwire-node/src/lib.rs
// ============================================
//! # Swapwire Node Library
//!
//! ## Creation Reason
//! Wires identity, peer messaging and swap state together into the
//! services a swap participant runs.
//!
//! ## Main Functionality
//!
//! ### Modules
//! - [`config`]: Node configuration management
//! - [`keystore`]: Persistent storage of key pairs and public keys
//! - [`services`]: Business logic services
//!   - [`services::key_manager`]: Key pair generation and lookup
//!   - [`services::p2p`]: Outbound senders and inbound dispatch loop
//!   - [`services::swap_controller`]: Single owner of every swap
//! - [`error`]: Node-specific error types
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Swapwire Node                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  ┌─────────────┐     ┌─────────────┐     ┌──────────────┐  │
//! │  │   Config    │────►│ P2pService  │────►│SwapController│  │
//! │  │             │     │  dispatch   │     │ (handler)    │  │
//! │  └─────────────┘     └──────┬──────┘     └──────┬───────┘  │
//! │                             │                   │          │
//! │                             ▼                   ▼          │
//! │                      ┌─────────────────────────────┐       │
//! │                      │      KeyManagerService      │       │
//! │                      │   (KeyStore: memory/file)   │       │
//! │                      └─────────────────────────────┘       │
//! ├─────────────────────────────────────────────────────────────┤
//! │                     Transport Layer                         │
//! │           PeerTransport (shared room of strings)            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Swap state is only mutated through `SwapController`
//! - A rejected peer message never stops the inbound loop
//!
//! ## Last Modified
//! v0.1.0 - Initial node library

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod keystore;
pub mod services;

// Re-export primary types
pub use config::NodeConfig;
pub use error::{NodeError, Result};
pub use keystore::{FileKeyStore, KeyStore, MemoryKeyStore, StoredKey};
pub use services::{
    ChainEvent, KeyManagerService, MessageHandler, P2pService, SwapController,
};
