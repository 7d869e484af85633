// ============================================
// File: crates/swapwire-node/src/services/mod.rs
// ============================================
//! # Node Services
//!
//! ## Creation Reason
//! Business logic for a swap participant, separated from the wire
//! formats in `swapwire-core` and the room in `swapwire-transport`.
//!
//! ## Main Functionality
//!
//! ### Submodules
//! - [`key_manager`]: Key pair generation, storage and lookup
//! - [`p2p`]: Outbound message senders and the inbound dispatch loop
//! - [`swap_controller`]: Swap ownership, action transitions, peer and
//!   chain event handling
//!
//! ## Service Interactions
//! 1. `P2pService` resolves recipient/sender keys via `KeyManagerService`
//! 2. Accepted messages go to a `MessageHandler` (normally `SwapController`)
//! 3. `SwapController` answers through `P2pService`
//!
//! ## ⚠️ Important Note for Next Developer
//! - All services are Send + Sync and shared through `Arc`
//! - Never hold a swap lock across an `.await`
//!
//! ## Last Modified
//! v0.1.0 - Initial services structure

pub mod key_manager;
pub mod p2p;
pub mod swap_controller;

// Re-export primary types
pub use key_manager::KeyManagerService;
pub use p2p::{InboundPeerMessage, MessageHandler, P2pService};
pub use swap_controller::{ChainEvent, SwapController};
