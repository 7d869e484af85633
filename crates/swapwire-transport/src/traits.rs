// ============================================
// File: crates/swapwire-transport/src/traits.rs
// ============================================
//! # Transport Traits
//!
//! ## Creation Reason
//! Defines the peer room boundary so the message layer can be tested
//! without a real network.
//!
//! ## Main Functionality
//! - `PeerTransport`: send/receive wire strings on one room
//! - `InboundMessage`: a received string and where it came from
//!
//! ## ⚠️ Important Note for Next Developer
//! - Implementations must be Send + Sync for use in async contexts
//! - `recv` is called from a single listener task
//!
//! ## Last Modified
//! v0.1.0 - Initial trait definitions

use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::error::Result;

// ============================================
// InboundMessage
// ============================================

/// A wire string received from the room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// The raw wire string
    pub body: String,
    /// Transport-level name of the member that posted it, if known
    pub origin: Option<String>,
    /// When the message was received
    pub received_at: Instant,
}

impl InboundMessage {
    /// Creates an inbound message received now.
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            origin: None,
            received_at: Instant::now(),
        }
    }

    /// Sets the origin.
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Returns the time since this message was received.
    #[must_use]
    pub fn age(&self) -> Duration {
        self.received_at.elapsed()
    }
}

// ============================================
// PeerTransport Trait
// ============================================

/// A shared room carrying opaque wire strings between swap parties.
///
/// # Example
/// ```ignore
/// async fn drain<T: PeerTransport>(transport: &T) -> Result<()> {
///     loop {
///         let message = transport.recv().await?;
///         handle(&message.body);
///     }
/// }
/// ```
#[async_trait]
pub trait PeerTransport: Send + Sync {
    /// Posts a wire string to the room.
    ///
    /// # Errors
    /// - `MessageTooLarge` above the room limit
    /// - `Closed` after shutdown
    async fn send(&self, message: &str) -> Result<()>;

    /// Waits for the next wire string posted by another member.
    ///
    /// # Errors
    /// `Closed` once the transport is shut down.
    async fn recv(&self) -> Result<InboundMessage>;

    /// Returns the room name.
    fn room(&self) -> &str;

    /// Shuts the transport down, waking a pending `recv`.
    ///
    /// # Errors
    /// Returns error if shutdown fails
    async fn shutdown(&self) -> Result<()>;

    /// Returns `true` if the transport is still active.
    fn is_active(&self) -> bool;
}

// ============================================
// Tests
// ============================================
