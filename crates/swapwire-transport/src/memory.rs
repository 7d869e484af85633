// ============================================
// File: crates/swapwire-transport/src/memory.rs
// ============================================
//! # In-Memory Room
//!
//! ## Creation Reason
//! Lets several nodes share a room inside one process, for tests and
//! local runs, without any network or homeserver.
//!
//! ## Main Functionality
//! - `MemoryRoom`: the shared room; members join it
//! - `MemoryTransport`: one member's `PeerTransport` handle
//! - Capture of sent messages and injection of inbound ones
//!
//! ## Usage in Tests
//! ```
//! use swapwire_transport::{MemoryRoom, PeerTransport};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let room = MemoryRoom::new("swaps");
//! let maker = room.join("maker");
//! let taker = room.join("taker");
//!
//! taker.send("hello").await?;
//! assert_eq!(maker.recv().await?.body, "hello");
//! assert_eq!(taker.take_sent(), vec!["hello".to_string()]);
//! # Ok(())
//! # }
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Members do not receive their own messages
//! - Mailboxes are bounded; overflow drops the message for that member
//!
//! ## Last Modified
//! v0.1.0 - Initial in-memory room

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;
use tracing::{debug, warn};

use crate::error::{Result, TransportError};
use crate::traits::{InboundMessage, PeerTransport};

// ============================================
// Constants
// ============================================

/// Maximum number of messages queued per member.
const MAX_QUEUE_SIZE: usize = 1000;

/// Default maximum message size in bytes.
pub const DEFAULT_MAX_MESSAGE_BYTES: usize = 64 * 1024;

// ============================================
// Mailbox
// ============================================

#[derive(Debug)]
struct Mailbox {
    member: String,
    queue: Mutex<VecDeque<InboundMessage>>,
    notify: Notify,
    active: AtomicBool,
}

impl Mailbox {
    fn new(member: String) -> Self {
        Self {
            member,
            queue: Mutex::new(VecDeque::with_capacity(16)),
            notify: Notify::new(),
            active: AtomicBool::new(true),
        }
    }

    fn deliver(&self, message: InboundMessage) -> bool {
        let mut queue = self.queue.lock();
        if queue.len() >= MAX_QUEUE_SIZE {
            return false;
        }
        queue.push_back(message);
        drop(queue);
        self.notify.notify_one();
        true
    }
}

// ============================================
// MemoryRoom
// ============================================

/// A room shared by every [`MemoryTransport`] that joined it.
#[derive(Debug)]
pub struct MemoryRoom {
    name: String,
    max_message_bytes: usize,
    members: Mutex<Vec<Arc<Mailbox>>>,
}

impl MemoryRoom {
    /// Creates a room with the default message size limit.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Self::with_max_message_bytes(name, DEFAULT_MAX_MESSAGE_BYTES)
    }

    /// Creates a room with a custom message size limit.
    #[must_use]
    pub fn with_max_message_bytes(name: impl Into<String>, max_message_bytes: usize) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            max_message_bytes,
            members: Mutex::new(Vec::new()),
        })
    }

    /// Joins the room as `member`.
    #[must_use]
    pub fn join(self: &Arc<Self>, member: impl Into<String>) -> MemoryTransport {
        let mailbox = Arc::new(Mailbox::new(member.into()));
        self.members.lock().push(Arc::clone(&mailbox));
        debug!(room = %self.name, member = %mailbox.member, "Joined memory room");
        MemoryTransport {
            room: Arc::clone(self),
            mailbox,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Returns the room name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of active members.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members
            .lock()
            .iter()
            .filter(|m| m.active.load(Ordering::Acquire))
            .count()
    }

    fn broadcast(&self, from: &Mailbox, body: &str) {
        let members = self.members.lock();
        for member in members.iter() {
            if std::ptr::eq(member.as_ref(), from) || !member.active.load(Ordering::Acquire) {
                continue;
            }
            let message = InboundMessage::new(body).with_origin(from.member.clone());
            if !member.deliver(message) {
                warn!(
                    room = %self.name,
                    member = %member.member,
                    "Mailbox full, message dropped"
                );
            }
        }
    }
}

// ============================================
// MemoryTransport
// ============================================

/// One member's handle on a [`MemoryRoom`].
#[derive(Debug)]
pub struct MemoryTransport {
    room: Arc<MemoryRoom>,
    mailbox: Arc<Mailbox>,
    /// Messages this member sent (captured for verification)
    sent: Mutex<Vec<String>>,
}

impl MemoryTransport {
    /// Queues `body` as if another member had posted it.
    pub fn inject(&self, body: impl Into<String>) {
        if !self.mailbox.deliver(InboundMessage::new(body)) {
            warn!(member = %self.mailbox.member, "Mailbox full, injected message dropped");
        }
    }

    /// Takes all messages this member has sent. This clears the capture.
    #[must_use]
    pub fn take_sent(&self) -> Vec<String> {
        std::mem::take(&mut *self.sent.lock())
    }

    /// Returns the number of messages waiting to be received.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.mailbox.queue.lock().len()
    }

    /// Returns this member's name.
    #[must_use]
    pub fn member(&self) -> &str {
        &self.mailbox.member
    }
}

#[async_trait]
impl PeerTransport for MemoryTransport {
    async fn send(&self, message: &str) -> Result<()> {
        if !self.is_active() {
            return Err(TransportError::Closed);
        }
        if message.len() > self.room.max_message_bytes {
            return Err(TransportError::MessageTooLarge {
                max: self.room.max_message_bytes,
                actual: message.len(),
            });
        }
        self.room.broadcast(&self.mailbox, message);
        self.sent.lock().push(message.to_string());
        Ok(())
    }

    async fn recv(&self) -> Result<InboundMessage> {
        loop {
            {
                let mut queue = self.mailbox.queue.lock();
                if let Some(message) = queue.pop_front() {
                    return Ok(message);
                }
            }
            if !self.is_active() {
                return Err(TransportError::Closed);
            }

            // Wait for a delivery or shutdown
            self.mailbox.notify.notified().await;
        }
    }

    fn room(&self) -> &str {
        self.room.name()
    }

    async fn shutdown(&self) -> Result<()> {
        self.mailbox.active.store(false, Ordering::Release);
        self.mailbox.notify.notify_one();
        debug!(room = %self.room.name, member = %self.mailbox.member, "Left memory room");
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.mailbox.active.load(Ordering::Acquire)
    }
}

// ============================================
// Tests
// ============================================
