// ============================================
// File: crates/swapwire-transport/src/error.rs
// ============================================
//! # Transport Error Types
//!
//! ## Creation Reason
//! Errors of the peer room boundary.
//!
//! ## Main Functionality
//! - `TransportError`: Primary error enum for transport operations
//!
//! ## ⚠️ Important Note for Next Developer
//! - `Closed` ends a listener; anything else is logged and skipped
//!
//! ## Last Modified
//! v0.1.0 - Initial error definitions

use thiserror::Error;

// ============================================
// Result Type Alias
// ============================================

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

// ============================================
// TransportError
// ============================================

/// Transport layer error types.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Message exceeds the room's size limit.
    #[error("Message too large: max {max} bytes, got {actual}")]
    MessageTooLarge {
        /// Maximum allowed size
        max: usize,
        /// Actual size
        actual: usize,
    },

    /// Transport has been shut down.
    #[error("Transport is closed")]
    Closed,
}

// ============================================
// Tests
// ============================================
