// ============================================
// File: crates/swapwire-core/src/error.rs
// ============================================
//! # Core Error Types
//!
//! ## Creation Reason
//! Error type for key handling, envelope sealing and message creation
//! in the swapwire core crate.
//!
//! ## Main Functionality
//! - `CoreError`: Primary error enum for core operations
//! - `Result<T>`: Type alias using `CoreError`
//!
//! ## Error Categories
//! 1. **Crypto Errors**: Key generation/import, signing, encryption
//! 2. **Message Errors**: Serialization, oversized plaintext
//!
//! ## ⚠️ Important Note for Next Developer
//! - NEVER include key material or settlement details in error messages
//! - Inbound parsing does not use this type; parsers yield `Option`.
//!   See `protocol::envelope::Rejection` for the internal reasons.
//!
//! ## Last Modified
//! v0.1.0 - Initial error definitions

use thiserror::Error;

// ============================================
// Result Type Alias
// ============================================

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

// ============================================
// CoreError
// ============================================

/// Core error types for cryptographic and message operations.
#[derive(Error, Debug)]
pub enum CoreError {
    // ========================================
    // Cryptographic Errors
    // ========================================

    /// Failed to generate cryptographic key.
    #[error("Key generation failed: {context}")]
    KeyGeneration {
        /// What key was being generated
        context: String,
    },

    /// Key bytes could not be decoded or do not belong together.
    #[error("Invalid key material: {reason}")]
    InvalidKeyMaterial {
        /// What was wrong with the key
        reason: String,
    },

    /// Signature creation failed.
    #[error("Failed to create signature: {reason}")]
    SignatureCreation {
        /// Why signing failed
        reason: String,
    },

    /// Signature has the wrong length for the verifying key.
    #[error("Malformed signature: expected {expected} bytes, got {actual}")]
    MalformedSignature {
        /// Modulus size of the verifying key
        expected: usize,
        /// Length of the supplied signature
        actual: usize,
    },

    /// Encryption operation failed.
    #[error("Encryption failed: {context}")]
    Encryption {
        /// What was being encrypted
        context: String,
    },

    /// Decryption operation failed (wrong key, bad padding or truncated input).
    #[error("Decryption failed")]
    Decryption,

    /// Plaintext exceeds what the asymmetric cipher accepts.
    #[error("Plaintext too large: max {max} bytes, got {actual}")]
    PlaintextTooLarge {
        /// Maximum accepted size
        max: usize,
        /// Actual size
        actual: usize,
    },

    // ========================================
    // Message Errors
    // ========================================

    /// Message could not be built or serialized.
    #[error("Malformed message: {reason}")]
    MalformedMessage {
        /// What's wrong with the message
        reason: String,
    },
}

impl CoreError {
    // ========================================
    // Convenience Constructors
    // ========================================

    /// Creates a `KeyGeneration` error.
    pub fn key_generation(context: impl Into<String>) -> Self {
        Self::KeyGeneration {
            context: context.into(),
        }
    }

    /// Creates an `InvalidKeyMaterial` error.
    pub fn invalid_key_material(reason: impl Into<String>) -> Self {
        Self::InvalidKeyMaterial {
            reason: reason.into(),
        }
    }

    /// Creates an `Encryption` error.
    pub fn encryption(context: impl Into<String>) -> Self {
        Self::Encryption {
            context: context.into(),
        }
    }

    /// Creates a `MalformedMessage` error.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedMessage {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::malformed(format!("json: {err}"))
    }
}

// ============================================
// Tests
// ============================================
