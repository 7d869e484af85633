// ============================================
// File: crates/swapwire-common/src/error.rs
// ============================================
//! # Common Error Types
//!
//! ## Creation Reason
//! Base error for identifier parsing and other shared operations,
//! wrapped by the error enums of the higher crates.
//!
//! ## Main Functionality
//! - `CommonError`: Base error enum
//! - `Result<T>`: Type alias using `CommonError`
//!
//! ## ⚠️ Important Note for Next Developer
//! - Never include key material or settlement details in error messages
//!
//! ## Last Modified
//! v0.1.0 - Initial error definitions

use thiserror::Error;

// ============================================
// Result Type Alias
// ============================================

/// Common result type for operations that may fail.
pub type Result<T> = std::result::Result<T, CommonError>;

// ============================================
// CommonError
// ============================================

/// Common error types shared across swapwire crates.
///
/// # Example
/// ```
/// use swapwire_common::error::CommonError;
/// use swapwire_common::InterfaceId;
///
/// let err = "AAAA".parse::<InterfaceId>().unwrap_err();
/// assert!(matches!(err, CommonError::InvalidLength { expected: 32, .. }));
/// ```
#[derive(Error, Debug)]
pub enum CommonError {
    /// Data length doesn't match expected size.
    #[error("Invalid length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Expected length in bytes
        expected: usize,
        /// Actual length received
        actual: usize,
    },

    /// Failed to decode/deserialize data.
    #[error("Decoding error: {context}")]
    Decoding {
        /// What was being decoded
        context: String,
        /// Error details
        details: String,
    },
}

impl CommonError {
    /// Creates a `Decoding` error.
    pub fn decoding(context: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Decoding {
            context: context.into(),
            details: details.into(),
        }
    }
}

// ============================================
// Error Conversions
// ============================================

impl From<base64::DecodeError> for CommonError {
    fn from(err: base64::DecodeError) -> Self {
        Self::decoding("base64 decode", err.to_string())
    }
}

impl From<uuid::Error> for CommonError {
    fn from(err: uuid::Error) -> Self {
        Self::decoding("uuid", err.to_string())
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CommonError::InvalidLength { expected: 32, actual: 16 };
        assert_eq!(err.to_string(), "Invalid length: expected 32, got 16");
    }

    #[test]
    fn test_uuid_error_conversion() {
        let err: CommonError = uuid::Uuid::parse_str("not-a-uuid").unwrap_err().into();
        assert!(matches!(err, CommonError::Decoding { ref context, .. } if context == "uuid"));
    }

    #[test]
    fn test_base64_error_conversion() {
        use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

        let err: CommonError = BASE64.decode("!!not base64!!").unwrap_err().into();
        assert!(matches!(err, CommonError::Decoding { .. }));
    }
}
