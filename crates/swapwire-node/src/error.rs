// ============================================
// File: crates/swapwire-node/src/error.rs
// ============================================
//! # Node Error Types
//!
//! ## Last Modified
//! v0.1.0 - Initial node errors

use thiserror::Error;

use swapwire_common::{InterfaceId, SwapId};
use swapwire_core::error::CoreError;
use swapwire_core::swap::{SwapDataValidationError, SwapState};
use swapwire_transport::error::TransportError;

/// Result type for node operations.
pub type Result<T> = std::result::Result<T, NodeError>;

/// Node error types.
#[derive(Error, Debug)]
#[allow(missing_docs)]
pub enum NodeError {
    #[error("Failed to load configuration from '{path}': {reason}")]
    ConfigLoad { path: String, reason: String },

    #[error("Invalid configuration: {field} - {reason}")]
    ConfigInvalid { field: String, reason: String },

    #[error("Key store error at '{path}': {reason}")]
    KeyStore { path: String, reason: String },

    #[error("Key pair not found: {0}")]
    KeyPairNotFound(InterfaceId),

    #[error("Public key not found: {0}")]
    PublicKeyNotFound(InterfaceId),

    #[error("Swap not found: {0}")]
    SwapNotFound(SwapId),

    #[error("Swap {swap_id} already exists")]
    SwapExists { swap_id: SwapId },

    #[error("Swap {swap_id} cannot {operation} in state {state}")]
    InvalidSwapState {
        swap_id: SwapId,
        state: SwapState,
        operation: &'static str,
    },

    #[error("Swap {swap_id}: {reason}")]
    CounterpartyMismatch { swap_id: SwapId, reason: String },

    #[error("Swap {0} has no settlement details of ours to send")]
    MissingSettlementDetails(SwapId),

    #[error(transparent)]
    Validation(#[from] SwapDataValidationError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl NodeError {
    /// Creates a `ConfigLoad` error.
    pub fn config_load(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a `ConfigInvalid` error.
    pub fn config_invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a `KeyStore` error.
    pub fn key_store(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::KeyStore {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a `CounterpartyMismatch` error.
    pub fn counterparty_mismatch(swap_id: SwapId, reason: impl Into<String>) -> Self {
        Self::CounterpartyMismatch {
            swap_id,
            reason: reason.into(),
        }
    }

    /// Checks if the error is something the user can see and act on.
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::InvalidSwapState { .. })
    }
}
