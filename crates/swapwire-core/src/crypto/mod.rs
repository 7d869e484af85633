// ============================================
// File: crates/swapwire-core/src/crypto/mod.rs
// ============================================
//! # Cryptography Module
//!
//! ## Creation Reason
//! Centralizes the cryptographic primitives the settlement messages rely
//! on, using RustCrypto implementations throughout.
//!
//! ## Main Functionality
//!
//! ### Submodules
//! - [`keys`]: RSA identity (`KeyPair`, `PublicKey`) and interface id derivation
//! - [`symmetric`]: One-shot payload encryption (AES-256-CBC, PKCS#7)
//!
//! ## Cryptographic Design
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Identity                                 │
//! │   RSA-2048 public key ──► PKCS#1 DER ──► SHA-256 ──► id     │
//! │   sign:    PKCS#1 v1.5 over SHA-256(data)                   │
//! │   encrypt: OAEP, SHA-256 + MGF1-SHA-256, no label           │
//! └─────────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Payload                                  │
//! │   fresh 32-byte key + fresh 16-byte IV ──► AES-256-CBC      │
//! │   key and IV travel RSA-OAEP encrypted to the recipient     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - NEVER roll your own crypto
//! - CBC has no integrity of its own; the envelope signature covers the
//!   ciphertext. Do not use `SymmetricCipher` outside the envelope.
//! - OAEP input is capped at [`OAEP_MAX_PLAINTEXT`] bytes
//!
//! ## Last Modified
//! v0.1.0 - Initial crypto implementation

pub mod keys;
pub mod symmetric;

// Re-export primary types at module level
pub use keys::{interface_id_of, KeyPair, PublicKey};
pub use symmetric::{AesCbcCipher, SymmetricCipher, SymmetricKey, SymmetricallyEncryptedData};

// ============================================
// Constants
// ============================================

/// RSA modulus size in bits for generated identities.
pub const RSA_KEY_BITS: usize = 2048;

/// RSA-2048 signature size in bytes.
pub const RSA_SIGNATURE_SIZE: usize = RSA_KEY_BITS / 8;

/// Largest plaintext RSA-2048 OAEP/SHA-256 accepts (256 - 2 * 32 - 2).
pub const OAEP_MAX_PLAINTEXT: usize = 190;

/// Size of an AES-256 key in bytes.
pub const AES_KEY_SIZE: usize = 32;

/// Size of an AES block, and therefore of the CBC IV, in bytes.
pub const AES_IV_SIZE: usize = 16;
