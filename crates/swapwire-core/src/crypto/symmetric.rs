// ============================================
// File: crates/swapwire-core/src/crypto/symmetric.rs
// ============================================
//! # Payload Encryption
//!
//! ## Creation Reason
//! Encrypts the JSON payload of a hybrid envelope under a one-time key.
//!
//! ## Main Functionality
//! - `SymmetricKey`: 32-byte AES-256 key, zeroed on drop
//! - `SymmetricallyEncryptedData`: ciphertext with the IV it was made under
//! - `SymmetricCipher`: Trait for payload encryption/decryption
//! - `AesCbcCipher`: AES-256-CBC with PKCS#7 padding
//!
//! ## Data Format
//! ```text
//! ┌──────────────────────────────┐
//! │ IV (16 bytes, random)        │ ← travels RSA-encrypted as "encryptedIV"
//! ├──────────────────────────────┤
//! │ Ciphertext (n * 16 bytes)    │ ← travels as "payload"
//! └──────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - A fresh key AND a fresh IV for every message
//! - The ciphertext and its IV must stay paired
//!
//! ## Last Modified
//! v0.1.0 - Initial payload cipher

use std::fmt;

use aes::Aes256;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{AES_IV_SIZE, AES_KEY_SIZE};
use crate::error::{CoreError, Result};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

// ============================================
// SymmetricKey
// ============================================

/// One-time AES-256 key for a single envelope.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey([u8; AES_KEY_SIZE]);

impl SymmetricKey {
    /// Generates a random key from the OS RNG.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; AES_KEY_SIZE];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Rebuilds a key from decrypted bytes.
    ///
    /// # Errors
    /// Returns `InvalidKeyMaterial` unless exactly 32 bytes are given.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let array: [u8; AES_KEY_SIZE] = bytes.try_into().map_err(|_| {
            CoreError::invalid_key_material(format!(
                "symmetric key must be {AES_KEY_SIZE} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(array))
    }

    /// Returns the raw key bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; AES_KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymmetricKey([REDACTED])")
    }
}

impl PartialEq for SymmetricKey {
    fn eq(&self, other: &Self) -> bool {
        use subtle::ConstantTimeEq;
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for SymmetricKey {}

// ============================================
// SymmetricallyEncryptedData
// ============================================

/// A ciphertext and the IV it was produced with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymmetricallyEncryptedData {
    /// AES-CBC ciphertext, a whole number of blocks
    pub ciphertext: Vec<u8>,
    /// Initialization vector
    pub iv: [u8; AES_IV_SIZE],
}

// ============================================
// SymmetricCipher Trait
// ============================================

/// Payload cipher used by the envelope codec.
///
/// Abstracted so the codec can be exercised with a deterministic cipher.
pub trait SymmetricCipher: Send + Sync {
    /// Encrypts `plaintext` under `key` with a fresh random IV.
    ///
    /// # Errors
    /// - `Encryption`: if the cipher cannot be initialized
    fn encrypt(&self, key: &SymmetricKey, plaintext: &[u8]) -> Result<SymmetricallyEncryptedData>;

    /// Decrypts `data` under `key`.
    ///
    /// # Errors
    /// - `Decryption`: wrong key or IV, truncated or corrupted ciphertext
    fn decrypt(&self, key: &SymmetricKey, data: &SymmetricallyEncryptedData) -> Result<Vec<u8>>;
}

// ============================================
// AesCbcCipher
// ============================================

/// AES-256-CBC with PKCS#7 padding.
#[derive(Debug, Default, Clone, Copy)]
pub struct AesCbcCipher;

impl AesCbcCipher {
    /// Creates a new instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Encrypts under an explicit IV.
    ///
    /// # Errors
    /// - `Encryption`: if the cipher cannot be initialized
    pub fn encrypt_with_iv(
        &self,
        key: &SymmetricKey,
        iv: [u8; AES_IV_SIZE],
        plaintext: &[u8],
    ) -> Result<SymmetricallyEncryptedData> {
        let cipher = Aes256CbcEnc::new_from_slices(key.as_bytes(), &iv)
            .map_err(|_| CoreError::encryption("aes-256-cbc key/iv length"))?;
        Ok(SymmetricallyEncryptedData {
            ciphertext: cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext),
            iv,
        })
    }
}

impl SymmetricCipher for AesCbcCipher {
    fn encrypt(&self, key: &SymmetricKey, plaintext: &[u8]) -> Result<SymmetricallyEncryptedData> {
        let mut iv = [0u8; AES_IV_SIZE];
        OsRng.fill_bytes(&mut iv);
        self.encrypt_with_iv(key, iv, plaintext)
    }

    fn decrypt(&self, key: &SymmetricKey, data: &SymmetricallyEncryptedData) -> Result<Vec<u8>> {
        let cipher = Aes256CbcDec::new_from_slices(key.as_bytes(), &data.iv)
            .map_err(|_| CoreError::Decryption)?;
        cipher
            .decrypt_padded_vec_mut::<Pkcs7>(&data.ciphertext)
            .map_err(|_| CoreError::Decryption)
    }
}

// ============================================
// Tests
// ============================================
