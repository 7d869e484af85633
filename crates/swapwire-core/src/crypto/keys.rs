// ============================================
// File: crates/swapwire-core/src/crypto/keys.rs
// ============================================
//! # Identity Key Types
//!
//! ## Creation Reason
//! Wraps RSA-2048 key material together with the interface id derived
//! from it, so the two can never drift apart.
//!
//! ## Main Functionality
//! - `KeyPair`: Own identity (sign, decrypt, export)
//! - `PublicKey`: Counterparty identity (verify, encrypt)
//! - `interface_id_of`: `SHA256(PKCS1(public key))`
//!
//! ## Key Lifecycle
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  KeyPair                                                   │
//! │  ├─ Generated once per offer/swap, or restored from store  │
//! │  ├─ Signs envelopes and announcements                      │
//! │  └─ Decrypts the symmetric key/IV addressed to it          │
//! │                                                            │
//! │  PublicKey                                                 │
//! │  ├─ Learned from an announcement or taker information      │
//! │  ├─ Verifies the counterparty's signatures                 │
//! │  └─ Encrypts the symmetric key/IV for the counterparty     │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - The interface id is computed from the re-encoded public key, never
//!   taken from caller input
//! - Private keys must never reach `Debug`, logs or error messages
//! - `rsa::RsaPrivateKey` zeroizes itself on drop; exported PKCS#1 bytes
//!   come back in a `Zeroizing` buffer
//!
//! ## Last Modified
//! v0.1.0 - Initial identity key types

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use rsa::pkcs1::{
    DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPrivateKey, EncodeRsaPublicKey,
};
use rsa::traits::PublicKeyParts;
use rsa::{Oaep, Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use swapwire_common::InterfaceId;

use super::{OAEP_MAX_PLAINTEXT, RSA_KEY_BITS};
use crate::error::{CoreError, Result};

/// Derives the interface id of a PKCS#1 DER encoded public key.
#[must_use]
pub fn interface_id_of(public_key_pkcs1: &[u8]) -> InterfaceId {
    InterfaceId::from_bytes(Sha256::digest(public_key_pkcs1).into())
}

// ============================================
// PublicKey
// ============================================

/// A party's RSA public key and the interface id derived from it.
///
/// Equality compares interface ids, which are a digest of the key.
#[derive(Clone)]
pub struct PublicKey {
    key: RsaPublicKey,
    pkcs1: Vec<u8>,
    interface_id: InterfaceId,
}

impl PublicKey {
    fn from_rsa(key: RsaPublicKey) -> Result<Self> {
        let pkcs1 = key
            .to_pkcs1_der()
            .map_err(|e| CoreError::invalid_key_material(format!("public key encoding: {e}")))?
            .as_bytes()
            .to_vec();
        let interface_id = interface_id_of(&pkcs1);
        Ok(Self {
            key,
            pkcs1,
            interface_id,
        })
    }

    /// Parses a PKCS#1 DER encoded RSA public key.
    ///
    /// # Errors
    /// Returns `InvalidKeyMaterial` if the bytes are not a PKCS#1 public key.
    pub fn from_pkcs1(bytes: &[u8]) -> Result<Self> {
        let key = RsaPublicKey::from_pkcs1_der(bytes)
            .map_err(|e| CoreError::invalid_key_material(format!("public key: {e}")))?;
        Self::from_rsa(key)
    }

    /// Returns the interface id.
    #[must_use]
    pub const fn interface_id(&self) -> &InterfaceId {
        &self.interface_id
    }

    /// Returns the PKCS#1 DER encoding.
    #[must_use]
    pub fn to_pkcs1(&self) -> &[u8] {
        &self.pkcs1
    }

    /// Returns the modulus size in bytes, which is also the signature size.
    #[must_use]
    pub fn size(&self) -> usize {
        self.key.size()
    }

    /// Verifies an RSA-PKCS1v15 signature over `SHA256(data)`.
    ///
    /// A signature that does not match yields `Ok(false)`.
    ///
    /// # Errors
    /// Returns `MalformedSignature` if the signature length does not match
    /// the key's modulus.
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> Result<bool> {
        let expected = self.key.size();
        if signature.len() != expected {
            return Err(CoreError::MalformedSignature {
                expected,
                actual: signature.len(),
            });
        }
        let hashed = Sha256::digest(data);
        Ok(self
            .key
            .verify(Pkcs1v15Sign::new::<Sha256>(), &hashed, signature)
            .is_ok())
    }

    /// Encrypts a short secret with RSA-OAEP (SHA-256, MGF1-SHA-256).
    ///
    /// # Errors
    /// - `PlaintextTooLarge` above [`OAEP_MAX_PLAINTEXT`] bytes
    /// - `Encryption` if the RSA operation fails
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        self.encrypt_with_rng(&mut OsRng, plaintext)
    }

    /// Same as [`encrypt`](Self::encrypt) with a caller-supplied RNG.
    ///
    /// # Errors
    /// See [`encrypt`](Self::encrypt).
    pub fn encrypt_with_rng<R>(&self, rng: &mut R, plaintext: &[u8]) -> Result<Vec<u8>>
    where
        R: CryptoRng + RngCore,
    {
        if plaintext.len() > OAEP_MAX_PLAINTEXT {
            return Err(CoreError::PlaintextTooLarge {
                max: OAEP_MAX_PLAINTEXT,
                actual: plaintext.len(),
            });
        }
        self.key
            .encrypt(rng, Oaep::new::<Sha256>(), plaintext)
            .map_err(|e| CoreError::encryption(format!("rsa-oaep: {e}")))
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.interface_id == other.interface_id
    }
}

impl Eq for PublicKey {}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("interface_id", &self.interface_id)
            .finish_non_exhaustive()
    }
}

impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&BASE64.encode(&self.pkcs1))
        } else {
            serializer.serialize_bytes(&self.pkcs1)
        }
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bytes = if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            BASE64.decode(&s).map_err(serde::de::Error::custom)?
        } else {
            <Vec<u8>>::deserialize(deserializer)?
        };
        Self::from_pkcs1(&bytes).map_err(serde::de::Error::custom)
    }
}

// ============================================
// KeyPair
// ============================================

/// An RSA-2048 identity this node can sign and decrypt with.
///
/// # Example
/// ```no_run
/// use swapwire_core::crypto::KeyPair;
///
/// let key_pair = KeyPair::generate().unwrap();
/// let signature = key_pair.sign(b"payload").unwrap();
/// assert!(key_pair.public_key().verify(b"payload", &signature).unwrap());
/// ```
#[derive(Clone)]
pub struct KeyPair {
    private: RsaPrivateKey,
    public: PublicKey,
}

impl KeyPair {
    /// Generates a fresh RSA-2048 key pair from the OS RNG.
    ///
    /// # Errors
    /// Returns `KeyGeneration` if the RSA backend fails.
    pub fn generate() -> Result<Self> {
        let private = RsaPrivateKey::new(&mut OsRng, RSA_KEY_BITS)
            .map_err(|e| CoreError::key_generation(format!("rsa-{RSA_KEY_BITS}: {e}")))?;
        let public = PublicKey::from_rsa(private.to_public_key())?;
        Ok(Self { private, public })
    }

    /// Rebuilds a key pair from stored PKCS#1 DER encodings.
    ///
    /// # Errors
    /// Returns `InvalidKeyMaterial` if either encoding is malformed or the
    /// two halves do not belong together.
    pub fn restore(public_key_pkcs1: &[u8], private_key_pkcs1: &[u8]) -> Result<Self> {
        let public = PublicKey::from_pkcs1(public_key_pkcs1)?;
        let private = RsaPrivateKey::from_pkcs1_der(private_key_pkcs1)
            .map_err(|e| CoreError::invalid_key_material(format!("private key: {e}")))?;
        if private.to_public_key() != public.key {
            return Err(CoreError::invalid_key_material(
                "private key does not match public key",
            ));
        }
        Ok(Self { private, public })
    }

    /// Returns the interface id.
    #[must_use]
    pub const fn interface_id(&self) -> &InterfaceId {
        self.public.interface_id()
    }

    /// Returns the public half.
    #[must_use]
    pub const fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// Returns the PKCS#1 DER encoding of the public key.
    #[must_use]
    pub fn public_key_pkcs1(&self) -> &[u8] {
        self.public.to_pkcs1()
    }

    /// Exports the PKCS#1 DER encoding of the private key for storage.
    ///
    /// # Errors
    /// Returns `InvalidKeyMaterial` if encoding fails.
    pub fn private_key_pkcs1(&self) -> Result<Zeroizing<Vec<u8>>> {
        let document = self
            .private
            .to_pkcs1_der()
            .map_err(|e| CoreError::invalid_key_material(format!("private key encoding: {e}")))?;
        Ok(Zeroizing::new(document.as_bytes().to_vec()))
    }

    /// Signs `SHA256(data)` with RSA-PKCS1v15.
    ///
    /// # Errors
    /// Returns `SignatureCreation` if the RSA backend fails.
    pub fn sign(&self, data: &[u8]) -> Result<Vec<u8>> {
        let hashed = Sha256::digest(data);
        self.private
            .sign(Pkcs1v15Sign::new::<Sha256>(), &hashed)
            .map_err(|e| CoreError::SignatureCreation {
                reason: e.to_string(),
            })
    }

    /// Verifies a signature against this key pair's public half.
    ///
    /// # Errors
    /// See [`PublicKey::verify`].
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> Result<bool> {
        self.public.verify(data, signature)
    }

    /// Encrypts to this key pair's own public half.
    ///
    /// # Errors
    /// See [`PublicKey::encrypt`].
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        self.public.encrypt(plaintext)
    }

    /// Decrypts an RSA-OAEP (SHA-256) ciphertext.
    ///
    /// # Errors
    /// Returns `Decryption` for any ciphertext not produced for this key.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.private
            .decrypt(Oaep::new::<Sha256>(), ciphertext)
            .map_err(|_| CoreError::Decryption)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print private key material
        f.debug_struct("KeyPair")
            .field("interface_id", self.interface_id())
            .finish_non_exhaustive()
    }
}

// ============================================
// Test Fixtures
// ============================================

/// Shared key pairs for unit tests; RSA generation is too slow to repeat.
#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::OnceLock;

    use super::KeyPair;

    static KEY_PAIRS: OnceLock<Vec<KeyPair>> = OnceLock::new();

    /// Returns the `index`-th shared key pair (0..3).
    pub(crate) fn key_pair(index: usize) -> &'static KeyPair {
        &KEY_PAIRS.get_or_init(|| {
            (0..3)
                .map(|_| KeyPair::generate().expect("rsa key generation"))
                .collect()
        })[index]
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::fixtures::key_pair;
    use super::*;

    #[test]
    fn test_interface_id_is_digest_of_pkcs1() {
        let kp = key_pair(0);
        let expected: [u8; 32] = Sha256::digest(kp.public_key_pkcs1()).into();
        assert_eq!(kp.interface_id().as_bytes(), &expected);
    }

    #[test]
    fn test_distinct_key_pairs() {
        assert_ne!(key_pair(0).interface_id(), key_pair(1).interface_id());
        assert_ne!(key_pair(0).public_key(), key_pair(1).public_key());
    }

    #[test]
    fn test_restore_preserves_identity() {
        let kp = key_pair(0);
        let private = kp.private_key_pkcs1().unwrap();
        let restored = KeyPair::restore(kp.public_key_pkcs1(), &private).unwrap();
        assert_eq!(restored.interface_id(), kp.interface_id());

        let signature = restored.sign(b"restored").unwrap();
        assert!(kp.verify(b"restored", &signature).unwrap());
    }

    #[test]
    fn test_restore_rejects_mismatched_halves() {
        let private = key_pair(1).private_key_pkcs1().unwrap();
        let err = KeyPair::restore(key_pair(0).public_key_pkcs1(), &private).unwrap_err();
        assert!(matches!(err, CoreError::InvalidKeyMaterial { .. }));
    }

    #[test]
    fn test_restore_rejects_garbage() {
        let kp = key_pair(0);
        assert!(KeyPair::restore(b"not der", b"not der").is_err());
        assert!(KeyPair::restore(kp.public_key_pkcs1(), b"not der").is_err());
        assert!(PublicKey::from_pkcs1(&[0x30, 0x03, 0x02, 0x01]).is_err());
    }

    #[test]
    fn test_sign_verify() {
        let kp = key_pair(0);
        let data = b"settlement payload";
        let signature = kp.sign(data).unwrap();

        assert_eq!(signature.len(), kp.public_key().size());
        assert!(kp.public_key().verify(data, &signature).unwrap());
    }

    #[test]
    fn test_verify_returns_false_on_tamper() {
        let kp = key_pair(0);
        let data = b"settlement payload".to_vec();
        let signature = kp.sign(&data).unwrap();

        let mut flipped_data = data.clone();
        flipped_data[3] ^= 0x01;
        assert!(!kp.verify(&flipped_data, &signature).unwrap());

        let mut flipped_sig = signature.clone();
        flipped_sig[100] ^= 0x80;
        assert!(!kp.verify(&data, &flipped_sig).unwrap());

        assert!(!key_pair(1).public_key().verify(&data, &signature).unwrap());
    }

    #[test]
    fn test_verify_rejects_malformed_signature() {
        let kp = key_pair(0);
        let err = kp.verify(b"data", &[0u8; 12]).unwrap_err();
        assert!(matches!(
            err,
            CoreError::MalformedSignature { expected: 256, actual: 12 }
        ));
    }

    #[test]
    fn test_asymmetric_roundtrip() {
        let kp = key_pair(0);
        let secret = [0x5Au8; 32];
        let ciphertext = kp.public_key().encrypt(&secret).unwrap();
        assert_eq!(kp.decrypt(&ciphertext).unwrap(), secret);

        // OAEP is randomized
        assert_ne!(kp.encrypt(&secret).unwrap(), ciphertext);
    }

    #[test]
    fn test_asymmetric_encrypt_with_seeded_rng() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let kp = key_pair(0);
        let secret = [0x17u8; 16];
        let first = kp.public_key().encrypt_with_rng(&mut StdRng::seed_from_u64(7), &secret).unwrap();
        let second = kp.public_key().encrypt_with_rng(&mut StdRng::seed_from_u64(7), &secret).unwrap();
        assert_eq!(first, second);
        assert_eq!(kp.decrypt(&first).unwrap(), secret);
    }

    #[test]
    fn test_asymmetric_wrong_key_fails() {
        let ciphertext = key_pair(0).encrypt(&[1u8; 16]).unwrap();
        assert!(matches!(
            key_pair(1).decrypt(&ciphertext),
            Err(CoreError::Decryption)
        ));
    }

    #[test]
    fn test_asymmetric_plaintext_limit() {
        let kp = key_pair(0);
        assert!(kp.encrypt(&[0u8; OAEP_MAX_PLAINTEXT]).is_ok());
        let err = kp.encrypt(&[0u8; OAEP_MAX_PLAINTEXT + 1]).unwrap_err();
        assert!(matches!(err, CoreError::PlaintextTooLarge { max: 190, actual: 191 }));
    }

    #[test]
    fn test_debug_hides_private_key() {
        let kp = key_pair(0);
        let debug = format!("{kp:?}");
        assert!(debug.starts_with("KeyPair"));
        assert!(!debug.contains("private"));
    }

    #[test]
    fn test_public_key_serialization() {
        let public = key_pair(2).public_key();
        let json = serde_json::to_string(public).unwrap();
        assert_eq!(json, format!("\"{}\"", BASE64.encode(public.to_pkcs1())));

        let restored: PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(&restored, public);
    }
}
