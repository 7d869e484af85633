// ============================================
// File: crates/swapwire-core/src/protocol/envelope.rs
// ============================================
//! # Envelope Codec
//!
//! ## Creation Reason
//! Builds and opens the two JSON envelopes every peer message travels in.
//!
//! ## Main Functionality
//! - `EncryptedEnvelope`: hybrid envelope for taker/maker information
//! - `AnnouncementEnvelope`: signed plaintext envelope for announcements
//! - `EnvelopeCodec`: seal/open over a pluggable `SymmetricCipher`
//! - `Rejection`: why an inbound string was not accepted
//!
//! ## Wire Format
//! ```text
//! encrypted:    {"sender","recipient","encryptedKey","encryptedIV","payload","signature"}
//! announcement: {"sender","msgType","payload","signature"}
//! ```
//! Every value is a Base64 string except `msgType`.
//!
//! ## Opening Strategy
//! 1. `recipient` must be the local interface id
//! 2. RSA-OAEP decrypt `encryptedKey` and `encryptedIV`
//! 3. AES-CBC decrypt `payload`
//! 4. Caller inspects the JSON, then calls [`OpenedEnvelope::authenticate`]
//!    with the sender key it expects: `sender` must match it and the
//!    signature must cover SHA-256 of the ciphertext
//!
//! ## ⚠️ Important Note for Next Developer
//! - Encrypted envelopes sign SHA-256(ciphertext); announcements sign
//!   SHA-256(plaintext payload). Both are relied on by deployed peers.
//! - A `Rejection` is never an error for the listener. Log it and move on.
//!
//! ## Last Modified
//! v0.1.0 - Initial envelope codec

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, trace};
use zeroize::Zeroizing;

use swapwire_common::InterfaceId;

use crate::crypto::{
    AesCbcCipher, KeyPair, PublicKey, SymmetricCipher, SymmetricKey, SymmetricallyEncryptedData,
    AES_IV_SIZE,
};
use crate::error::{CoreError, Result};

use super::messages::MessageType;

// ============================================
// Rejection
// ============================================

/// Reason an inbound string was not accepted as a given message type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Not JSON, or missing/ill-typed fields.
    #[error("malformed json in {0}")]
    Json(&'static str),

    /// JSON of another message type.
    #[error("message type mismatch: expected {expected}, got {actual}")]
    WrongMessageType {
        /// Type the parser was looking for
        expected: MessageType,
        /// `msgType` value found
        actual: MessageType,
    },

    /// A field that must be Base64 is not.
    #[error("invalid base64 in '{0}'")]
    Base64(&'static str),

    /// `recipient` is not the local interface id.
    #[error("not addressed to this key pair")]
    NotAddressedToUs,

    /// `encryptedKey` or `encryptedIV` could not be decrypted to a key/IV.
    #[error("could not recover symmetric key material")]
    KeyMaterial,

    /// Payload did not decrypt under the recovered key and IV.
    #[error("payload decryption failed")]
    PayloadDecryption,

    /// Embedded public key is not PKCS#1.
    #[error("invalid embedded public key")]
    InvalidPublicKey,

    /// `sender` does not match the expected key's interface id.
    #[error("sender does not match signing key")]
    SenderMismatch,

    /// Signature has the wrong length or does not verify.
    #[error("signature verification failed")]
    BadSignature,

    /// An offer or swap id did not parse.
    #[error("invalid identifier in '{0}'")]
    InvalidIdentifier(&'static str),
}

impl Rejection {
    /// Checks if this only means the string was some other message.
    ///
    /// Those are routine on a shared room and logged at `trace` only.
    #[must_use]
    pub const fn is_routine(&self) -> bool {
        matches!(
            self,
            Self::Json(_) | Self::WrongMessageType { .. } | Self::NotAddressedToUs
        )
    }

    /// Logs this rejection for the given message type.
    pub fn log(&self, message_type: MessageType) {
        if self.is_routine() {
            trace!(msg_type = %message_type, reason = %self, "Message rejected");
        } else {
            debug!(msg_type = %message_type, reason = %self, "Message rejected");
        }
    }
}

/// Result of one parsing step.
pub type ParseResult<T> = std::result::Result<T, Rejection>;

pub(crate) fn decode_base64(field: &'static str, value: &str) -> ParseResult<Vec<u8>> {
    BASE64.decode(value).map_err(|_| Rejection::Base64(field))
}

/// Decodes a Base64 interface id field and compares it with `expected`.
pub(crate) fn interface_id_matches(
    field: &'static str,
    value: &str,
    expected: &InterfaceId,
) -> ParseResult<bool> {
    let bytes = decode_base64(field, value)?;
    Ok(bytes.as_slice() == expected.as_bytes())
}

/// Verifies `signature` (Base64) from `signer` over SHA-256 of `signed`.
pub(crate) fn verify_digest_signature(
    signer: &PublicKey,
    signed: &[u8],
    signature: &str,
) -> ParseResult<()> {
    let signature = decode_base64("signature", signature)?;
    match signer.verify(&Sha256::digest(signed), &signature) {
        Ok(true) => Ok(()),
        Ok(false) | Err(_) => Err(Rejection::BadSignature),
    }
}

/// Signs SHA-256 of `data`.
pub(crate) fn sign_digest(key_pair: &KeyPair, data: &[u8]) -> Result<Vec<u8>> {
    key_pair.sign(&Sha256::digest(data))
}

// ============================================
// Envelopes
// ============================================

/// Wire form of a hybrid-encrypted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedEnvelope {
    /// Base64 interface id of the author
    pub sender: String,
    /// Base64 interface id of the reader
    pub recipient: String,
    /// RSA-OAEP encrypted AES key
    pub encrypted_key: String,
    /// RSA-OAEP encrypted IV
    #[serde(rename = "encryptedIV")]
    pub encrypted_iv: String,
    /// AES-CBC ciphertext of the JSON payload
    pub payload: String,
    /// Signature over SHA-256 of the ciphertext
    pub signature: String,
}

impl EncryptedEnvelope {
    /// Parses the JSON shape without authenticating anything.
    ///
    /// # Errors
    /// `Rejection::Json` if the string is not an encrypted envelope.
    pub fn from_wire(wire: &str) -> ParseResult<Self> {
        serde_json::from_str(wire).map_err(|_| Rejection::Json("encrypted envelope"))
    }

    /// Serializes to the wire string.
    ///
    /// # Errors
    /// Returns `MalformedMessage` if serialization fails.
    pub fn to_wire(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes the `recipient` field, if it is a well-formed interface id.
    #[must_use]
    pub fn recipient_id(&self) -> Option<InterfaceId> {
        self.recipient.parse().ok()
    }

    /// Decodes the `sender` field, if it is a well-formed interface id.
    #[must_use]
    pub fn sender_id(&self) -> Option<InterfaceId> {
        self.sender.parse().ok()
    }
}

/// Wire form of a Public Key Announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementEnvelope {
    /// Base64 interface id of the announced key
    pub sender: String,
    /// `pka` when well-formed
    pub msg_type: MessageType,
    /// Base64 of the JSON payload bytes
    pub payload: String,
    /// Signature over SHA-256 of the payload bytes
    pub signature: String,
}

impl AnnouncementEnvelope {
    /// Signs `payload` with `key_pair` and wraps it.
    ///
    /// # Errors
    /// Returns `SignatureCreation` if signing fails.
    pub fn seal(key_pair: &KeyPair, payload: &[u8]) -> Result<Self> {
        let signature = sign_digest(key_pair, payload)?;
        Ok(Self {
            sender: key_pair.interface_id().to_base64(),
            msg_type: MessageType::PublicKeyAnnouncement,
            payload: BASE64.encode(payload),
            signature: BASE64.encode(signature),
        })
    }

    /// Parses the JSON shape without authenticating anything.
    ///
    /// # Errors
    /// `Rejection::Json` if the string is not an announcement envelope.
    pub fn from_wire(wire: &str) -> ParseResult<Self> {
        serde_json::from_str(wire).map_err(|_| Rejection::Json("announcement envelope"))
    }

    /// Serializes to the wire string.
    ///
    /// # Errors
    /// Returns `MalformedMessage` if serialization fails.
    pub fn to_wire(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

// ============================================
// EnvelopeCodec
// ============================================

/// Seals and opens [`EncryptedEnvelope`]s.
#[derive(Debug, Default, Clone)]
pub struct EnvelopeCodec<C = AesCbcCipher> {
    cipher: C,
}

impl<C: SymmetricCipher> EnvelopeCodec<C> {
    /// Creates a codec over the given payload cipher.
    #[must_use]
    pub const fn with_cipher(cipher: C) -> Self {
        Self { cipher }
    }

    /// Encrypts `payload` for `recipient` and signs it as `sender`.
    ///
    /// # Errors
    /// Returns an error if any cryptographic step fails.
    pub fn seal(
        &self,
        sender: &KeyPair,
        recipient: &PublicKey,
        payload: &[u8],
    ) -> Result<EncryptedEnvelope> {
        let key = SymmetricKey::generate();
        let encrypted = self.cipher.encrypt(&key, payload)?;
        let signature = sign_digest(sender, &encrypted.ciphertext)?;
        let encrypted_key = recipient.encrypt(key.as_bytes())?;
        let encrypted_iv = recipient.encrypt(&encrypted.iv)?;

        Ok(EncryptedEnvelope {
            sender: sender.interface_id().to_base64(),
            recipient: recipient.interface_id().to_base64(),
            encrypted_key: BASE64.encode(encrypted_key),
            encrypted_iv: BASE64.encode(encrypted_iv),
            payload: BASE64.encode(&encrypted.ciphertext),
            signature: BASE64.encode(signature),
        })
    }

    /// Decrypts an envelope addressed to `local`.
    ///
    /// The result is not yet authenticated.
    ///
    /// # Errors
    /// A [`Rejection`] naming the first step that failed.
    pub fn open<'a>(
        &self,
        envelope: &'a EncryptedEnvelope,
        local: &KeyPair,
    ) -> ParseResult<OpenedEnvelope<'a>> {
        if !interface_id_matches("recipient", &envelope.recipient, local.interface_id())? {
            return Err(Rejection::NotAddressedToUs);
        }

        let encrypted_key = decode_base64("encryptedKey", &envelope.encrypted_key)?;
        let key = local
            .decrypt(&encrypted_key)
            .map(Zeroizing::new)
            .and_then(|bytes| SymmetricKey::from_bytes(&bytes))
            .map_err(|_| Rejection::KeyMaterial)?;

        let encrypted_iv = decode_base64("encryptedIV", &envelope.encrypted_iv)?;
        let iv: [u8; AES_IV_SIZE] = local
            .decrypt(&encrypted_iv)
            .map_err(|_| Rejection::KeyMaterial)?
            .as_slice()
            .try_into()
            .map_err(|_| Rejection::KeyMaterial)?;

        let data = SymmetricallyEncryptedData {
            ciphertext: decode_base64("payload", &envelope.payload)?,
            iv,
        };
        let plaintext = self
            .cipher
            .decrypt(&key, &data)
            .map_err(|_| Rejection::PayloadDecryption)?;

        Ok(OpenedEnvelope {
            envelope,
            ciphertext: data.ciphertext,
            plaintext,
        })
    }
}

impl EnvelopeCodec {
    /// Creates a codec using AES-256-CBC.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_cipher(AesCbcCipher::new())
    }
}

/// A decrypted envelope whose author has not been checked yet.
#[derive(Debug)]
pub struct OpenedEnvelope<'a> {
    envelope: &'a EncryptedEnvelope,
    ciphertext: Vec<u8>,
    plaintext: Vec<u8>,
}

impl OpenedEnvelope<'_> {
    /// Returns the decrypted JSON payload bytes.
    #[must_use]
    pub fn plaintext(&self) -> &[u8] {
        &self.plaintext
    }

    /// Checks `sender` against `signer` and verifies the signature over
    /// SHA-256 of the ciphertext.
    ///
    /// # Errors
    /// `SenderMismatch` or `BadSignature`.
    pub fn authenticate(&self, signer: &PublicKey) -> ParseResult<()> {
        if !interface_id_matches("sender", &self.envelope.sender, signer.interface_id())? {
            return Err(Rejection::SenderMismatch);
        }
        verify_digest_signature(signer, &self.ciphertext, &self.envelope.signature)
    }
}

/// Serializes an outbound payload to JSON bytes.
pub(crate) fn json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| CoreError::malformed(format!("payload json: {e}")))
}

// ============================================
// Tests
// ============================================
