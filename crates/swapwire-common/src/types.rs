// ============================================
// File: crates/swapwire-common/src/types.rs
// ============================================
//! # Identifier Types
//!
//! ## Creation Reason
//! Centralizes the three identifiers that cross the wire so their
//! encodings cannot drift between message types.
//!
//! ## Main Functionality
//! - `InterfaceId`: SHA-256 of a party's PKCS#1 public key (32 bytes)
//! - `OfferId`: 128-bit offer identifier
//! - `SwapId`: 128-bit swap identifier (same value as the taken offer's id)
//!
//! ## Wire Encodings
//! ```text
//! InterfaceId  Base64(32 bytes)                       "sender", "recipient"
//! OfferId      Base64(16 big-endian UUID bytes)       pka payload "offerId"
//! SwapId       hyphenated UUID string                 info payload "swapId"
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - `OfferId` and `SwapId` deliberately use different text encodings.
//!   Counterparties already in the field depend on both.
//! - `InterfaceId` is public information. It is `Copy` and not zeroized.
//!
//! ## Last Modified
//! v0.1.0 - Initial identifier types

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CommonError;

// ============================================
// Constants
// ============================================

/// Size of an interface id in bytes (SHA-256 output).
pub const INTERFACE_ID_SIZE: usize = 32;

/// Size of an offer or swap id in bytes.
pub const UUID_SIZE: usize = 16;

// ============================================
// InterfaceId
// ============================================

/// Stable identity handle for a party.
///
/// Always derived as `SHA256(PKCS1(public_key))`; this crate only stores
/// and encodes the digest, derivation lives next to the key types.
///
/// # Example
/// ```
/// use swapwire_common::types::InterfaceId;
///
/// let id = InterfaceId::from_bytes([7u8; 32]);
/// let text = id.to_string();
/// let parsed: InterfaceId = text.parse().unwrap();
/// assert_eq!(id, parsed);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InterfaceId([u8; INTERFACE_ID_SIZE]);

impl InterfaceId {
    /// Wraps a 32-byte digest.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; INTERFACE_ID_SIZE]) -> Self {
        Self(bytes)
    }

    /// Creates an interface id from a slice.
    ///
    /// Returns `None` unless the slice is exactly 32 bytes.
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let array: [u8; INTERFACE_ID_SIZE] = bytes.try_into().ok()?;
        Some(Self(array))
    }

    /// Returns the raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; INTERFACE_ID_SIZE] {
        &self.0
    }

    /// Returns the Base64 wire form.
    #[must_use]
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.0)
    }
}

impl fmt::Debug for InterfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "InterfaceId({:02x}{:02x}{:02x}{:02x}...)",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

impl fmt::Display for InterfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

impl FromStr for InterfaceId {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = BASE64.decode(s)?;
        Self::from_slice(&bytes).ok_or(CommonError::InvalidLength {
            expected: INTERFACE_ID_SIZE,
            actual: bytes.len(),
        })
    }
}

impl AsRef<[u8]> for InterfaceId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for InterfaceId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_base64())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for InterfaceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(serde::de::Error::custom)
        } else {
            let bytes = <Vec<u8>>::deserialize(deserializer)?;
            Self::from_slice(&bytes)
                .ok_or_else(|| serde::de::Error::invalid_length(bytes.len(), &"32 bytes"))
        }
    }
}

// ============================================
// OfferId
// ============================================

/// Identifier of an offer, announced alongside the maker's public key.
///
/// On the wire it is the Base64 of the 16 UUID bytes in big-endian
/// (most significant half first) order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferId(Uuid);

impl OfferId {
    /// Wraps an existing UUID.
    #[must_use]
    pub const fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generates a random (v4) offer id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Returns the Base64 wire form used in announcements.
    #[must_use]
    pub fn to_wire(&self) -> String {
        BASE64.encode(self.0.as_bytes())
    }

    /// Parses the Base64 wire form used in announcements.
    ///
    /// # Errors
    /// Fails on invalid Base64 or if the decoded length is not 16.
    pub fn from_wire(s: &str) -> crate::Result<Self> {
        let bytes = BASE64.decode(s)?;
        let array: [u8; UUID_SIZE] =
            bytes.as_slice().try_into().map_err(|_| CommonError::InvalidLength {
                expected: UUID_SIZE,
                actual: bytes.len(),
            })?;
        Ok(Self(Uuid::from_bytes(array)))
    }
}

impl From<Uuid> for OfferId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<SwapId> for OfferId {
    fn from(id: SwapId) -> Self {
        Self(id.0)
    }
}

impl fmt::Debug for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OfferId({})", self.0)
    }
}

impl fmt::Display for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for OfferId {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ============================================
// SwapId
// ============================================

/// Identifier of a swap. A swap inherits the id of the offer it was taken from.
///
/// On the wire it is the canonical hyphenated UUID string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SwapId(Uuid);

impl SwapId {
    /// Wraps an existing UUID.
    #[must_use]
    pub const fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generates a random (v4) swap id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Returns the wire form used in taker/maker information payloads.
    #[must_use]
    pub fn to_wire(&self) -> String {
        self.0.hyphenated().to_string()
    }

    /// Parses the wire form used in taker/maker information payloads.
    ///
    /// # Errors
    /// Fails if the string is not a UUID.
    pub fn from_wire(s: &str) -> crate::Result<Self> {
        s.parse()
    }
}

impl From<Uuid> for SwapId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<OfferId> for SwapId {
    fn from(id: OfferId) -> Self {
        Self(id.0)
    }
}

impl fmt::Debug for SwapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SwapId({})", self.0)
    }
}

impl fmt::Display for SwapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for SwapId {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ============================================
// Tests
// ============================================
