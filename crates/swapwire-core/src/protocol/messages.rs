// ============================================
// File: crates/swapwire-core/src/protocol/messages.rs
// ============================================
//! # Protocol Message Definitions
//!
//! ## Creation Reason
//! Defines the three peer messages exchanged while a swap is negotiated,
//! both as typed values and as the JSON payloads that carry them.
//!
//! ## Main Functionality
//! - `MessageType`: The `msgType` discriminator literals
//! - `PublicKeyAnnouncement`, `TakerInformationMessage`,
//!   `MakerInformationMessage`: Typed, authenticated messages
//! - `*Payload`: Serde shapes of the JSON payloads
//!
//! ## Payloads
//! | Message | Encrypted | Payload fields |
//! |---------|-----------|----------------|
//! | pka | no | `pubKey`, `offerId` |
//! | takerInfo | yes | `msgType`, `pubKey`, `swapId`, `paymentDetails` |
//! | makerInfo | yes | `msgType`, `swapId`, `paymentDetails` |
//!
//! ## ⚠️ Important Note for Next Developer
//! - Field names and order are what deployed peers emit. DO NOT rename.
//! - `msgType` of an announcement lives in the envelope, not the payload
//!
//! ## Last Modified
//! v0.1.0 - Initial message definitions

use std::fmt;

use serde::{Deserialize, Serialize};

use swapwire_common::{OfferId, SwapId};

use crate::crypto::PublicKey;

// ============================================
// MessageType
// ============================================

/// Peer message discriminator.
///
/// # Values
/// | Literal | Type |
/// |---------|------|
/// | `pka` | Public Key Announcement |
/// | `takerInfo` | Taker Information |
/// | `makerInfo` | Maker Information |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    /// Maker broadcasts its public key for an offer.
    #[serde(rename = "pka")]
    PublicKeyAnnouncement,
    /// Taker sends its key and settlement details to the maker.
    #[serde(rename = "takerInfo")]
    TakerInformation,
    /// Maker answers with its settlement details.
    #[serde(rename = "makerInfo")]
    MakerInformation,
}

impl MessageType {
    /// Returns the wire literal.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PublicKeyAnnouncement => "pka",
            Self::TakerInformation => "takerInfo",
            Self::MakerInformation => "makerInfo",
        }
    }

    /// Checks if messages of this type travel in an encrypted envelope.
    #[must_use]
    pub const fn is_encrypted(&self) -> bool {
        !matches!(self, Self::PublicKeyAnnouncement)
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================
// Typed Messages
// ============================================

/// A maker's public key, bound to one of its offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyAnnouncement {
    /// Offer the key is announced for
    pub offer_id: OfferId,
    /// The maker's public key
    pub public_key: PublicKey,
}

/// Sent by the taker to the maker after taking an offer.
#[derive(Clone, PartialEq, Eq)]
pub struct TakerInformationMessage {
    /// Swap the information belongs to
    pub swap_id: SwapId,
    /// The taker's public key, for the maker to answer to
    pub public_key: PublicKey,
    /// Taker's private settlement details; `None` when sent empty
    pub settlement_method_details: Option<String>,
}

/// Sent by the maker to the taker in reply to taker information.
#[derive(Clone, PartialEq, Eq)]
pub struct MakerInformationMessage {
    /// Swap the information belongs to
    pub swap_id: SwapId,
    /// Maker's private settlement details
    pub settlement_method_details: String,
}

// Settlement details are private to the counterparties
impl fmt::Debug for TakerInformationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TakerInformationMessage")
            .field("swap_id", &self.swap_id)
            .field("public_key", &self.public_key)
            .field(
                "settlement_method_details",
                &self.settlement_method_details.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl fmt::Debug for MakerInformationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MakerInformationMessage")
            .field("swap_id", &self.swap_id)
            .field("settlement_method_details", &"[REDACTED]")
            .finish()
    }
}

// ============================================
// Wire Payloads
// ============================================

/// JSON payload of a Public Key Announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementPayload {
    /// Base64 PKCS#1 public key
    pub pub_key: String,
    /// Base64 of the 16 offer id bytes
    pub offer_id: String,
}

/// JSON payload of a Taker Information message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TakerInformationPayload {
    /// `takerInfo` when well-formed
    pub msg_type: MessageType,
    /// Base64 PKCS#1 public key of the taker
    pub pub_key: String,
    /// Hyphenated swap id
    pub swap_id: String,
    /// Settlement details, empty string for none
    pub payment_details: String,
}

/// JSON payload of a Maker Information message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakerInformationPayload {
    /// `makerInfo` when well-formed
    pub msg_type: MessageType,
    /// Hyphenated swap id
    pub swap_id: String,
    /// Settlement details
    pub payment_details: String,
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_literals() {
        for ty in [
            MessageType::PublicKeyAnnouncement,
            MessageType::TakerInformation,
            MessageType::MakerInformation,
        ] {
            let json = format!("\"{}\"", ty.as_str());
            assert_eq!(serde_json::to_string(&ty).unwrap(), json);
            assert_eq!(serde_json::from_str::<MessageType>(&json).unwrap(), ty);
        }
        assert!(serde_json::from_str::<MessageType>("\"TakerInfo\"").is_err());
        assert!(!MessageType::PublicKeyAnnouncement.is_encrypted());
        assert!(MessageType::MakerInformation.is_encrypted());
    }

    #[test]
    fn test_taker_payload_field_order() {
        let payload = TakerInformationPayload {
            msg_type: MessageType::TakerInformation,
            pub_key: "AAAA".into(),
            swap_id: "00000000-0000-0000-0000-000000000000".into(),
            payment_details: String::new(),
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(
            json,
            r#"{"msgType":"takerInfo","pubKey":"AAAA","swapId":"00000000-0000-0000-0000-000000000000","paymentDetails":""}"#
        );
    }

    #[test]
    fn test_maker_payload_requires_all_fields() {
        let missing = r#"{"msgType":"makerInfo","swapId":"x"}"#;
        assert!(serde_json::from_str::<MakerInformationPayload>(missing).is_err());

        let unknown_type = r#"{"msgType":"hello","swapId":"x","paymentDetails":""}"#;
        assert!(serde_json::from_str::<MakerInformationPayload>(unknown_type).is_err());
    }

    #[test]
    fn test_announcement_payload_names() {
        let json = r#"{"pubKey":"a","offerId":"b"}"#;
        let payload: AnnouncementPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.pub_key, "a");
        assert_eq!(payload.offer_id, "b");
    }
}
