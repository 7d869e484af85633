// ============================================
// File: crates/swapwire-core/src/protocol/announcement.rs
// ============================================
//! # Public Key Announcement
//!
//! ## Creation Reason
//! A maker publishes the public key it will use for an offer, so that a
//! taker can address encrypted messages to it.
//!
//! ## Main Functionality
//! - `create_public_key_announcement`: offer id + key pair -> wire string
//! - `parse_public_key_announcement`: wire string -> announcement or `None`
//!
//! ## Parsing Strategy
//! 1. Envelope JSON, `msgType == "pka"`
//! 2. `sender` and `payload` Base64, payload JSON
//! 3. `offerId` is 16 bytes, `pubKey` is PKCS#1
//! 4. `sender` equals the interface id of `pubKey`
//! 5. Signature by `pubKey` over SHA-256 of the payload bytes
//!
//! ## ⚠️ Important Note for Next Developer
//! - Step 4 is what stops a third party from binding its own key to
//!   someone else's offer. Never drop it.
//!
//! ## Last Modified
//! v0.1.0 - Initial announcement support

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use swapwire_common::OfferId;

use crate::crypto::{KeyPair, PublicKey};
use crate::error::Result;

use super::envelope::{
    decode_base64, interface_id_matches, json_bytes, verify_digest_signature,
    AnnouncementEnvelope, ParseResult, Rejection,
};
use super::messages::{AnnouncementPayload, MessageType, PublicKeyAnnouncement};

/// Creates the wire string announcing `key_pair`'s public key for `offer_id`.
///
/// # Errors
/// Returns an error if serialization or signing fails.
pub fn create_public_key_announcement(offer_id: &OfferId, key_pair: &KeyPair) -> Result<String> {
    let payload = AnnouncementPayload {
        pub_key: BASE64.encode(key_pair.public_key_pkcs1()),
        offer_id: offer_id.to_wire(),
    };
    AnnouncementEnvelope::seal(key_pair, &json_bytes(&payload)?)?.to_wire()
}

/// Parses a Public Key Announcement, returning `None` for anything that
/// is not a valid one.
#[must_use]
pub fn parse_public_key_announcement(wire: &str) -> Option<PublicKeyAnnouncement> {
    decode_public_key_announcement(wire)
        .map_err(|rejection| rejection.log(MessageType::PublicKeyAnnouncement))
        .ok()
}

/// Same as [`parse_public_key_announcement`] but reports why a string
/// was rejected.
///
/// # Errors
/// The [`Rejection`] of the first failing step.
pub fn decode_public_key_announcement(wire: &str) -> ParseResult<PublicKeyAnnouncement> {
    let envelope = AnnouncementEnvelope::from_wire(wire)?;
    if envelope.msg_type != MessageType::PublicKeyAnnouncement {
        return Err(Rejection::WrongMessageType {
            expected: MessageType::PublicKeyAnnouncement,
            actual: envelope.msg_type,
        });
    }

    // Checked here so a bad sender fails before the payload is parsed
    decode_base64("sender", &envelope.sender)?;
    let payload_bytes = decode_base64("payload", &envelope.payload)?;
    let payload: AnnouncementPayload =
        serde_json::from_slice(&payload_bytes).map_err(|_| Rejection::Json("pka payload"))?;

    let offer_id =
        OfferId::from_wire(&payload.offer_id).map_err(|_| Rejection::InvalidIdentifier("offerId"))?;
    let public_key = decode_base64("pubKey", &payload.pub_key)
        .and_then(|bytes| PublicKey::from_pkcs1(&bytes).map_err(|_| Rejection::InvalidPublicKey))?;

    if !interface_id_matches("sender", &envelope.sender, public_key.interface_id())? {
        return Err(Rejection::SenderMismatch);
    }
    verify_digest_signature(&public_key, &payload_bytes, &envelope.signature)?;

    Ok(PublicKeyAnnouncement {
        offer_id,
        public_key,
    })
}

// ============================================
// Tests
// ============================================
