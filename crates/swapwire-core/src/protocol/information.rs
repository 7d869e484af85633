// ============================================
// File: crates/swapwire-core/src/protocol/information.rs
// ============================================
//! # Taker & Maker Information
//!
//! ## Creation Reason
//! After an offer is taken, the two parties swap public keys and private
//! settlement details through encrypted envelopes.
//!
//! ## Main Functionality
//! - Taker -> maker: `create_taker_information_message` /
//!   `parse_taker_information_message`
//! - Maker -> taker: `create_maker_information_message` /
//!   `parse_maker_information_message`
//! - `open_*` variants take an already parsed [`EncryptedEnvelope`]
//!
//! ## Exchange
//! ```text
//! Taker                                          Maker
//!   │ takerInfo {pubKey, swapId, paymentDetails}  │
//!   │ ──────────────── encrypted to maker ──────► │
//!   │                                             │
//!   │ makerInfo {swapId, paymentDetails}          │
//!   │ ◄─────────────── encrypted to taker ─────── │
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Taker information authenticates against the key it carries; maker
//!   information against the maker key learned from the announcement.
//! - An empty `paymentDetails` in taker information means "none".
//!
//! ## Last Modified
//! v0.1.0 - Initial information messages

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use swapwire_common::SwapId;

use crate::crypto::{KeyPair, PublicKey};
use crate::error::Result;

use super::envelope::{
    decode_base64, json_bytes, EncryptedEnvelope, EnvelopeCodec, ParseResult, Rejection,
};
use super::messages::{
    MakerInformationMessage, MakerInformationPayload, MessageType, TakerInformationMessage,
    TakerInformationPayload,
};

// ============================================
// Taker Information
// ============================================

/// Creates the Taker Information wire string, encrypted to the maker.
///
/// `None` details are sent as an empty string.
///
/// # Errors
/// Returns an error if serialization or any cryptographic step fails.
pub fn create_taker_information_message(
    maker_public_key: &PublicKey,
    taker_key_pair: &KeyPair,
    swap_id: &SwapId,
    settlement_method_details: Option<&str>,
) -> Result<String> {
    let payload = TakerInformationPayload {
        msg_type: MessageType::TakerInformation,
        pub_key: BASE64.encode(taker_key_pair.public_key_pkcs1()),
        swap_id: swap_id.to_wire(),
        payment_details: settlement_method_details.unwrap_or_default().to_string(),
    };
    EnvelopeCodec::new()
        .seal(taker_key_pair, maker_public_key, &json_bytes(&payload)?)?
        .to_wire()
}

/// Parses a Taker Information wire string addressed to `key_pair`.
#[must_use]
pub fn parse_taker_information_message(
    wire: &str,
    key_pair: &KeyPair,
) -> Option<TakerInformationMessage> {
    EncryptedEnvelope::from_wire(wire)
        .and_then(|envelope| decode_taker_information(&envelope, key_pair))
        .map_err(|rejection| rejection.log(MessageType::TakerInformation))
        .ok()
}

/// Reads Taker Information out of a parsed envelope.
#[must_use]
pub fn open_taker_information(
    envelope: &EncryptedEnvelope,
    key_pair: &KeyPair,
) -> Option<TakerInformationMessage> {
    decode_taker_information(envelope, key_pair)
        .map_err(|rejection| rejection.log(MessageType::TakerInformation))
        .ok()
}

/// Same as [`open_taker_information`] but reports why it was rejected.
///
/// # Errors
/// The [`Rejection`] of the first failing step.
pub fn decode_taker_information(
    envelope: &EncryptedEnvelope,
    key_pair: &KeyPair,
) -> ParseResult<TakerInformationMessage> {
    let codec = EnvelopeCodec::new();
    let opened = codec.open(envelope, key_pair)?;
    let payload: TakerInformationPayload = serde_json::from_slice(opened.plaintext())
        .map_err(|_| Rejection::Json("takerInfo payload"))?;
    if payload.msg_type != MessageType::TakerInformation {
        return Err(Rejection::WrongMessageType {
            expected: MessageType::TakerInformation,
            actual: payload.msg_type,
        });
    }

    let public_key = decode_base64("pubKey", &payload.pub_key)
        .and_then(|bytes| PublicKey::from_pkcs1(&bytes).map_err(|_| Rejection::InvalidPublicKey))?;
    opened.authenticate(&public_key)?;

    let swap_id =
        SwapId::from_wire(&payload.swap_id).map_err(|_| Rejection::InvalidIdentifier("swapId"))?;
    let settlement_method_details = Some(payload.payment_details).filter(|d| !d.is_empty());

    Ok(TakerInformationMessage {
        swap_id,
        public_key,
        settlement_method_details,
    })
}

// ============================================
// Maker Information
// ============================================

/// Creates the Maker Information wire string, encrypted to the taker.
///
/// # Errors
/// Returns an error if serialization or any cryptographic step fails.
pub fn create_maker_information_message(
    taker_public_key: &PublicKey,
    maker_key_pair: &KeyPair,
    swap_id: &SwapId,
    settlement_method_details: &str,
) -> Result<String> {
    let payload = MakerInformationPayload {
        msg_type: MessageType::MakerInformation,
        swap_id: swap_id.to_wire(),
        payment_details: settlement_method_details.to_string(),
    };
    EnvelopeCodec::new()
        .seal(maker_key_pair, taker_public_key, &json_bytes(&payload)?)?
        .to_wire()
}

/// Parses a Maker Information wire string addressed to `key_pair` and
/// signed by `maker_public_key`.
#[must_use]
pub fn parse_maker_information_message(
    wire: &str,
    key_pair: &KeyPair,
    maker_public_key: &PublicKey,
) -> Option<MakerInformationMessage> {
    EncryptedEnvelope::from_wire(wire)
        .and_then(|envelope| decode_maker_information(&envelope, key_pair, maker_public_key))
        .map_err(|rejection| rejection.log(MessageType::MakerInformation))
        .ok()
}

/// Reads Maker Information out of a parsed envelope.
#[must_use]
pub fn open_maker_information(
    envelope: &EncryptedEnvelope,
    key_pair: &KeyPair,
    maker_public_key: &PublicKey,
) -> Option<MakerInformationMessage> {
    decode_maker_information(envelope, key_pair, maker_public_key)
        .map_err(|rejection| rejection.log(MessageType::MakerInformation))
        .ok()
}

/// Same as [`open_maker_information`] but reports why it was rejected.
///
/// # Errors
/// The [`Rejection`] of the first failing step.
pub fn decode_maker_information(
    envelope: &EncryptedEnvelope,
    key_pair: &KeyPair,
    maker_public_key: &PublicKey,
) -> ParseResult<MakerInformationMessage> {
    let codec = EnvelopeCodec::new();
    let opened = codec.open(envelope, key_pair)?;
    let payload: MakerInformationPayload = serde_json::from_slice(opened.plaintext())
        .map_err(|_| Rejection::Json("makerInfo payload"))?;
    if payload.msg_type != MessageType::MakerInformation {
        return Err(Rejection::WrongMessageType {
            expected: MessageType::MakerInformation,
            actual: payload.msg_type,
        });
    }

    opened.authenticate(maker_public_key)?;

    let swap_id =
        SwapId::from_wire(&payload.swap_id).map_err(|_| Rejection::InvalidIdentifier("swapId"))?;

    Ok(MakerInformationMessage {
        swap_id,
        settlement_method_details: payload.payment_details,
    })
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::fixtures::key_pair;

    fn maker() -> &'static KeyPair {
        key_pair(0)
    }

    fn taker() -> &'static KeyPair {
        key_pair(1)
    }

    #[test]
    fn test_taker_information_roundtrip() {
        let swap_id = SwapId::generate();
        let wire = create_taker_information_message(
            maker().public_key(),
            taker(),
            &swap_id,
            Some("IBAN DE00 0000"),
        )
        .unwrap();

        let message = parse_taker_information_message(&wire, maker()).unwrap();
        assert_eq!(message.swap_id, swap_id);
        assert_eq!(&message.public_key, taker().public_key());
        assert_eq!(message.settlement_method_details.as_deref(), Some("IBAN DE00 0000"));
    }

    #[test]
    fn test_taker_information_empty_details_is_none() {
        let swap_id = SwapId::generate();
        let wire =
            create_taker_information_message(maker().public_key(), taker(), &swap_id, None).unwrap();
        let message = parse_taker_information_message(&wire, maker()).unwrap();
        assert_eq!(message.settlement_method_details, None);

        let wire = create_taker_information_message(maker().public_key(), taker(), &swap_id, Some(""))
            .unwrap();
        let message = parse_taker_information_message(&wire, maker()).unwrap();
        assert_eq!(message.settlement_method_details, None);
    }

    #[test]
    fn test_maker_information_roundtrip() {
        let swap_id = SwapId::generate();
        let wire = create_maker_information_message(
            taker().public_key(),
            maker(),
            &swap_id,
            "PayPal maker@example.com",
        )
        .unwrap();

        let message = parse_maker_information_message(&wire, taker(), maker().public_key()).unwrap();
        assert_eq!(message.swap_id, swap_id);
        assert_eq!(message.settlement_method_details, "PayPal maker@example.com");
    }

    #[test]
    fn test_maker_information_empty_details_kept() {
        let swap_id = SwapId::generate();
        let wire =
            create_maker_information_message(taker().public_key(), maker(), &swap_id, "").unwrap();
        let message = parse_maker_information_message(&wire, taker(), maker().public_key()).unwrap();
        assert_eq!(message.settlement_method_details, "");
    }

    #[test]
    fn test_taker_information_not_read_as_maker_information() {
        // Addressed to the maker, so the maker can open it
        let wire = create_taker_information_message(
            maker().public_key(),
            taker(),
            &SwapId::generate(),
            Some("details"),
        )
        .unwrap();
        let envelope = EncryptedEnvelope::from_wire(&wire).unwrap();
        assert_eq!(
            decode_maker_information(&envelope, maker(), taker().public_key()).unwrap_err(),
            Rejection::WrongMessageType {
                expected: MessageType::MakerInformation,
                actual: MessageType::TakerInformation,
            }
        );
    }

    #[test]
    fn test_maker_information_wrong_expected_maker() {
        let wire = create_maker_information_message(
            taker().public_key(),
            maker(),
            &SwapId::generate(),
            "details",
        )
        .unwrap();
        let envelope = EncryptedEnvelope::from_wire(&wire).unwrap();
        assert_eq!(
            decode_maker_information(&envelope, taker(), key_pair(2).public_key()).unwrap_err(),
            Rejection::SenderMismatch
        );
    }

    #[test]
    fn test_message_types_do_not_cross() {
        let swap_id = SwapId::generate();
        let taker_wire =
            create_taker_information_message(maker().public_key(), taker(), &swap_id, Some("x"))
                .unwrap();
        assert!(parse_maker_information_message(&taker_wire, maker(), taker().public_key()).is_none());

        let maker_wire =
            create_maker_information_message(taker().public_key(), maker(), &swap_id, "y").unwrap();
        assert!(parse_taker_information_message(&maker_wire, taker()).is_none());
    }

    #[test]
    fn test_wrong_recipient_rejected() {
        let wire = create_taker_information_message(
            maker().public_key(),
            taker(),
            &SwapId::generate(),
            None,
        )
        .unwrap();
        let envelope = EncryptedEnvelope::from_wire(&wire).unwrap();
        assert_eq!(
            decode_taker_information(&envelope, key_pair(2)).unwrap_err(),
            Rejection::NotAddressedToUs
        );
    }

    #[test]
    fn test_every_tampered_field_rejected() {
        let wire = create_taker_information_message(
            maker().public_key(),
            taker(),
            &SwapId::generate(),
            Some("details"),
        )
        .unwrap();
        let original = EncryptedEnvelope::from_wire(&wire).unwrap();

        let flip = |value: &str| {
            let mut bytes = BASE64.decode(value).unwrap();
            let last = bytes.len() - 1;
            bytes[last] ^= 0x01;
            BASE64.encode(bytes)
        };
        let mutations: [fn(&mut EncryptedEnvelope) -> &mut String; 6] = [
            |e| &mut e.sender,
            |e| &mut e.recipient,
            |e| &mut e.encrypted_key,
            |e| &mut e.encrypted_iv,
            |e| &mut e.payload,
            |e| &mut e.signature,
        ];
        for field in mutations {
            let mut envelope = original.clone();
            let value = field(&mut envelope);
            *value = flip(value);
            assert!(open_taker_information(&envelope, maker()).is_none());
        }
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(parse_taker_information_message("", maker()).is_none());
        assert!(parse_taker_information_message("[]", maker()).is_none());
        assert!(parse_maker_information_message("{}", taker(), maker().public_key()).is_none());
    }
}
