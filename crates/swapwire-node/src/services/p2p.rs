// ============================================
// File: crates/swapwire-node/src/services/p2p.rs
// ============================================
//! # P2P Service
//!
//! ## Creation Reason
//! Connects the protocol messages to the shared room: builds outbound
//! wire strings and sorts every inbound string into at most one
//! accepted message.
//!
//! ## Main Functionality
//! - `P2pService`: outbound senders, `classify`, `dispatch` and `run`
//! - `MessageHandler`: receiver of accepted messages
//! - `InboundPeerMessage`: what an inbound string turned out to be
//!
//! ## Dispatch Flow
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  1. Larger than p2p.max_message_bytes?           → skip      │
//! │  2. Public Key Announcement?                     → accept    │
//! │  3. Encrypted envelope shape?                    → else skip │
//! │  4. Key pair for "recipient"?                    → else skip │
//! │  5. Taker Information?                           → accept    │
//! │  6. Public key for "sender"?                     → else skip │
//! │  7. Maker Information?                           → accept    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Error Handling
//! - A skipped string affects only itself; the loop goes on
//! - Handler errors are logged, never propagated
//! - `Closed` from the transport ends the loop normally
//!
//! ## ⚠️ Important Note for Next Developer
//! - Strings not addressed to us are the normal case in a shared room.
//!   Keep those at debug/trace.
//!
//! ## Last Modified
//! v0.1.0 - Initial P2P service

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{debug, error, info, trace, warn};

use swapwire_common::{InterfaceId, OfferId, SwapId};
use swapwire_core::crypto::{KeyPair, PublicKey};
use swapwire_core::protocol::{
    create_maker_information_message, create_public_key_announcement,
    create_taker_information_message, open_maker_information, open_taker_information,
    parse_public_key_announcement, EncryptedEnvelope, MakerInformationMessage,
    PublicKeyAnnouncement, TakerInformationMessage,
};
use swapwire_transport::{PeerTransport, TransportError};

use crate::error::Result;
use crate::services::KeyManagerService;

// ============================================
// MessageHandler
// ============================================

/// Receives messages accepted by [`P2pService`].
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// A maker announced the public key for one of its offers.
    async fn on_public_key_announcement(&self, announcement: PublicKeyAnnouncement) -> Result<()>;

    /// A taker sent its information to one of our key pairs.
    async fn on_taker_information(&self, message: TakerInformationMessage) -> Result<()>;

    /// A maker answered; `sender` signed it and `recipient` is ours.
    async fn on_maker_information(
        &self,
        message: MakerInformationMessage,
        sender: InterfaceId,
        recipient: InterfaceId,
    ) -> Result<()>;
}

// ============================================
// InboundPeerMessage
// ============================================

/// An accepted inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundPeerMessage {
    /// `pka`
    PublicKeyAnnouncement(PublicKeyAnnouncement),
    /// `takerInfo`
    TakerInformation {
        /// The decrypted message
        message: TakerInformationMessage,
        /// Our interface id it was addressed to
        recipient: InterfaceId,
    },
    /// `makerInfo`
    MakerInformation {
        /// The decrypted message
        message: MakerInformationMessage,
        /// Interface id that signed it
        sender: InterfaceId,
        /// Our interface id it was addressed to
        recipient: InterfaceId,
    },
}

impl InboundPeerMessage {
    /// Returns the wire message type.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::PublicKeyAnnouncement(_) => "pka",
            Self::TakerInformation { .. } => "takerInfo",
            Self::MakerInformation { .. } => "makerInfo",
        }
    }
}

// ============================================
// P2pService
// ============================================

/// Sends and receives swap messages over a [`PeerTransport`].
pub struct P2pService {
    transport: Arc<dyn PeerTransport>,
    keys: Arc<KeyManagerService>,
    max_message_bytes: usize,
}

impl P2pService {
    /// Creates a service over `transport`, resolving keys through `keys`.
    #[must_use]
    pub fn new(
        transport: Arc<dyn PeerTransport>,
        keys: Arc<KeyManagerService>,
        max_message_bytes: usize,
    ) -> Self {
        Self {
            transport,
            keys,
            max_message_bytes,
        }
    }

    // ========================================
    // Outbound
    // ========================================

    /// Announces `key_pair`'s public key for `offer_id`.
    ///
    /// # Errors
    /// Returns error if the message cannot be built or sent.
    pub async fn announce_public_key(&self, offer_id: &OfferId, key_pair: &KeyPair) -> Result<()> {
        let wire = create_public_key_announcement(offer_id, key_pair)?;
        self.transport.send(&wire).await?;
        info!(
            offer_id = %offer_id,
            interface_id = %key_pair.interface_id(),
            "Announced public key"
        );
        Ok(())
    }

    /// Sends taker information to the maker.
    ///
    /// # Errors
    /// Returns error if the message cannot be built or sent.
    pub async fn send_taker_information(
        &self,
        maker_public_key: &PublicKey,
        taker_key_pair: &KeyPair,
        swap_id: &SwapId,
        settlement_method_details: Option<&str>,
    ) -> Result<()> {
        let wire = create_taker_information_message(
            maker_public_key,
            taker_key_pair,
            swap_id,
            settlement_method_details,
        )?;
        self.transport.send(&wire).await?;
        info!(
            swap_id = %swap_id,
            recipient = %maker_public_key.interface_id(),
            "Sent taker information"
        );
        Ok(())
    }

    /// Sends maker information to the taker.
    ///
    /// # Errors
    /// Returns error if the message cannot be built or sent.
    pub async fn send_maker_information(
        &self,
        taker_public_key: &PublicKey,
        maker_key_pair: &KeyPair,
        swap_id: &SwapId,
        settlement_method_details: &str,
    ) -> Result<()> {
        let wire = create_maker_information_message(
            taker_public_key,
            maker_key_pair,
            swap_id,
            settlement_method_details,
        )?;
        self.transport.send(&wire).await?;
        info!(
            swap_id = %swap_id,
            recipient = %taker_public_key.interface_id(),
            "Sent maker information"
        );
        Ok(())
    }

    // ========================================
    // Inbound
    // ========================================

    /// Works out what `wire` is, without delivering it anywhere.
    #[must_use]
    pub fn classify(&self, wire: &str) -> Option<InboundPeerMessage> {
        if wire.len() > self.max_message_bytes {
            debug!(
                size = wire.len(),
                max = self.max_message_bytes,
                "Skipping oversized message"
            );
            return None;
        }

        if let Some(announcement) = parse_public_key_announcement(wire) {
            return Some(InboundPeerMessage::PublicKeyAnnouncement(announcement));
        }

        let envelope = match EncryptedEnvelope::from_wire(wire) {
            Ok(envelope) => envelope,
            Err(rejection) => {
                trace!(reason = %rejection, "Not a swap message");
                return None;
            }
        };

        let recipient = envelope.recipient_id()?;
        let key_pair = self.lookup(&recipient, KeyManagerService::get_key_pair)?;

        if let Some(message) = open_taker_information(&envelope, &key_pair) {
            return Some(InboundPeerMessage::TakerInformation { message, recipient });
        }

        let sender = envelope.sender_id()?;
        let maker_public_key = self.lookup(&sender, KeyManagerService::get_public_key)?;

        open_maker_information(&envelope, &key_pair, &maker_public_key).map(|message| {
            InboundPeerMessage::MakerInformation {
                message,
                sender,
                recipient,
            }
        })
    }

    /// Classifies `wire` and hands an accepted message to `handler`.
    ///
    /// Returns `true` if the string was accepted.
    pub async fn dispatch(&self, wire: &str, handler: &dyn MessageHandler) -> bool {
        let Some(message) = self.classify(wire) else {
            return false;
        };
        let kind = message.kind();

        let result = match message {
            InboundPeerMessage::PublicKeyAnnouncement(announcement) => {
                handler.on_public_key_announcement(announcement).await
            }
            InboundPeerMessage::TakerInformation { message, .. } => {
                handler.on_taker_information(message).await
            }
            InboundPeerMessage::MakerInformation {
                message,
                sender,
                recipient,
            } => handler.on_maker_information(message, sender, recipient).await,
        };

        match result {
            Ok(()) => {}
            Err(e) if e.is_validation_error() => {
                debug!(message_type = kind, reason = %e, "Message does not apply to swap");
            }
            Err(e) => {
                warn!(message_type = kind, error = %e, "Handler rejected message");
            }
        }
        true
    }

    /// Receives and dispatches until `shutdown` fires or the transport closes.
    pub async fn run(&self, handler: Arc<dyn MessageHandler>, mut shutdown: broadcast::Receiver<()>) {
        info!(room = %self.transport.room(), "P2P listener started");

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    debug!("P2P listener received shutdown signal");
                    break;
                }
                result = self.transport.recv() => {
                    match result {
                        Ok(inbound) => {
                            self.dispatch(&inbound.body, handler.as_ref()).await;
                        }
                        Err(TransportError::Closed) => {
                            info!("Transport closed");
                            break;
                        }
                        Err(e) => {
                            error!(error = %e, "Receive failed");
                        }
                    }
                }
            }
        }

        info!("P2P listener stopped");
    }

    fn lookup<T>(
        &self,
        interface_id: &InterfaceId,
        get: fn(&KeyManagerService, &InterfaceId) -> Result<Option<T>>,
    ) -> Option<T> {
        match get(&self.keys, interface_id) {
            Ok(Some(key)) => Some(key),
            Ok(None) => {
                trace!(interface_id = %interface_id, "No local key for message");
                None
            }
            Err(e) => {
                warn!(interface_id = %interface_id, error = %e, "Stored key unusable");
                None
            }
        }
    }
}

impl std::fmt::Debug for P2pService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("P2pService")
            .field("room", &self.transport.room())
            .field("max_message_bytes", &self.max_message_bytes)
            .finish_non_exhaustive()
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use std::sync::OnceLock;
    use std::time::Duration;

    use parking_lot::Mutex;
    use swapwire_transport::{MemoryRoom, MemoryTransport};

    use super::*;

    fn maker() -> &'static KeyPair {
        static KEY: OnceLock<KeyPair> = OnceLock::new();
        KEY.get_or_init(|| KeyPair::generate().unwrap())
    }

    fn taker() -> &'static KeyPair {
        static KEY: OnceLock<KeyPair> = OnceLock::new();
        KEY.get_or_init(|| KeyPair::generate().unwrap())
    }

    #[derive(Default)]
    struct RecordingHandler {
        events: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MessageHandler for RecordingHandler {
        async fn on_public_key_announcement(&self, announcement: PublicKeyAnnouncement) -> Result<()> {
            self.events.lock().push(format!("pka:{}", announcement.offer_id));
            Ok(())
        }

        async fn on_taker_information(&self, message: TakerInformationMessage) -> Result<()> {
            self.events.lock().push(format!("takerInfo:{}", message.swap_id));
            Ok(())
        }

        async fn on_maker_information(
            &self,
            message: MakerInformationMessage,
            _sender: InterfaceId,
            _recipient: InterfaceId,
        ) -> Result<()> {
            self.events.lock().push(format!("makerInfo:{}", message.swap_id));
            Ok(())
        }
    }

    fn node(room: &Arc<MemoryRoom>, name: &str, own: &KeyPair) -> (Arc<MemoryTransport>, P2pService) {
        let transport = Arc::new(room.join(name));
        let keys = Arc::new(KeyManagerService::in_memory());
        keys.import_key_pair(own).unwrap();
        let service = P2pService::new(transport.clone(), keys, 64 * 1024);
        (transport, service)
    }

    #[tokio::test]
    async fn test_announcement_dispatch() {
        let room = MemoryRoom::new("swaps");
        let (maker_transport, maker_p2p) = node(&room, "maker", maker());
        let (_taker_transport, taker_p2p) = node(&room, "taker", taker());

        let offer_id = OfferId::generate();
        maker_p2p.announce_public_key(&offer_id, maker()).await.unwrap();
        let wire = maker_transport.take_sent().pop().unwrap();

        let handler = RecordingHandler::default();
        assert!(taker_p2p.dispatch(&wire, &handler).await);
        assert_eq!(*handler.events.lock(), vec![format!("pka:{offer_id}")]);
    }

    #[tokio::test]
    async fn test_information_exchange_classification() {
        let room = MemoryRoom::new("swaps");
        let (taker_transport, taker_p2p) = node(&room, "taker", taker());
        let (maker_transport, maker_p2p) = node(&room, "maker", maker());
        let swap_id = SwapId::generate();

        taker_p2p
            .send_taker_information(maker().public_key(), taker(), &swap_id, Some("taker iban"))
            .await
            .unwrap();
        let wire = taker_transport.take_sent().pop().unwrap();

        // Not addressed to the taker itself
        assert!(taker_p2p.classify(&wire).is_none());

        match maker_p2p.classify(&wire) {
            Some(InboundPeerMessage::TakerInformation { message, recipient }) => {
                assert_eq!(message.swap_id, swap_id);
                assert_eq!(recipient, *maker().interface_id());
                assert_eq!(message.settlement_method_details.as_deref(), Some("taker iban"));
            }
            other => panic!("unexpected classification: {other:?}"),
        }

        maker_p2p
            .send_maker_information(taker().public_key(), maker(), &swap_id, "maker iban")
            .await
            .unwrap();
        let wire = maker_transport.take_sent().pop().unwrap();

        // Sender public key unknown to the taker yet
        assert!(taker_p2p.classify(&wire).is_none());

        taker_p2p.keys.store_public_key(maker().public_key()).unwrap();
        match taker_p2p.classify(&wire) {
            Some(InboundPeerMessage::MakerInformation {
                message,
                sender,
                recipient,
            }) => {
                assert_eq!(message.settlement_method_details, "maker iban");
                assert_eq!(sender, *maker().interface_id());
                assert_eq!(recipient, *taker().interface_id());
            }
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_junk_and_oversized_skipped() {
        let room = MemoryRoom::new("swaps");
        let transport = Arc::new(room.join("solo"));
        let service = P2pService::new(transport, Arc::new(KeyManagerService::in_memory()), 1024);
        let handler = RecordingHandler::default();

        assert!(!service.dispatch("hello", &handler).await);
        assert!(!service.dispatch("{\"msgType\":\"pka\"}", &handler).await);
        assert!(!service.dispatch(&"x".repeat(2048), &handler).await);
        assert!(handler.events.lock().is_empty());
    }

    #[tokio::test]
    async fn test_run_continues_past_rejected_strings() {
        let room = MemoryRoom::new("swaps");
        let (maker_transport, maker_p2p) = node(&room, "maker", maker());
        let (_taker_transport, taker_p2p) = node(&room, "taker", taker());
        let taker_p2p = Arc::new(taker_p2p);
        let handler = Arc::new(RecordingHandler::default());
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let listener = {
            let taker_p2p = Arc::clone(&taker_p2p);
            let handler: Arc<dyn MessageHandler> = handler.clone();
            tokio::spawn(async move { taker_p2p.run(handler, shutdown_rx).await })
        };

        maker_transport.send("garbage").await.unwrap();
        let offer_id = OfferId::generate();
        maker_p2p.announce_public_key(&offer_id, maker()).await.unwrap();

        let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
        while handler.events.lock().is_empty() && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(handler.events.lock().len(), 1);

        shutdown_tx.send(()).unwrap();
        listener.await.unwrap();
    }

    #[tokio::test]
    async fn test_run_stops_when_transport_closes() {
        let room = MemoryRoom::new("swaps");
        let (transport, service) = node(&room, "taker", taker());
        let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);

        transport.shutdown().await.unwrap();
        tokio::time::timeout(
            Duration::from_secs(5),
            service.run(Arc::new(RecordingHandler::default()), shutdown_rx),
        )
        .await
        .unwrap();
    }
}
