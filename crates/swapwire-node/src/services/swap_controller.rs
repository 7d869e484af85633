// ============================================
// File: crates/swapwire-node/src/services/swap_controller.rs
// ============================================
//! # Swap Controller
//!
//! ## Creation Reason
//! Swaps are touched by user actions, peer messages and chain events at
//! the same time. This service is their only owner, so every change runs
//! under the swap's own lock and nothing else mutates a `Swap`.
//!
//! ## Main Functionality
//! - `SwapController`: swap table, action transitions, peer message and
//!   chain event handling
//! - `ChainEvent`: on-chain facts that move a swap forward
//!
//! ## Swap Lifecycle
//! ```text
//!  taker: Taking → TakeOfferTxPublished ─┐
//!  maker: ──────────────────────────────►AwaitingTakerInfo
//!                                            │ takerInfo
//!                                            ▼
//!                                      AwaitingMakerInfo
//!                                            │ makerInfo
//!                        ┌───────────────────┴──────────────┐
//!                        ▼ maker is seller                  ▼ maker is buyer
//!                  AwaitingFilling ── filled ──►  AwaitingPaymentSent
//!                                                        │ payment sent
//!                                                        ▼
//!                                              AwaitingPaymentReceived
//!                                                        │ payment received
//!                                                        ▼
//!                                                 AwaitingClosing
//!                                                        │ our side closed
//!                                                        ▼
//!                                                     Closed
//! ```
//!
//! ## Action Sub-States
//! `begin_action` validates and moves to `SendingTransaction`;
//! `mark_broadcast` moves to `AwaitingConfirmation`; the matching
//! `ChainEvent` completes it. `mark_failed` leaves it in `Error`, from
//! which the action may begin again.
//!
//! ## ⚠️ Important Note for Next Developer
//! - Swap locks are `parking_lot` mutexes. Never hold one across an
//!   `.await`; copy what is needed, release, send, then re-lock.
//! - A failed validation leaves the swap untouched
//!
//! ## Last Modified
//! v0.1.0 - Initial swap controller

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use swapwire_common::{InterfaceId, SwapId};
use swapwire_core::protocol::{
    MakerInformationMessage, PublicKeyAnnouncement, TakerInformationMessage,
};
use swapwire_core::swap::{validate_swap_for, ActionState, Swap, SwapAction, SwapState};

use crate::error::{NodeError, Result};
use crate::services::{KeyManagerService, MessageHandler, P2pService};

// ============================================
// ChainEvent
// ============================================

/// An on-chain fact about a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainEvent {
    /// The maker-as-seller filled the swap
    SwapFilled(SwapId),
    /// The buyer reported payment sent
    PaymentSent(SwapId),
    /// The seller reported payment received
    PaymentReceived(SwapId),
    /// The buyer closed its side
    BuyerClosed(SwapId),
    /// The seller closed its side
    SellerClosed(SwapId),
}

impl ChainEvent {
    /// Returns the swap this event is about.
    #[must_use]
    pub const fn swap_id(&self) -> &SwapId {
        match self {
            Self::SwapFilled(id)
            | Self::PaymentSent(id)
            | Self::PaymentReceived(id)
            | Self::BuyerClosed(id)
            | Self::SellerClosed(id) => id,
        }
    }

    const fn as_str(&self) -> &'static str {
        match self {
            Self::SwapFilled(_) => "swapFilled",
            Self::PaymentSent(_) => "paymentSent",
            Self::PaymentReceived(_) => "paymentReceived",
            Self::BuyerClosed(_) => "buyerClosed",
            Self::SellerClosed(_) => "sellerClosed",
        }
    }
}

// ============================================
// SwapController
// ============================================

/// Owns every swap this node takes part in.
pub struct SwapController {
    swaps: DashMap<SwapId, Arc<Mutex<Swap>>>,
    keys: Arc<KeyManagerService>,
    p2p: Arc<P2pService>,
}

impl SwapController {
    /// Creates an empty controller.
    #[must_use]
    pub fn new(keys: Arc<KeyManagerService>, p2p: Arc<P2pService>) -> Self {
        Self {
            swaps: DashMap::new(),
            keys,
            p2p,
        }
    }

    // ========================================
    // Swap Table
    // ========================================

    /// Starts tracking `swap`.
    ///
    /// # Errors
    /// `SwapExists` if a swap with the same id is already tracked.
    pub fn insert(&self, swap: Swap) -> Result<()> {
        let swap_id = swap.id;
        match self.swaps.entry(swap_id) {
            Entry::Occupied(_) => Err(NodeError::SwapExists { swap_id }),
            Entry::Vacant(slot) => {
                info!(
                    swap_id = %swap_id,
                    role = %swap.role,
                    state = %swap.state,
                    "Swap added"
                );
                slot.insert(Arc::new(Mutex::new(swap)));
                Ok(())
            }
        }
    }

    /// Returns a copy of the swap.
    #[must_use]
    pub fn snapshot(&self, swap_id: &SwapId) -> Option<Swap> {
        self.swaps.get(swap_id).map(|r| r.value().lock().clone())
    }

    /// Returns copies of all swaps.
    #[must_use]
    pub fn snapshots(&self) -> Vec<Swap> {
        self.swaps.iter().map(|r| r.value().lock().clone()).collect()
    }

    /// Returns the number of tracked swaps.
    #[must_use]
    pub fn count(&self) -> usize {
        self.swaps.len()
    }

    fn get(&self, swap_id: &SwapId) -> Result<Arc<Mutex<Swap>>> {
        self.swaps
            .get(swap_id)
            .map(|r| Arc::clone(r.value()))
            .ok_or(NodeError::SwapNotFound(*swap_id))
    }

    // ========================================
    // Action Transitions
    // ========================================

    /// Validates `action` and marks it as sending its transaction.
    ///
    /// # Errors
    /// The validation error, or `SwapNotFound`. Nothing changes on error.
    pub fn begin_action(&self, swap_id: &SwapId, action: SwapAction) -> Result<Swap> {
        let entry = self.get(swap_id)?;
        let mut swap = entry.lock();

        if let Err(e) = validate_swap_for(action, &swap) {
            debug!(swap_id = %swap_id, action = %action, reason = %e, "Action refused");
            return Err(e.into());
        }

        swap.set_action_state(action, ActionState::SendingTransaction);
        info!(swap_id = %swap_id, action = %action, "Action started");
        Ok(swap.clone())
    }

    /// Records that `action`'s transaction was broadcast.
    ///
    /// # Errors
    /// `InvalidSwapState` unless the action is sending its transaction.
    pub fn mark_broadcast(&self, swap_id: &SwapId, action: SwapAction) -> Result<Swap> {
        let entry = self.get(swap_id)?;
        let mut swap = entry.lock();

        if swap.action_state(action) != ActionState::SendingTransaction {
            return Err(NodeError::InvalidSwapState {
                swap_id: *swap_id,
                state: swap.state,
                operation: "record a broadcast",
            });
        }

        swap.set_action_state(action, ActionState::AwaitingConfirmation);
        swap.state = action.broadcast_state();
        info!(swap_id = %swap_id, action = %action, state = %swap.state, "Transaction broadcast");
        Ok(swap.clone())
    }

    /// Records that `action` failed. It may be started again.
    ///
    /// # Errors
    /// `SwapNotFound`.
    pub fn mark_failed(&self, swap_id: &SwapId, action: SwapAction) -> Result<Swap> {
        let entry = self.get(swap_id)?;
        let mut swap = entry.lock();
        swap.set_action_state(action, ActionState::Error);
        warn!(swap_id = %swap_id, action = %action, "Action failed");
        Ok(swap.clone())
    }

    // ========================================
    // Chain Events
    // ========================================

    /// Applies an on-chain event.
    ///
    /// # Errors
    /// `SwapNotFound`.
    pub fn handle_chain_event(&self, event: ChainEvent) -> Result<Swap> {
        let swap_id = event.swap_id();
        let entry = self.get(swap_id)?;
        let mut swap = entry.lock();
        let role = swap.role;

        match event {
            ChainEvent::SwapFilled(_) => {
                swap.state = SwapState::AwaitingPaymentSent;
                if role.is_maker() && role.is_seller() {
                    swap.filling = ActionState::Completed;
                }
            }
            ChainEvent::PaymentSent(_) => {
                swap.is_payment_sent = true;
                swap.state = SwapState::AwaitingPaymentReceived;
                if role.is_buyer() {
                    swap.reporting_payment_sent = ActionState::Completed;
                }
            }
            ChainEvent::PaymentReceived(_) => {
                swap.is_payment_received = true;
                swap.state = SwapState::AwaitingClosing;
                if role.is_seller() {
                    swap.reporting_payment_received = ActionState::Completed;
                }
            }
            ChainEvent::BuyerClosed(_) => {
                swap.has_buyer_closed = true;
                if role.is_buyer() {
                    swap.state = SwapState::Closed;
                    swap.closing = ActionState::Completed;
                }
            }
            ChainEvent::SellerClosed(_) => {
                swap.has_seller_closed = true;
                if role.is_seller() {
                    swap.state = SwapState::Closed;
                    swap.closing = ActionState::Completed;
                }
            }
        }

        info!(swap_id = %swap_id, event = event.as_str(), state = %swap.state, "Chain event applied");
        Ok(swap.clone())
    }

    // ========================================
    // Information Exchange
    // ========================================

    /// Sends our taker information to the maker of `swap_id`.
    ///
    /// # Errors
    /// If we are not the taker, the swap is not ready for it, a key is
    /// missing, or sending fails.
    pub async fn send_taker_information(&self, swap_id: &SwapId) -> Result<()> {
        let entry = self.get(swap_id)?;
        let (maker_id, taker_id, details) = {
            let mut swap = entry.lock();
            let ready = matches!(
                swap.state,
                SwapState::TakeOfferTransactionBroadcast | SwapState::AwaitingTakerInformation
            );
            if !swap.role.is_taker() || !ready {
                return Err(NodeError::InvalidSwapState {
                    swap_id: *swap_id,
                    state: swap.state,
                    operation: "send taker information",
                });
            }
            swap.state = SwapState::AwaitingTakerInformation;
            (
                swap.maker_interface_id,
                swap.taker_interface_id,
                swap.taker_settlement_details.clone(),
            )
        };

        let maker_public_key = self
            .keys
            .get_public_key(&maker_id)?
            .ok_or(NodeError::PublicKeyNotFound(maker_id))?;
        let taker_key_pair = self
            .keys
            .get_key_pair(&taker_id)?
            .ok_or(NodeError::KeyPairNotFound(taker_id))?;

        self.p2p
            .send_taker_information(&maker_public_key, &taker_key_pair, swap_id, details.as_deref())
            .await?;

        let mut swap = entry.lock();
        if swap.state == SwapState::AwaitingTakerInformation {
            swap.state = SwapState::AwaitingMakerInformation;
        }
        Ok(())
    }

    async fn answer_taker_information(&self, message: TakerInformationMessage) -> Result<()> {
        let swap_id = message.swap_id;
        let entry = self.get(&swap_id)?;
        let sender = *message.public_key.interface_id();

        let (maker_id, details) = {
            let mut swap = entry.lock();
            if !swap.role.is_maker() || swap.state != SwapState::AwaitingTakerInformation {
                return Err(NodeError::InvalidSwapState {
                    swap_id,
                    state: swap.state,
                    operation: "accept taker information",
                });
            }
            if sender != swap.taker_interface_id {
                return Err(NodeError::counterparty_mismatch(
                    swap_id,
                    "taker information not signed by the swap taker",
                ));
            }
            let details = swap
                .maker_settlement_details
                .clone()
                .ok_or(NodeError::MissingSettlementDetails(swap_id))?;

            // Claimed while answering so a duplicate delivery is refused
            swap.state = SwapState::AwaitingMakerInformation;
            (swap.maker_interface_id, details)
        };

        if let Err(e) = self.reply_with_maker_information(&message, &maker_id, &details).await {
            let mut swap = entry.lock();
            if swap.state == SwapState::AwaitingMakerInformation {
                swap.state = SwapState::AwaitingTakerInformation;
            }
            warn!(swap_id = %swap_id, error = %e, "Answering taker information failed");
            return Err(e);
        }

        let mut swap = entry.lock();
        swap.taker_settlement_details = message.settlement_method_details;
        if swap.state == SwapState::AwaitingMakerInformation {
            swap.state = swap.state_after_information_exchange();
        }
        info!(swap_id = %swap_id, state = %swap.state, "Taker information answered");
        Ok(())
    }

    async fn reply_with_maker_information(
        &self,
        message: &TakerInformationMessage,
        maker_id: &InterfaceId,
        details: &str,
    ) -> Result<()> {
        self.keys.store_public_key(&message.public_key)?;
        let maker_key_pair = self
            .keys
            .get_key_pair(maker_id)?
            .ok_or(NodeError::KeyPairNotFound(*maker_id))?;

        self.p2p
            .send_maker_information(&message.public_key, &maker_key_pair, &message.swap_id, details)
            .await
    }

    fn accept_maker_information(
        &self,
        message: MakerInformationMessage,
        sender: InterfaceId,
        recipient: InterfaceId,
    ) -> Result<()> {
        let swap_id = message.swap_id;
        let entry = self.get(&swap_id)?;
        let mut swap = entry.lock();

        let expecting = matches!(
            swap.state,
            SwapState::AwaitingTakerInformation | SwapState::AwaitingMakerInformation
        );
        if !swap.role.is_taker() || !expecting {
            return Err(NodeError::InvalidSwapState {
                swap_id,
                state: swap.state,
                operation: "accept maker information",
            });
        }
        if sender != swap.maker_interface_id || recipient != swap.taker_interface_id {
            return Err(NodeError::counterparty_mismatch(
                swap_id,
                "maker information not between the swap's maker and taker",
            ));
        }

        swap.maker_settlement_details = Some(message.settlement_method_details);
        swap.state = swap.state_after_information_exchange();
        info!(swap_id = %swap_id, state = %swap.state, "Maker information received");
        Ok(())
    }
}

#[async_trait]
impl MessageHandler for SwapController {
    async fn on_public_key_announcement(&self, announcement: PublicKeyAnnouncement) -> Result<()> {
        debug!(offer_id = %announcement.offer_id, "Public key announced");
        self.keys.store_public_key(&announcement.public_key)
    }

    async fn on_taker_information(&self, message: TakerInformationMessage) -> Result<()> {
        self.answer_taker_information(message).await
    }

    async fn on_maker_information(
        &self,
        message: MakerInformationMessage,
        sender: InterfaceId,
        recipient: InterfaceId,
    ) -> Result<()> {
        self.accept_maker_information(message, sender, recipient)
    }
}

impl std::fmt::Debug for SwapController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwapController")
            .field("swaps", &self.swaps.len())
            .finish_non_exhaustive()
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use std::sync::OnceLock;

    use swapwire_core::crypto::KeyPair;
    use swapwire_core::swap::SwapRole;
    use swapwire_transport::{MemoryRoom, MemoryTransport, PeerTransport};

    use super::*;

    fn maker() -> &'static KeyPair {
        static KEY: OnceLock<KeyPair> = OnceLock::new();
        KEY.get_or_init(|| KeyPair::generate().unwrap())
    }

    fn taker() -> &'static KeyPair {
        static KEY: OnceLock<KeyPair> = OnceLock::new();
        KEY.get_or_init(|| KeyPair::generate().unwrap())
    }

    struct Node {
        transport: Arc<MemoryTransport>,
        p2p: Arc<P2pService>,
        keys: Arc<KeyManagerService>,
        controller: SwapController,
    }

    fn node(room: &Arc<MemoryRoom>, name: &str, own: &KeyPair) -> Node {
        let transport = Arc::new(room.join(name));
        let keys = Arc::new(KeyManagerService::in_memory());
        keys.import_key_pair(own).unwrap();
        let p2p = Arc::new(P2pService::new(transport.clone(), keys.clone(), 64 * 1024));
        let controller = SwapController::new(keys.clone(), p2p.clone());
        Node {
            transport,
            p2p,
            keys,
            controller,
        }
    }

    fn lone_controller() -> SwapController {
        let room = MemoryRoom::new("swaps");
        node(&room, "solo", maker()).controller
    }

    fn ids() -> (InterfaceId, InterfaceId) {
        (
            InterfaceId::from_bytes([1; 32]),
            InterfaceId::from_bytes([2; 32]),
        )
    }

    #[test]
    fn test_insert_and_snapshot() {
        let controller = lone_controller();
        let (maker_id, taker_id) = ids();
        let swap = Swap::new(SwapId::generate(), SwapRole::MakerAndBuyer, maker_id, taker_id);
        let swap_id = swap.id;

        controller.insert(swap.clone()).unwrap();
        assert_eq!(controller.snapshot(&swap_id), Some(swap.clone()));
        assert_eq!(controller.snapshots().len(), 1);
        assert!(matches!(
            controller.insert(swap),
            Err(NodeError::SwapExists { .. })
        ));
        assert!(controller.snapshot(&SwapId::generate()).is_none());
    }

    #[test]
    fn test_fill_lifecycle() {
        let controller = lone_controller();
        let (maker_id, taker_id) = ids();
        let swap = Swap::new(SwapId::generate(), SwapRole::MakerAndSeller, maker_id, taker_id)
            .with_state(SwapState::AwaitingFilling);
        let swap_id = swap.id;
        controller.insert(swap).unwrap();

        let started = controller.begin_action(&swap_id, SwapAction::Fill).unwrap();
        assert_eq!(started.filling, ActionState::SendingTransaction);

        // Already in flight
        let err = controller.begin_action(&swap_id, SwapAction::Fill).unwrap_err();
        assert_eq!(err.to_string(), "This Swap is already being filled.");

        let broadcast = controller.mark_broadcast(&swap_id, SwapAction::Fill).unwrap();
        assert_eq!(broadcast.state, SwapState::FillSwapTransactionBroadcast);
        assert_eq!(broadcast.filling, ActionState::AwaitingConfirmation);

        let filled = controller
            .handle_chain_event(ChainEvent::SwapFilled(swap_id))
            .unwrap();
        assert_eq!(filled.state, SwapState::AwaitingPaymentSent);
        assert_eq!(filled.filling, ActionState::Completed);
    }

    #[test]
    fn test_refused_action_leaves_swap_untouched() {
        let controller = lone_controller();
        let (maker_id, taker_id) = ids();
        let swap = Swap::new(SwapId::generate(), SwapRole::TakerAndSeller, maker_id, taker_id)
            .with_state(SwapState::AwaitingPaymentSent);
        let swap_id = swap.id;
        controller.insert(swap.clone()).unwrap();

        let err = controller
            .begin_action(&swap_id, SwapAction::ReportPaymentSent)
            .unwrap_err();
        assert!(err.is_validation_error());
        assert_eq!(err.to_string(), "Only the Buyer can report sending payment");
        assert_eq!(controller.snapshot(&swap_id), Some(swap));

        assert!(matches!(
            controller.mark_broadcast(&swap_id, SwapAction::ReportPaymentSent),
            Err(NodeError::InvalidSwapState { .. })
        ));
    }

    #[test]
    fn test_failed_action_can_restart() {
        let controller = lone_controller();
        let (maker_id, taker_id) = ids();
        let swap = Swap::new(SwapId::generate(), SwapRole::TakerAndBuyer, maker_id, taker_id)
            .with_state(SwapState::AwaitingClosing);
        let swap_id = swap.id;
        controller.insert(swap).unwrap();

        controller.begin_action(&swap_id, SwapAction::Close).unwrap();
        let failed = controller.mark_failed(&swap_id, SwapAction::Close).unwrap();
        assert_eq!(failed.closing, ActionState::Error);
        assert!(controller.begin_action(&swap_id, SwapAction::Close).is_ok());
    }

    #[test]
    fn test_chain_events_through_closing() {
        let controller = lone_controller();
        let (maker_id, taker_id) = ids();
        let swap = Swap::new(SwapId::generate(), SwapRole::TakerAndBuyer, maker_id, taker_id)
            .with_state(SwapState::AwaitingPaymentSent);
        let swap_id = swap.id;
        controller.insert(swap).unwrap();

        let sent = controller
            .handle_chain_event(ChainEvent::PaymentSent(swap_id))
            .unwrap();
        assert!(sent.is_payment_sent);
        assert_eq!(sent.reporting_payment_sent, ActionState::Completed);
        assert_eq!(sent.state, SwapState::AwaitingPaymentReceived);

        let received = controller
            .handle_chain_event(ChainEvent::PaymentReceived(swap_id))
            .unwrap();
        assert_eq!(received.state, SwapState::AwaitingClosing);
        assert_eq!(received.reporting_payment_received, ActionState::None);

        // The seller closing does not close our buyer side
        let seller_closed = controller
            .handle_chain_event(ChainEvent::SellerClosed(swap_id))
            .unwrap();
        assert!(seller_closed.has_seller_closed);
        assert_eq!(seller_closed.state, SwapState::AwaitingClosing);

        let closed = controller
            .handle_chain_event(ChainEvent::BuyerClosed(swap_id))
            .unwrap();
        assert_eq!(closed.state, SwapState::Closed);
        assert_eq!(closed.closing, ActionState::Completed);

        assert!(matches!(
            controller.handle_chain_event(ChainEvent::PaymentSent(SwapId::generate())),
            Err(NodeError::SwapNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_information_exchange_between_nodes() {
        let room = MemoryRoom::new("swaps");
        let maker_node = node(&room, "maker", maker());
        let taker_node = node(&room, "taker", taker());
        let swap_id = SwapId::generate();
        let maker_id = *maker().interface_id();
        let taker_id = *taker().interface_id();

        // The taker learned the maker's key from its announcement
        taker_node.keys.store_public_key(maker().public_key()).unwrap();

        maker_node
            .controller
            .insert(
                Swap::new(swap_id, SwapRole::MakerAndSeller, maker_id, taker_id)
                    .with_own_settlement_details("maker iban"),
            )
            .unwrap();
        taker_node
            .controller
            .insert(
                Swap::new(swap_id, SwapRole::TakerAndBuyer, maker_id, taker_id)
                    .with_state(SwapState::TakeOfferTransactionBroadcast)
                    .with_own_settlement_details("taker iban"),
            )
            .unwrap();

        taker_node.controller.send_taker_information(&swap_id).await.unwrap();
        assert_eq!(
            taker_node.controller.snapshot(&swap_id).unwrap().state,
            SwapState::AwaitingMakerInformation
        );

        let inbound = maker_node.transport.recv().await.unwrap();
        assert!(maker_node.p2p.dispatch(&inbound.body, &maker_node.controller).await);
        let maker_view = maker_node.controller.snapshot(&swap_id).unwrap();
        assert_eq!(maker_view.state, SwapState::AwaitingFilling);
        assert_eq!(maker_view.taker_settlement_details.as_deref(), Some("taker iban"));
        assert!(maker_node.keys.get_public_key(&taker_id).unwrap().is_some());

        let inbound = taker_node.transport.recv().await.unwrap();
        assert!(taker_node.p2p.dispatch(&inbound.body, &taker_node.controller).await);
        let taker_view = taker_node.controller.snapshot(&swap_id).unwrap();
        assert_eq!(taker_view.state, SwapState::AwaitingFilling);
        assert_eq!(taker_view.maker_settlement_details.as_deref(), Some("maker iban"));
    }

    #[tokio::test]
    async fn test_taker_information_from_wrong_sender_ignored() {
        let room = MemoryRoom::new("swaps");
        let maker_node = node(&room, "maker", maker());
        let swap_id = SwapId::generate();
        let stranger = InterfaceId::from_bytes([7; 32]);

        maker_node
            .controller
            .insert(
                Swap::new(swap_id, SwapRole::MakerAndBuyer, *maker().interface_id(), stranger)
                    .with_own_settlement_details("maker iban"),
            )
            .unwrap();

        let message = TakerInformationMessage {
            swap_id,
            public_key: taker().public_key().clone(),
            settlement_method_details: None,
        };
        let err = maker_node
            .controller
            .on_taker_information(message)
            .await
            .unwrap_err();
        assert!(matches!(err, NodeError::CounterpartyMismatch { .. }));

        let view = maker_node.controller.snapshot(&swap_id).unwrap();
        assert_eq!(view.state, SwapState::AwaitingTakerInformation);
        assert_eq!(maker_node.transport.take_sent().len(), 0);
    }

    #[tokio::test]
    async fn test_taker_information_retried_after_missing_key_pair() {
        let room = MemoryRoom::new("swaps");
        // Our own maker key pair has not been imported yet
        let maker_node = node(&room, "maker", taker());
        let swap_id = SwapId::generate();
        let maker_id = *maker().interface_id();
        let taker_id = *taker().interface_id();

        maker_node
            .controller
            .insert(
                Swap::new(swap_id, SwapRole::MakerAndSeller, maker_id, taker_id)
                    .with_own_settlement_details("maker iban"),
            )
            .unwrap();

        let message = TakerInformationMessage {
            swap_id,
            public_key: taker().public_key().clone(),
            settlement_method_details: Some("taker iban".to_string()),
        };

        let err = maker_node
            .controller
            .on_taker_information(message.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, NodeError::KeyPairNotFound(_)));
        let view = maker_node.controller.snapshot(&swap_id).unwrap();
        assert_eq!(view.state, SwapState::AwaitingTakerInformation);
        assert!(view.taker_settlement_details.is_none());
        assert!(maker_node.transport.take_sent().is_empty());

        maker_node.keys.import_key_pair(maker()).unwrap();
        maker_node.controller.on_taker_information(message).await.unwrap();

        let view = maker_node.controller.snapshot(&swap_id).unwrap();
        assert_eq!(view.state, SwapState::AwaitingFilling);
        assert_eq!(view.taker_settlement_details.as_deref(), Some("taker iban"));
        assert_eq!(maker_node.transport.take_sent().len(), 1);
    }

    #[tokio::test]
    async fn test_send_taker_information_requires_taker_role() {
        let room = MemoryRoom::new("swaps");
        let maker_node = node(&room, "maker", maker());
        let (maker_id, taker_id) = ids();
        let swap = Swap::new(SwapId::generate(), SwapRole::MakerAndBuyer, maker_id, taker_id);
        let swap_id = swap.id;
        maker_node.controller.insert(swap).unwrap();

        let err = maker_node
            .controller
            .send_taker_information(&swap_id)
            .await
            .unwrap_err();
        assert!(matches!(err, NodeError::InvalidSwapState { .. }));
    }
}
