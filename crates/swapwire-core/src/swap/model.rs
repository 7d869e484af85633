// ============================================
// File: crates/swapwire-core/src/swap/model.rs
// ============================================
//! # Swap Model
//!
//! ## Creation Reason
//! The swap aggregate the validators inspect and the controller mutates.
//!
//! ## Main Functionality
//! - `SwapRole`: which side of the swap this node is on
//! - `SwapState`: contract lifecycle phase
//! - `ActionState`: progress of one user-initiated action
//! - `SwapAction`: the four actions gated by validators
//! - `Swap`: the aggregate
//!
//! ## Lifecycle
//! ```text
//! Taking ─► TakeOfferTransactionBroadcast ─► AwaitingTakerInformation
//!   ─► AwaitingMakerInformation ─┬─► AwaitingFilling ─► FillSwapTransactionBroadcast ─┐
//!                                └────────────────────────────────────────────────────┤
//!                                                                                     ▼
//!   AwaitingPaymentSent ─► ReportPaymentSentTransactionBroadcast ─► AwaitingPaymentReceived
//!   ─► ReportPaymentReceivedTransactionBroadcast ─► AwaitingClosing
//!   ─► CloseSwapTransactionBroadcast ─► Closed
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Only the swap controller may mutate a `Swap` that other components
//!   can see; everyone else works on clones
//! - Settlement details are private and redacted from `Debug`
//!
//! ## Last Modified
//! v0.1.0 - Initial swap model

use std::fmt;

use serde::{Deserialize, Serialize};

use swapwire_common::{InterfaceId, SwapId};

// ============================================
// SwapRole
// ============================================

/// This node's side of a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SwapRole {
    /// Made the offer, buys the stablecoin
    MakerAndBuyer,
    /// Made the offer, sells the stablecoin
    MakerAndSeller,
    /// Took the offer, buys the stablecoin
    TakerAndBuyer,
    /// Took the offer, sells the stablecoin
    TakerAndSeller,
}

impl SwapRole {
    /// Checks if this node made the offer.
    #[must_use]
    pub const fn is_maker(&self) -> bool {
        matches!(self, Self::MakerAndBuyer | Self::MakerAndSeller)
    }

    /// Checks if this node took the offer.
    #[must_use]
    pub const fn is_taker(&self) -> bool {
        !self.is_maker()
    }

    /// Checks if this node is the buyer.
    #[must_use]
    pub const fn is_buyer(&self) -> bool {
        matches!(self, Self::MakerAndBuyer | Self::TakerAndBuyer)
    }

    /// Checks if this node is the seller.
    #[must_use]
    pub const fn is_seller(&self) -> bool {
        !self.is_buyer()
    }

    /// Checks if the maker of this swap is the seller, whichever side we are.
    ///
    /// Such swaps must be filled by the maker before payment is sent.
    #[must_use]
    pub const fn maker_is_seller(&self) -> bool {
        matches!(self, Self::MakerAndSeller | Self::TakerAndBuyer)
    }

    /// Returns the stored string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MakerAndBuyer => "makerAndBuyer",
            Self::MakerAndSeller => "makerAndSeller",
            Self::TakerAndBuyer => "takerAndBuyer",
            Self::TakerAndSeller => "takerAndSeller",
        }
    }
}

impl fmt::Display for SwapRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================
// SwapState
// ============================================

/// Contract lifecycle phase of a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SwapState {
    /// Taker is preparing the take-offer transaction
    Taking,
    /// Take-offer transaction sent, waiting for the chain
    #[serde(rename = "takeOfferTxPublished")]
    TakeOfferTransactionBroadcast,
    /// Maker waits for, or taker is sending, taker information
    #[serde(rename = "awaitingTakerInfo")]
    AwaitingTakerInformation,
    /// Taker waits for, or maker is sending, maker information
    #[serde(rename = "awaitingMakerInfo")]
    AwaitingMakerInformation,
    /// Maker-as-seller must fill the swap
    AwaitingFilling,
    /// Fill transaction sent
    FillSwapTransactionBroadcast,
    /// Buyer must send payment and report it
    AwaitingPaymentSent,
    /// Report-payment-sent transaction sent
    ReportPaymentSentTransactionBroadcast,
    /// Seller must confirm receipt of payment
    AwaitingPaymentReceived,
    /// Report-payment-received transaction sent
    ReportPaymentReceivedTransactionBroadcast,
    /// Either party may close
    AwaitingClosing,
    /// Close transaction sent
    CloseSwapTransactionBroadcast,
    /// This node's side of the swap is closed
    Closed,
}

impl SwapState {
    /// Returns the stored string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Taking => "taking",
            Self::TakeOfferTransactionBroadcast => "takeOfferTxPublished",
            Self::AwaitingTakerInformation => "awaitingTakerInfo",
            Self::AwaitingMakerInformation => "awaitingMakerInfo",
            Self::AwaitingFilling => "awaitingFilling",
            Self::FillSwapTransactionBroadcast => "fillSwapTransactionBroadcast",
            Self::AwaitingPaymentSent => "awaitingPaymentSent",
            Self::ReportPaymentSentTransactionBroadcast => "reportPaymentSentTransactionBroadcast",
            Self::AwaitingPaymentReceived => "awaitingPaymentReceived",
            Self::ReportPaymentReceivedTransactionBroadcast => {
                "reportPaymentReceivedTransactionBroadcast"
            }
            Self::AwaitingClosing => "awaitingClosing",
            Self::CloseSwapTransactionBroadcast => "closeSwapTransactionBroadcast",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for SwapState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================
// ActionState
// ============================================

/// Progress of one user-initiated action on a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionState {
    /// Not started
    #[default]
    None,
    /// Being checked
    Validating,
    /// Transaction being built and sent
    SendingTransaction,
    /// Transaction sent, waiting for the chain
    AwaitingConfirmation,
    /// Confirmed on chain
    Completed,
    /// Last attempt failed
    Error,
}

impl ActionState {
    /// Checks if a new attempt may start from this state.
    #[must_use]
    pub const fn can_begin(&self) -> bool {
        matches!(self, Self::None | Self::Validating | Self::Error)
    }
}

// ============================================
// SwapAction
// ============================================

/// A state-changing action that must pass a validator first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SwapAction {
    /// Maker-as-seller deposits the stablecoin
    Fill,
    /// Buyer reports that payment was sent
    ReportPaymentSent,
    /// Seller reports that payment was received
    ReportPaymentReceived,
    /// Either party closes its side
    Close,
}

impl SwapAction {
    /// Returns the phase the swap enters once this action's transaction is sent.
    #[must_use]
    pub const fn broadcast_state(&self) -> SwapState {
        match self {
            Self::Fill => SwapState::FillSwapTransactionBroadcast,
            Self::ReportPaymentSent => SwapState::ReportPaymentSentTransactionBroadcast,
            Self::ReportPaymentReceived => SwapState::ReportPaymentReceivedTransactionBroadcast,
            Self::Close => SwapState::CloseSwapTransactionBroadcast,
        }
    }

    /// Returns a short name for logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fill => "fill",
            Self::ReportPaymentSent => "reportPaymentSent",
            Self::ReportPaymentReceived => "reportPaymentReceived",
            Self::Close => "close",
        }
    }
}

impl fmt::Display for SwapAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================
// Swap
// ============================================

/// A swap between a maker and a taker, seen from this node.
#[derive(Clone, PartialEq, Eq)]
pub struct Swap {
    /// Swap id, equal to the id of the taken offer
    pub id: SwapId,
    /// This node's role
    pub role: SwapRole,
    /// Lifecycle phase
    pub state: SwapState,
    /// Interface id the maker announced for the offer
    pub maker_interface_id: InterfaceId,
    /// Interface id the taker took the offer with
    pub taker_interface_id: InterfaceId,
    /// Whether the maker must fill before payment
    pub requires_fill: bool,
    /// Chain flag: buyer reported payment sent
    pub is_payment_sent: bool,
    /// Chain flag: seller reported payment received
    pub is_payment_received: bool,
    /// Chain flag: buyer closed
    pub has_buyer_closed: bool,
    /// Chain flag: seller closed
    pub has_seller_closed: bool,
    /// Fill progress
    pub filling: ActionState,
    /// Report-payment-sent progress
    pub reporting_payment_sent: ActionState,
    /// Report-payment-received progress
    pub reporting_payment_received: ActionState,
    /// Close progress
    pub closing: ActionState,
    /// Maker's private settlement details once known
    pub maker_settlement_details: Option<String>,
    /// Taker's private settlement details once known
    pub taker_settlement_details: Option<String>,
}

impl Swap {
    /// Creates a swap in its role's initial phase.
    ///
    /// Makers learn of a swap once it is taken and wait for taker
    /// information; takers start while taking.
    #[must_use]
    pub fn new(
        id: SwapId,
        role: SwapRole,
        maker_interface_id: InterfaceId,
        taker_interface_id: InterfaceId,
    ) -> Self {
        let state = if role.is_maker() {
            SwapState::AwaitingTakerInformation
        } else {
            SwapState::Taking
        };
        Self {
            id,
            role,
            state,
            maker_interface_id,
            taker_interface_id,
            requires_fill: role.maker_is_seller(),
            is_payment_sent: false,
            is_payment_received: false,
            has_buyer_closed: false,
            has_seller_closed: false,
            filling: ActionState::None,
            reporting_payment_sent: ActionState::None,
            reporting_payment_received: ActionState::None,
            closing: ActionState::None,
            maker_settlement_details: None,
            taker_settlement_details: None,
        }
    }

    /// Sets the lifecycle phase.
    #[must_use]
    pub fn with_state(mut self, state: SwapState) -> Self {
        self.state = state;
        self
    }

    /// Sets our own settlement details.
    #[must_use]
    pub fn with_own_settlement_details(mut self, details: impl Into<String>) -> Self {
        let details = Some(details.into());
        if self.role.is_maker() {
            self.maker_settlement_details = details;
        } else {
            self.taker_settlement_details = details;
        }
        self
    }

    /// Returns the progress of `action`.
    #[must_use]
    pub const fn action_state(&self, action: SwapAction) -> ActionState {
        match action {
            SwapAction::Fill => self.filling,
            SwapAction::ReportPaymentSent => self.reporting_payment_sent,
            SwapAction::ReportPaymentReceived => self.reporting_payment_received,
            SwapAction::Close => self.closing,
        }
    }

    /// Sets the progress of `action`.
    pub fn set_action_state(&mut self, action: SwapAction, state: ActionState) {
        match action {
            SwapAction::Fill => self.filling = state,
            SwapAction::ReportPaymentSent => self.reporting_payment_sent = state,
            SwapAction::ReportPaymentReceived => self.reporting_payment_received = state,
            SwapAction::Close => self.closing = state,
        }
    }

    /// Returns the phase that follows the taker/maker information exchange.
    #[must_use]
    pub const fn state_after_information_exchange(&self) -> SwapState {
        if self.requires_fill {
            SwapState::AwaitingFilling
        } else {
            SwapState::AwaitingPaymentSent
        }
    }

    /// Returns our own settlement details.
    #[must_use]
    pub fn own_settlement_details(&self) -> Option<&str> {
        if self.role.is_maker() {
            self.maker_settlement_details.as_deref()
        } else {
            self.taker_settlement_details.as_deref()
        }
    }
}

impl fmt::Debug for Swap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |d: &Option<String>| d.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("Swap")
            .field("id", &self.id)
            .field("role", &self.role)
            .field("state", &self.state)
            .field("maker_interface_id", &self.maker_interface_id)
            .field("taker_interface_id", &self.taker_interface_id)
            .field("filling", &self.filling)
            .field("reporting_payment_sent", &self.reporting_payment_sent)
            .field("reporting_payment_received", &self.reporting_payment_received)
            .field("closing", &self.closing)
            .field("maker_settlement_details", &redact(&self.maker_settlement_details))
            .field("taker_settlement_details", &redact(&self.taker_settlement_details))
            .finish_non_exhaustive()
    }
}

// ============================================
// Tests
// ============================================
