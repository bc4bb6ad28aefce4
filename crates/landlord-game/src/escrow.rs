//! Trade escrow: proposals validated up front, settled later as an
//! all-or-nothing saga.
//!
//! Settlement applies six legs in a fixed order. Every leg that succeeds is
//! recorded as an [`AppliedLeg`]; if a later leg fails, the recorded legs are
//! undone newest first and the board ends up exactly as it was before the
//! acceptance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::board::Outcome;
use crate::{ledger, Board, CardId, GameError, PlayerId};

// ---------------------------------------------------------------------------
// Wire-facing types
// ---------------------------------------------------------------------------

/// One side of a trade: money, properties (slot indices) and cards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TradeBundle {
    pub money: i64,
    pub property: Vec<usize>,
    pub cards: Vec<CardId>,
}

impl TradeBundle {
    fn describe(&self) -> String {
        let mut parts = Vec::new();
        if self.money > 0 {
            parts.push(format!("${}", self.money));
        }
        if !self.property.is_empty() {
            parts.push(format!("{} properties", self.property.len()));
        }
        if !self.cards.is_empty() {
            parts.push(format!("{} cards", self.cards.len()));
        }
        if parts.is_empty() {
            "nothing".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// A trade as submitted by a client. The identifying fields are optional on
/// the wire so their absence can be reported precisely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRequest {
    #[serde(default)]
    pub requester: Option<PlayerId>,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub responder: Option<PlayerId>,
    /// What the requester offers.
    #[serde(default)]
    pub give: TradeBundle,
    /// What the requester wants back.
    #[serde(default)]
    pub take: TradeBundle,
}

/// A validated, pending trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeProposal {
    /// Position in the board's trade list.
    pub id: usize,
    pub requester: PlayerId,
    pub responder: PlayerId,
    pub give: TradeBundle,
    pub take: TradeBundle,
    pub accepted: bool,
    /// Cleared once settled or when a participant leaves.
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeEvent {
    Proposed,
    Settled,
}

/// Append-only audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub trade_id: usize,
    pub requester_name: String,
    pub responder_name: String,
    pub give: TradeBundle,
    pub take: TradeBundle,
    pub event: TradeEvent,
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Settlement legs
// ---------------------------------------------------------------------------

/// One transfer in a settlement, by player id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppliedLeg {
    Money { from: PlayerId, to: PlayerId, amount: i64 },
    Property { from: PlayerId, to: PlayerId, ids: Vec<usize> },
    Cards { from: PlayerId, to: PlayerId, ids: Vec<CardId> },
}

impl AppliedLeg {
    /// The same transfer in the opposite direction.
    fn inverse(&self) -> Self {
        match self.clone() {
            Self::Money { from, to, amount } => Self::Money { from: to, to: from, amount },
            Self::Property { from, to, ids } => Self::Property { from: to, to: from, ids },
            Self::Cards { from, to, ids } => Self::Cards { from: to, to: from, ids },
        }
    }

    fn is_noop(&self) -> bool {
        match self {
            Self::Money { amount, .. } => *amount == 0,
            Self::Property { ids, .. } => ids.is_empty(),
            Self::Cards { ids, .. } => ids.is_empty(),
        }
    }
}

/// Legs of `trade` in settlement order, skipping empty ones.
fn settlement_plan(trade: &TradeProposal) -> Vec<AppliedLeg> {
    let (req, resp) = (trade.requester, trade.responder);
    [
        AppliedLeg::Money { from: req, to: resp, amount: trade.give.money },
        AppliedLeg::Money { from: resp, to: req, amount: trade.take.money },
        AppliedLeg::Property { from: req, to: resp, ids: trade.give.property.clone() },
        AppliedLeg::Property { from: resp, to: req, ids: trade.take.property.clone() },
        AppliedLeg::Cards { from: req, to: resp, ids: trade.give.cards.clone() },
        AppliedLeg::Cards { from: resp, to: req, ids: trade.take.cards.clone() },
    ]
    .into_iter()
    .filter(|leg| !leg.is_noop())
    .collect()
}

// ---------------------------------------------------------------------------
// Board operations
// ---------------------------------------------------------------------------

impl Board {
    /// Validates and records a trade proposal. No assets move.
    pub fn propose_trade(
        &mut self,
        sender: PlayerId,
        request: TradeRequest,
    ) -> Result<Outcome, GameError> {
        let requester = request.requester.ok_or(GameError::MissingTradeField("requester"))?;
        request.id.ok_or(GameError::MissingTradeField("id"))?;
        let responder = request.responder.ok_or(GameError::MissingTradeField("responder"))?;

        if requester != sender {
            return Err(GameError::NotYourTrade);
        }
        if requester == responder {
            return Err(GameError::SelfTrade);
        }
        let req_idx = self.index_of(requester)?;
        let resp_idx = self.index_of(responder)?;

        for amount in [request.give.money, request.take.money] {
            if amount < 0 {
                return Err(GameError::InvalidAmount(amount));
            }
        }
        ledger::check_properties(&self.slots, requester, &request.give.property)?;
        ledger::check_properties(&self.slots, responder, &request.take.property)?;
        ledger::check_cards(&self.players[req_idx], &request.give.cards)?;
        ledger::check_cards(&self.players[resp_idx], &request.take.cards)?;
        ledger::ensure_funds(&self.players[req_idx], request.give.money)?;
        ledger::ensure_funds(&self.players[resp_idx], request.take.money)?;

        let proposal = TradeProposal {
            id: self.trades.len(),
            requester,
            responder,
            give: request.give,
            take: request.take,
            accepted: false,
            active: true,
        };
        let narration = format!(
            "New trade added, id: {}. {} offers {} to {} for {}",
            proposal.id,
            self.players[req_idx].name,
            proposal.give.describe(),
            self.players[resp_idx].name,
            proposal.take.describe(),
        );
        self.record(&proposal, TradeEvent::Proposed);
        tracing::info!(trade_id = proposal.id, %requester, %responder, "trade proposed");
        self.trades.push(proposal);

        Ok(Outcome::broadcast(narration))
    }

    /// Settles a pending trade on behalf of its responder.
    pub fn accept_trade(&mut self, acceptor: PlayerId, trade_id: usize) -> Result<Outcome, GameError> {
        let trade = self
            .trades
            .get(trade_id)
            .filter(|t| t.active)
            .cloned()
            .ok_or(GameError::TradeNotFound(trade_id))?;
        if trade.responder != acceptor {
            return Err(GameError::NotYourTrade);
        }
        let req_idx = self.index_of(trade.requester)?;
        let resp_idx = self.index_of(trade.responder)?;

        let mut applied: Vec<AppliedLeg> = Vec::new();
        for leg in settlement_plan(&trade) {
            if let Err(err) = self.apply_leg(&leg) {
                tracing::debug!(trade_id, legs = applied.len(), error = %err, "settlement failed, rolling back");
                self.rollback(applied);
                return Err(err);
            }
            applied.push(leg);
        }

        if let Some(stored) = self.trades.get_mut(trade_id) {
            stored.accepted = true;
            stored.active = false;
        }
        self.record(&trade, TradeEvent::Settled);
        tracing::info!(trade_id, legs = applied.len(), "trade settled");

        Ok(Outcome::broadcast(format!(
            "{} accepted trade {trade_id} from {}",
            self.players[resp_idx].name, self.players[req_idx].name
        )))
    }

    fn apply_leg(&mut self, leg: &AppliedLeg) -> Result<(), GameError> {
        match leg {
            AppliedLeg::Money { from, to, amount } => {
                let (from, to) = (self.index_of(*from)?, self.index_of(*to)?);
                ledger::transfer(&mut self.players, from, to, *amount)
            }
            AppliedLeg::Property { from, to, ids } => {
                ledger::move_properties(&mut self.slots, *from, *to, ids)
            }
            AppliedLeg::Cards { from, to, ids } => {
                let (from, to) = (self.index_of(*from)?, self.index_of(*to)?);
                ledger::move_cards(&mut self.players, from, to, ids)
            }
        }
    }

    /// Undoes applied legs newest first. Each inverse only returns what its
    /// leg just delivered, so it cannot fail while the board lock is held.
    fn rollback(&mut self, applied: Vec<AppliedLeg>) {
        for leg in applied.into_iter().rev() {
            if let Err(err) = self.apply_leg(&leg.inverse()) {
                tracing::error!(?leg, error = %err, "trade rollback leg failed");
            }
        }
    }

    fn record(&mut self, trade: &TradeProposal, event: TradeEvent) {
        let name_of = |id: PlayerId| {
            self.player(id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| id.to_string())
        };
        let record = TradeRecord {
            trade_id: trade.id,
            requester_name: name_of(trade.requester),
            responder_name: name_of(trade.responder),
            give: trade.give.clone(),
            take: trade.take.clone(),
            event,
            timestamp: Utc::now(),
        };
        self.history.push(record);
    }
}
