//! The authoritative state of one game and its turn rules.
//!
//! `Board` is not synchronised internally. The owning room wraps it in a
//! mutex and every operation here runs to completion under that lock.

use serde::{Deserialize, Serialize};

use crate::card::standard_deck;
use crate::dice::{Dice, RandomDice};
use crate::escrow::{TradeProposal, TradeRecord};
use crate::ledger;
use crate::slot::{standard_layout, MAX_TIER};
use crate::turn::{Obligation, TurnPhase};
use crate::{Card, CardEffect, CardId, GameError, JailStatus, Player, PlayerId, Slot, SlotKind};

// ---------------------------------------------------------------------------
// GameRules
// ---------------------------------------------------------------------------

/// Tunable constants of the rules engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRules {
    /// Cash each player starts with.
    pub starting_balance: i64,
    /// Jail turns served before automatic release.
    pub jail_sentence: u8,
    /// Largest step count a roll can produce.
    pub max_roll: u32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            starting_balance: 1500,
            jail_sentence: 3,
            max_roll: 12,
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// The visible result of a successful board operation.
///
/// `broadcast` is narration for the whole room, `prompt` is addressed to the
/// acting player only. Either may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub broadcast: Option<String>,
    pub prompt: Option<String>,
}

impl Outcome {
    pub fn broadcast(text: impl Into<String>) -> Self {
        Self {
            broadcast: Some(text.into()),
            prompt: None,
        }
    }

    pub fn prompt(text: impl Into<String>) -> Self {
        Self {
            broadcast: None,
            prompt: Some(text.into()),
        }
    }

    /// Appends a sentence to the broadcast narration.
    fn narrate(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.broadcast = Some(match self.broadcast.take() {
            Some(existing) => format!("{existing}. {text}"),
            None => text,
        });
        self
    }
}

/// Result of resolving the slot a player landed on.
struct Landing {
    narration: Option<String>,
    prompt: Option<String>,
    phase: TurnPhase,
}

impl Landing {
    fn done(narration: String) -> Self {
        Self {
            narration: Some(narration),
            prompt: None,
            phase: TurnPhase::TurnComplete,
        }
    }
}

/// A failed landing that left a debt behind.
struct Unpaid {
    error: GameError,
    obligation: Option<Obligation>,
}

impl From<GameError> for Unpaid {
    fn from(error: GameError) -> Self {
        Self { error, obligation: None }
    }
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Board {
    pub(crate) slots: Vec<Slot>,
    pub(crate) deck: Vec<Card>,
    pub(crate) next_card: usize,
    pub(crate) players: Vec<Player>,
    pub(crate) next_player_id: u64,
    pub(crate) trades: Vec<TradeProposal>,
    pub(crate) history: Vec<TradeRecord>,
    pub(crate) turn: usize,
    pub(crate) phase: TurnPhase,
    pub(crate) rules: GameRules,
    dice: Box<dyn Dice>,
}

impl Board {
    /// Builds a board from an explicit layout and deck.
    pub fn new(slots: Vec<Slot>, deck: Vec<Card>, rules: GameRules, dice: Box<dyn Dice>) -> Self {
        Self {
            slots,
            deck,
            next_card: 0,
            players: Vec::new(),
            next_player_id: 0,
            trades: Vec::new(),
            history: Vec::new(),
            turn: 0,
            phase: TurnPhase::AwaitingRoll,
            rules,
            dice,
        }
    }

    /// The default layout and deck with the given rules and dice.
    pub fn standard(rules: GameRules, dice: Box<dyn Dice>) -> Self {
        Self::new(standard_layout(), standard_deck(), rules, dice)
    }

    // -- Accessors --

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn deck(&self) -> &[Card] {
        &self.deck
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn trades(&self) -> &[TradeProposal] {
        &self.trades
    }

    pub fn history(&self) -> &[TradeRecord] {
        &self.history
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn move_locked(&self) -> bool {
        self.phase.move_locked()
    }

    pub fn turn_done(&self) -> bool {
        self.phase.turn_done()
    }

    pub fn turn_index(&self) -> usize {
        self.turn
    }

    /// The player whose turn it is, or `None` when nobody is seated.
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.turn)
    }

    pub(crate) fn index_of(&self, id: PlayerId) -> Result<usize, GameError> {
        self.players
            .iter()
            .position(|p| p.id == id)
            .ok_or(GameError::PlayerNotFound(id))
    }

    fn require_current(&self, id: PlayerId) -> Result<usize, GameError> {
        let idx = self.index_of(id)?;
        if idx != self.turn {
            return Err(GameError::NotCurrentTurn);
        }
        Ok(idx)
    }

    // -- Roster --

    /// Seats a new player at the start slot with the starting balance.
    pub fn add_player(&mut self, name: impl Into<String>) -> &Player {
        let id = PlayerId(self.next_player_id);
        self.next_player_id += 1;
        self.players
            .push(Player::new(id, name.into(), self.rules.starting_balance));
        tracing::debug!(%id, players = self.players.len(), "player seated");
        &self.players[self.players.len() - 1]
    }

    /// Removes a player, returning everything they held to the bank.
    pub fn remove_player(&mut self, id: PlayerId) -> Result<Outcome, GameError> {
        let idx = self.index_of(id)?;
        let was_current = idx == self.turn;
        let removed = self.players.remove(idx);

        for slot in &mut self.slots {
            if let Some(property) = slot.as_property_mut() {
                if property.owner == Some(id) {
                    property.owner = None;
                    property.tier = 0;
                }
            }
        }
        for trade in &mut self.trades {
            if trade.requester == id || trade.responder == id {
                trade.active = false;
            }
        }

        if self.players.is_empty() {
            self.turn = 0;
            self.phase.reset();
        } else if idx < self.turn {
            self.turn -= 1;
        } else if was_current {
            self.phase.reset();
            if self.turn >= self.players.len() {
                self.turn = 0;
            }
        }

        tracing::info!(%id, players = self.players.len(), "player removed");
        let mut outcome = Outcome::broadcast(format!("{} has been removed from the game", removed.name));
        if was_current {
            if let Some(next) = self.current_player() {
                outcome = outcome.narrate(format!("Waiting for {} to play", next.name));
            }
        }
        Ok(outcome)
    }

    // -- Turn actions --

    /// Rolls the dice for the current player and resolves where they land.
    ///
    /// Jailed players move like everyone else; their sentence only advances
    /// when they land on the jail slot again.
    pub fn roll_and_move(&mut self, id: PlayerId) -> Result<Outcome, GameError> {
        let idx = self.require_current(id)?;
        self.phase.ensure_can_roll()?;

        let steps = self.dice.roll(self.rules.max_roll);
        let name = self.players[idx].name.clone();

        let position = (self.players[idx].position + steps as usize) % self.slots.len().max(1);
        self.players[idx].position = position;
        tracing::debug!(%id, steps, position, "player moved");

        let moved = Outcome::broadcast(format!(
            "{name} rolled {steps} and moved to {}",
            self.slots[position].name
        ));

        match self.land(idx, position) {
            Ok(landing) => {
                self.phase = landing.phase;
                let mut outcome = match landing.narration {
                    Some(text) => moved.narrate(text),
                    None => moved,
                };
                outcome.prompt = landing.prompt;
                Ok(outcome)
            }
            Err(unpaid) => {
                match unpaid.obligation {
                    Some(obligation) => self.phase.await_resolution(obligation),
                    None => self.phase.complete(),
                }
                Err(unpaid.error)
            }
        }
    }

    /// Buys the property the current player is standing on.
    ///
    /// Only valid while the purchase offer from this turn's landing is still
    /// open: not before rolling and not after passing.
    pub fn buy_property(&mut self, id: PlayerId) -> Result<Outcome, GameError> {
        let idx = self.require_current(id)?;
        let position = self.players[idx].position;

        let property = self.slots[position]
            .as_property()
            .filter(|p| p.price > 0)
            .ok_or(GameError::NotPurchasable)?;
        if property.owner.is_some() {
            return Err(GameError::SlotAlreadyOwned);
        }
        if self.phase.obligation() != Some(Obligation::Purchase { slot: position }) {
            return Err(GameError::NothingToResolve);
        }
        let price = property.price;

        ledger::debit(&mut self.players[idx], price)?;
        if let Some(property) = self.slots[position].as_property_mut() {
            property.owner = Some(id);
        }
        self.phase.resolve_purchase(position);

        tracing::debug!(%id, slot = position, price, "property bought");
        Ok(Outcome::broadcast(format!(
            "{} bought {} for {price}",
            self.players[idx].name, self.slots[position].name
        )))
    }

    /// Turns down a pending purchase offer.
    pub fn decline_purchase(&mut self, id: PlayerId) -> Result<Outcome, GameError> {
        let idx = self.require_current(id)?;
        let Some(Obligation::Purchase { slot }) = self.phase.obligation() else {
            return Err(GameError::NothingToResolve);
        };
        self.phase.complete();
        Ok(Outcome::broadcast(format!(
            "{} declined to buy {}",
            self.players[idx].name, self.slots[slot].name
        )))
    }

    /// Retries a rent or bank payment the current player could not cover
    /// when they landed.
    pub fn settle_debt(&mut self, id: PlayerId) -> Result<Outcome, GameError> {
        let idx = self.require_current(id)?;
        let Some(Obligation::Debt { creditor, amount }) = self.phase.obligation() else {
            return Err(GameError::NothingToResolve);
        };

        // A creditor who has since left the game is paid out to the bank.
        let creditor_idx = creditor.and_then(|c| self.index_of(c).ok());
        let narration = match creditor_idx {
            Some(to) => {
                ledger::transfer(&mut self.players, idx, to, amount)?;
                format!(
                    "{} paid {amount} owed to {}",
                    self.players[idx].name, self.players[to].name
                )
            }
            None => {
                ledger::debit(&mut self.players[idx], amount)?;
                format!("{} paid {amount} to the bank", self.players[idx].name)
            }
        };
        self.phase.complete();
        Ok(Outcome::broadcast(narration))
    }

    /// Raises a property the player owns by one rent tier.
    pub fn develop_property(&mut self, id: PlayerId, slot: usize) -> Result<Outcome, GameError> {
        let idx = self.require_current(id)?;
        let property = self
            .slots
            .get(slot)
            .and_then(Slot::as_property)
            .ok_or(GameError::NoSuchAsset)?;
        if !property.is_owned_by(id) {
            return Err(GameError::NotOwner);
        }
        if property.tier >= MAX_TIER {
            return Err(GameError::FullyDeveloped);
        }
        let cost = property.house_cost;

        ledger::debit(&mut self.players[idx], cost)?;
        let mut tier = 0;
        if let Some(property) = self.slots[slot].as_property_mut() {
            property.tier += 1;
            tier = property.tier;
        }
        Ok(Outcome::broadcast(format!(
            "{} developed {} to tier {tier} for {cost}",
            self.players[idx].name, self.slots[slot].name
        )))
    }

    /// Plays a held card. Only jail release cards can be played by hand.
    pub fn use_card(&mut self, id: PlayerId, card: CardId) -> Result<Outcome, GameError> {
        let idx = self.index_of(id)?;
        if !self.players[idx].holds(card) {
            return Err(GameError::NotOwner);
        }
        let effect = self.deck.get(card.0).map(|c| c.effect).ok_or(GameError::NoSuchAsset)?;
        if effect != CardEffect::ReleaseFromJail || !self.players[idx].is_jailed() {
            return Err(GameError::CardNotPlayable);
        }

        let player = &mut self.players[idx];
        player.inventory.retain(|held| *held != card);
        player.jail = JailStatus::Free;
        Ok(Outcome::broadcast(format!("{} used a {}", player.name, self.deck[card.0].name)))
    }

    /// Passes the turn to the next player once nothing is left to resolve.
    pub fn end_turn(&mut self, id: PlayerId) -> Result<Outcome, GameError> {
        self.require_current(id)?;
        self.phase.ensure_can_end()?;

        self.turn = (self.turn + 1) % self.players.len();
        self.phase.reset();

        let next = &self.players[self.turn];
        tracing::debug!(next = %next.id, "turn advanced");
        Ok(Outcome::broadcast(format!("Waiting for {} to play", next.name)))
    }

    // -- Landing handlers --

    fn land(&mut self, idx: usize, position: usize) -> Result<Landing, Unpaid> {
        match &self.slots[position].kind {
            SlotKind::Property(property) => {
                let property = property.clone();
                self.land_on_property(idx, position, &property)
            }
            SlotKind::Card => self.land_on_card(idx),
            SlotKind::Jail if self.players[idx].is_jailed() => {
                Ok(Landing::done(self.serve_jail_turn(idx)))
            }
            SlotKind::Jail => Ok(Landing::done(self.send_to_jail(idx))),
            SlotKind::Tax { amount } => {
                let amount = *amount;
                ledger::debit(&mut self.players[idx], amount).map_err(|error| Unpaid {
                    error,
                    obligation: Some(Obligation::Debt { creditor: None, amount }),
                })?;
                Ok(Landing::done(format!("{} paid {amount} in taxes", self.players[idx].name)))
            }
            SlotKind::Neutral => Ok(Landing::done(format!(
                "{} has landed on a neutral slot: {}",
                self.players[idx].name, self.slots[position].name
            ))),
        }
    }

    fn land_on_property(
        &mut self,
        idx: usize,
        position: usize,
        property: &crate::Property,
    ) -> Result<Landing, Unpaid> {
        let id = self.players[idx].id;
        let name = self.slots[position].name.clone();

        match property.owner {
            None if property.price > 0 => Ok(Landing {
                narration: None,
                prompt: Some(format!("Want to buy {name} for {}?", property.price)),
                phase: TurnPhase::AwaitingLandingResolution(Obligation::Purchase { slot: position }),
            }),
            None => Ok(Landing::done(format!("{} is visiting {name}", self.players[idx].name))),
            Some(owner) if owner == id => Ok(Landing::done(format!(
                "{} landed on their own {name}",
                self.players[idx].name
            ))),
            Some(owner) => {
                let owner_idx = self.index_of(owner)?;
                if self.players[owner_idx].is_jailed() {
                    return Ok(Landing::done(format!(
                        "{} is in jail, no rent is due on {name}",
                        self.players[owner_idx].name
                    )));
                }
                let rent = property.current_rent();
                ledger::transfer(&mut self.players, idx, owner_idx, rent).map_err(|error| Unpaid {
                    error,
                    obligation: Some(Obligation::Debt {
                        creditor: Some(owner),
                        amount: rent,
                    }),
                })?;
                Ok(Landing::done(format!(
                    "{} paid {rent} rent to {}",
                    self.players[idx].name, self.players[owner_idx].name
                )))
            }
        }
    }

    fn land_on_card(&mut self, idx: usize) -> Result<Landing, Unpaid> {
        let Some(card) = self.draw_card() else {
            return Ok(Landing::done(format!(
                "{} found the deck empty",
                self.players[idx].name
            )));
        };
        let Card { name: card_name, effect, .. } = self.deck[card.0].clone();
        let player_name = self.players[idx].name.clone();

        let narration = match effect {
            CardEffect::ReleaseFromJail => {
                let player = &mut self.players[idx];
                if player.is_jailed() {
                    player.jail = JailStatus::Free;
                    format!("{player_name} used a {card_name}")
                } else {
                    player.inventory.push(card);
                    format!("{player_name} drew a {card_name} and kept it")
                }
            }
            CardEffect::AdvanceToStart { bonus } => {
                self.players[idx].position = 0;
                ledger::credit(&mut self.players[idx], bonus);
                format!("{player_name} advanced to {} and collected {bonus}", self.slots[0].name)
            }
            CardEffect::CollectFromBank { amount } => {
                ledger::credit(&mut self.players[idx], amount);
                format!("{player_name} drew {card_name} and collected {amount}")
            }
            CardEffect::PayBank { amount } => {
                ledger::debit(&mut self.players[idx], amount).map_err(|error| Unpaid {
                    error,
                    obligation: Some(Obligation::Debt { creditor: None, amount }),
                })?;
                format!("{player_name} drew {card_name} and paid {amount}")
            }
        };
        Ok(Landing::done(narration))
    }

    /// Next card in deck order that no player is holding.
    fn draw_card(&mut self) -> Option<CardId> {
        let len = self.deck.len();
        for offset in 0..len {
            let candidate = CardId((self.next_card + offset) % len);
            if !self.players.iter().any(|p| p.holds(candidate)) {
                self.next_card = (candidate.0 + 1) % len;
                return Some(candidate);
            }
        }
        None
    }

    fn send_to_jail(&mut self, idx: usize) -> String {
        let jail_slot = self.slots.iter().position(|s| matches!(s.kind, SlotKind::Jail));
        let player = &mut self.players[idx];
        player.jail = JailStatus::Jailed { turns_served: 0 };
        if let Some(slot) = jail_slot {
            player.position = slot;
        }
        tracing::debug!(id = %player.id, "player jailed");
        format!("{} has been sent to jail", player.name)
    }

    fn serve_jail_turn(&mut self, idx: usize) -> String {
        let sentence = self.rules.jail_sentence;
        let player = &mut self.players[idx];
        let served = match player.jail {
            JailStatus::Jailed { turns_served } => turns_served.saturating_add(1),
            JailStatus::Free => 0,
        };
        if served >= sentence {
            player.jail = JailStatus::Free;
            format!("{} is released from jail after serving time", player.name)
        } else {
            player.jail = JailStatus::Jailed { turns_served: served };
            format!("{} is in jail for {} more turns", player.name, sentence - served)
        }
    }
}
