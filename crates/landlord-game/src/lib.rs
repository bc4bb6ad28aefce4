//! Rules engine for Landlord.
//!
//! Everything that decides whether a move is legal and what it does to the
//! game lives here, with no knowledge of sockets or rooms:
//!
//! - **Board** ([`Board`]): slots, players, turn order and the card deck.
//! - **Ledger** ([`ledger`]): balances and ownership, validated before any
//!   mutation.
//! - **Escrow** ([`TradeProposal`], [`TradeRequest`]): two-party trades that
//!   settle atomically or not at all.
//!
//! ```text
//! Room (lock) → Board operation → Ledger / Escrow → Outcome
//! ```

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod board;
mod card;
mod dice;
mod error;
mod escrow;
pub mod ledger;
mod player;
mod slot;
mod turn;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use board::{Board, GameRules, Outcome};
pub use card::{standard_deck, Card, CardEffect, CardId};
pub use dice::{Dice, RandomDice, ScriptedDice};
pub use error::GameError;
pub use escrow::{AppliedLeg, TradeBundle, TradeEvent, TradeProposal, TradeRecord, TradeRequest};
pub use player::{JailStatus, Player, PlayerId};
pub use slot::{standard_layout, Property, Slot, SlotKind, MAX_TIER};
pub use turn::{Obligation, TurnPhase};
