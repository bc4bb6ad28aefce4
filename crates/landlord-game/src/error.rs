//! Error types for the rules engine.

use crate::PlayerId;

/// A rule violation reported by a [`Board`](crate::Board) operation.
///
/// Every variant is recoverable: the board is left exactly as it was before
/// the failing call (apart from the documented cases where a roll has already
/// moved the player and the landing left a debt behind).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// The sender is not the player whose turn it is.
    #[error("not your turn")]
    NotCurrentTurn,

    /// The current player still has a purchase decision or a debt to settle.
    #[error("turn obligations pending")]
    TurnObligationsPending,

    /// The current player already rolled this turn.
    #[error("already moved this turn")]
    MoveAlreadyLocked,

    /// A payment would drive a balance below zero.
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: i64, available: i64 },

    /// The slot already belongs to a player.
    #[error("slot already owned")]
    SlotAlreadyOwned,

    /// A property or card is not held by the player who was supposed to give it.
    #[error("not owner of property or card")]
    NotOwner,

    /// The player is standing on something the bank does not sell.
    #[error("slot is not for sale")]
    NotPurchasable,

    /// No active trade proposal with this id.
    #[error("trade {0} not found")]
    TradeNotFound(usize),

    /// Only the responder may accept a trade, and only the requester may propose it.
    #[error("not your trade")]
    NotYourTrade,

    /// A required field was absent from a trade request.
    #[error("missing trade field: {0}")]
    MissingTradeField(&'static str),

    /// The referenced player is not on the roster.
    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),

    /// Money amounts must be non-negative.
    #[error("invalid amount: {0}")]
    InvalidAmount(i64),

    /// Requester and responder are the same player.
    #[error("cannot trade with yourself")]
    SelfTrade,

    /// A property or card id that does not exist on this board.
    #[error("no such property or card")]
    NoSuchAsset,

    /// The property is already at its highest rent tier.
    #[error("property is fully developed")]
    FullyDeveloped,

    /// There is no pending purchase or debt to act on.
    #[error("nothing to resolve")]
    NothingToResolve,

    /// The card cannot be played right now.
    #[error("card cannot be played now")]
    CardNotPlayable,
}
