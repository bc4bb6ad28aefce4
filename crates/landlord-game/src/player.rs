//! Player identity and per-player state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::CardId;

/// A stable identifier for a player, unique within one board.
///
/// Ids come from a counter that never rewinds, so a forfeited player's id is
/// never handed to a newcomer while the board lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// Whether a player is serving a jail sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JailStatus {
    #[default]
    Free,
    Jailed {
        /// Jail turns already served.
        turns_served: u8,
    },
}

impl JailStatus {
    pub fn is_jailed(&self) -> bool {
        matches!(self, Self::Jailed { .. })
    }
}

/// One seat at the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Cash on hand. The engine never authorises a payment that would make
    /// this negative.
    pub balance: i64,
    /// Index into the board's slots.
    pub position: usize,
    pub jail: JailStatus,
    /// Cards drawn and kept for later.
    pub inventory: Vec<CardId>,
}

impl Player {
    pub(crate) fn new(id: PlayerId, name: String, balance: i64) -> Self {
        Self {
            id,
            name,
            balance,
            position: 0,
            jail: JailStatus::Free,
            inventory: Vec::new(),
        }
    }

    pub fn is_jailed(&self) -> bool {
        self.jail.is_jailed()
    }

    pub fn holds(&self, card: CardId) -> bool {
        self.inventory.contains(&card)
    }
}
