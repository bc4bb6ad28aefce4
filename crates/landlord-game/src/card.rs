//! Cards drawn from the deck when landing on a card slot.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of a card in the board's deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub usize);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C-{}", self.0)
    }
}

/// What a card does to the player who draws it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum CardEffect {
    /// Frees a jailed drawer at once; anyone else keeps it for later.
    ReleaseFromJail,
    /// Move to slot 0 and collect `bonus` from the bank.
    AdvanceToStart { bonus: i64 },
    CollectFromBank { amount: i64 },
    PayBank { amount: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    pub description: String,
    pub effect: CardEffect,
}

impl Card {
    pub fn new(name: &str, description: &str, effect: CardEffect) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            effect,
        }
    }
}

/// The default deck, drawn in order and cycled.
pub fn standard_deck() -> Vec<Card> {
    vec![
        Card::new(
            "Jail Free Card",
            "Get out of jail free",
            CardEffect::ReleaseFromJail,
        ),
        Card::new(
            "Advance to Go",
            "Advance to Go and collect $200",
            CardEffect::AdvanceToStart { bonus: 200 },
        ),
        Card::new(
            "Bank Error",
            "Bank error in your favour, collect $50",
            CardEffect::CollectFromBank { amount: 50 },
        ),
        Card::new(
            "Doctor's Fee",
            "Pay the bank $50",
            CardEffect::PayBank { amount: 50 },
        ),
    ]
}
