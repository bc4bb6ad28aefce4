//! Board positions.
//!
//! A slot's kind is fixed when the board is built. Only a property's
//! `owner` and `tier` ever change afterwards.

use serde::{Deserialize, Serialize};

use crate::PlayerId;

/// Highest development tier; `rent` has one entry per tier `0..=MAX_TIER`.
pub const MAX_TIER: u8 = 4;

/// A purchasable position on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// `None` means the bank owns it.
    pub owner: Option<PlayerId>,
    pub price: i64,
    /// Development state, selects the rent tier.
    pub tier: u8,
    pub rent: [i64; 5],
    /// Cost of raising `tier` by one.
    pub house_cost: i64,
}

impl Property {
    pub fn new(price: i64, rent: [i64; 5], house_cost: i64) -> Self {
        Self {
            owner: None,
            price,
            tier: 0,
            rent,
            house_cost,
        }
    }

    /// Rent owed at the current development tier.
    pub fn current_rent(&self) -> i64 {
        self.rent[usize::from(self.tier.min(MAX_TIER))]
    }

    pub fn is_owned_by(&self, player: PlayerId) -> bool {
        self.owner == Some(player)
    }
}

/// What happens when a player lands on a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlotKind {
    Property(Property),
    Card,
    Jail,
    Tax { amount: i64 },
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub name: String,
    #[serde(flatten)]
    pub kind: SlotKind,
}

impl Slot {
    pub fn property(name: &str, price: i64, rent: [i64; 5], house_cost: i64) -> Self {
        Self {
            name: name.to_string(),
            kind: SlotKind::Property(Property::new(price, rent, house_cost)),
        }
    }

    pub fn card(name: &str) -> Self {
        Self { name: name.to_string(), kind: SlotKind::Card }
    }

    pub fn jail(name: &str) -> Self {
        Self { name: name.to_string(), kind: SlotKind::Jail }
    }

    pub fn tax(name: &str, amount: i64) -> Self {
        Self {
            name: name.to_string(),
            kind: SlotKind::Tax { amount },
        }
    }

    pub fn neutral(name: &str) -> Self {
        Self { name: name.to_string(), kind: SlotKind::Neutral }
    }

    pub fn as_property(&self) -> Option<&Property> {
        match &self.kind {
            SlotKind::Property(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_property_mut(&mut self) -> Option<&mut Property> {
        match &mut self.kind {
            SlotKind::Property(p) => Some(p),
            _ => None,
        }
    }
}

/// The default fourteen-slot board.
pub fn standard_layout() -> Vec<Slot> {
    vec![
        Slot::neutral("Go"),
        Slot::property("Mediterranean Avenue", 60, [2, 10, 30, 90, 160], 50),
        Slot::card("Community Chest"),
        Slot::property("Baltic Avenue", 60, [4, 20, 60, 180, 320], 50),
        Slot::tax("Income Tax", 200),
        Slot::property("Chittagong Road", 100, [6, 30, 90, 270, 400], 50),
        Slot::jail("Jail"),
        Slot::property("St. Charles Place", 140, [10, 50, 150, 450, 625], 100),
        Slot::card("Chance"),
        Slot::property("Nicsu York", 160, [12, 60, 180, 500, 700], 100),
        Slot::neutral("Free Parking"),
        Slot::property("Minisoda Gardens", 180, [14, 70, 200, 550, 750], 100),
        Slot::tax("Luxury Tax", 100),
        Slot::property("Ohio Boardwalk", 200, [16, 80, 220, 600, 800], 100),
    ]
}
