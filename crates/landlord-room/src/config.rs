//! Room configuration and room keys.

use std::fmt;

use landlord_game::GameRules;
use rand::distr::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Configuration shared by every room a registry creates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Maximum seated players; joins past this are refused.
    pub max_players: usize,

    /// Whether a player who disconnects forfeits at once. With this off the
    /// player stays on the board and keeps their turn slot.
    pub forfeit_on_disconnect: bool,

    /// Rules for the board each room starts with.
    pub rules: GameRules,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            max_players: 8,
            forfeit_on_disconnect: true,
            rules: GameRules::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// RoomKey
// ---------------------------------------------------------------------------

/// Length of generated room keys.
pub const ROOM_KEY_LEN: usize = 6;

/// The opaque key clients use to address a room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomKey(String);

impl RoomKey {
    /// Accepts a client-supplied key: 1 to 64 characters of ASCII letters,
    /// digits, `-` or `_`.
    pub fn parse(raw: &str) -> Option<Self> {
        let valid = !raw.is_empty()
            && raw.len() <= 64
            && raw.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        valid.then(|| Self(raw.to_string()))
    }

    /// A fresh random alphanumeric key.
    pub fn generate() -> Self {
        let key: String = rand::rng()
            .sample_iter(Alphanumeric)
            .take(ROOM_KEY_LEN)
            .map(char::from)
            .collect();
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
