//! Server configuration, with overrides from the environment.

use landlord_room::RoomConfig;
use serde::{Deserialize, Serialize};

use crate::LandlordError;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the WebSocket listener binds to.
    pub bind_addr: String,
    /// Settings applied to every room.
    pub room: RoomConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            room: RoomConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by any of these variables that are set:
    ///
    /// | variable | field |
    /// |---|---|
    /// | `LANDLORD_BIND_ADDR` | `bind_addr` |
    /// | `LANDLORD_MAX_PLAYERS` | `room.max_players` |
    /// | `LANDLORD_STARTING_BALANCE` | `room.rules.starting_balance` |
    /// | `LANDLORD_FORFEIT_ON_DISCONNECT` | `room.forfeit_on_disconnect` |
    pub fn from_env() -> Result<Self, LandlordError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LandlordError> {
        let mut config = Self::default();

        if let Some(addr) = lookup("LANDLORD_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(raw) = lookup("LANDLORD_MAX_PLAYERS") {
            config.room.max_players = parse("LANDLORD_MAX_PLAYERS", &raw)?;
            if config.room.max_players == 0 {
                return Err(LandlordError::Config("LANDLORD_MAX_PLAYERS must be at least 1".into()));
            }
        }
        if let Some(raw) = lookup("LANDLORD_STARTING_BALANCE") {
            config.room.rules.starting_balance = parse("LANDLORD_STARTING_BALANCE", &raw)?;
            if config.room.rules.starting_balance < 0 {
                return Err(LandlordError::Config(
                    "LANDLORD_STARTING_BALANCE must not be negative".into(),
                ));
            }
        }
        if let Some(raw) = lookup("LANDLORD_FORFEIT_ON_DISCONNECT") {
            config.room.forfeit_on_disconnect = parse("LANDLORD_FORFEIT_ON_DISCONNECT", &raw)?;
        }
        Ok(config)
    }
}

fn parse<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, LandlordError>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| LandlordError::Config(format!("{key}={raw:?}: {e}")))
}
