//! Maps the WebSocket upgrade target to a room.
//!
//! ```text
//! /ws/<roomKey>?name=<name>   join (the room is started on first use)
//! /ws  or  /ws/new            start a fresh room and join it
//! ```

use landlord_room::RoomKey;
use serde::Deserialize;

use crate::LandlordError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Join { key: RoomKey, name: Option<String> },
    Create { name: Option<String> },
}

impl Route {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Join { name, .. } | Self::Create { name } => name.as_deref(),
        }
    }
}

/// Query parameters accepted on the upgrade request.
#[derive(Debug, Deserialize)]
struct JoinQuery {
    // Display name; blank means "pick one for me".
    #[serde(default)]
    name: Option<String>,
}

/// Parses a request target such as `/ws/aB3xY9?name=ada`.
pub fn parse_target(target: &str) -> Result<Route, LandlordError> {
    let (path, query) = target.split_once('?').unwrap_or((target, ""));
    let query: JoinQuery = serde_urlencoded::from_str(query)
        .map_err(|e| LandlordError::BadRoute(format!("{target}: {e}")))?;
    let name = query.name.filter(|name| !name.trim().is_empty());

    let rest = path
        .trim_end_matches('/')
        .strip_prefix("/ws")
        .ok_or_else(|| LandlordError::BadRoute(path.to_string()))?;

    match rest.strip_prefix('/') {
        None if rest.is_empty() => Ok(Route::Create { name }),
        Some("new") => Ok(Route::Create { name }),
        Some(raw) => {
            let key = RoomKey::parse(raw).ok_or_else(|| LandlordError::BadRoute(path.to_string()))?;
            Ok(Route::Join { key, name })
        }
        None => Err(LandlordError::BadRoute(path.to_string())),
    }
}
