//! Room registry: maps room keys to running hubs.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{RoomConfig, RoomHub, RoomKey};

/// Every room the server knows about, keyed by room key.
///
/// Lookups take the read lock and run concurrently; only creating a room
/// takes the write lock. Rooms are never removed, so a key stays valid for
/// the life of the process.
pub struct RoomRegistry {
    config: RoomConfig,
    rooms: RwLock<HashMap<RoomKey, Arc<RoomHub>>>,
}

impl RoomRegistry {
    /// Creates an empty registry whose rooms all use `config`.
    pub fn new(config: RoomConfig) -> Self {
        Self {
            config,
            rooms: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    pub async fn get(&self, key: &RoomKey) -> Option<Arc<RoomHub>> {
        self.rooms.read().await.get(key).cloned()
    }

    /// Returns the room for `key`, starting it first if it does not exist.
    pub async fn get_or_create(&self, key: RoomKey) -> Arc<RoomHub> {
        if let Some(hub) = self.get(&key).await {
            return hub;
        }

        let mut rooms = self.rooms.write().await;
        // Another task may have created it between the two locks.
        let hub = rooms
            .entry(key.clone())
            .or_insert_with(|| RoomHub::spawn(key, self.config.clone()));
        Arc::clone(hub)
    }

    /// Starts a room under a freshly generated key.
    pub async fn create_room(&self) -> Arc<RoomHub> {
        let mut rooms = self.rooms.write().await;
        let key = loop {
            let candidate = RoomKey::generate();
            if !rooms.contains_key(&candidate) {
                break candidate;
            }
        };
        let hub = RoomHub::spawn(key.clone(), self.config.clone());
        rooms.insert(key, Arc::clone(&hub));
        hub
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    pub async fn room_keys(&self) -> Vec<RoomKey> {
        let mut keys: Vec<RoomKey> = self.rooms.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}
