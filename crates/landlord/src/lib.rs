//! # Landlord
//!
//! Multiplayer property-trading board game server.
//!
//! Clients connect over WebSocket to a room key, and every room runs one
//! authoritative board: turns, purchases, rent, jail, cards and two-party
//! trades that settle atomically.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use landlord::prelude::*;
//!
//! # async fn run() -> Result<(), LandlordError> {
//! let server = LandlordServer::builder()
//!     .config(ServerConfig::from_env()?)
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod handler;
pub mod route;
mod server;

pub use config::{ServerConfig, DEFAULT_BIND_ADDR};
pub use error::LandlordError;
pub use server::{LandlordServer, LandlordServerBuilder};

/// Everything needed to configure and run a server.
pub mod prelude {
    pub use crate::{LandlordError, LandlordServer, LandlordServerBuilder, ServerConfig};
    pub use landlord_game::GameRules;
    pub use landlord_room::{RoomConfig, RoomRegistry};
}
