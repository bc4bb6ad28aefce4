//! Rooms for Landlord.
//!
//! A room is one board plus the connections playing on it. Connection tasks
//! call straight into the room's [`RoomHub`]; the hub serialises board access
//! and runs one delivery task that fans broadcasts out to every client.
//!
//! # Key types
//!
//! - [`RoomHub`]: one room: board, seats, broadcast delivery
//! - [`RoomRegistry`]: room key → hub, shared by the whole server
//! - [`RoomConfig`]: player limit, disconnect policy, game rules
//! - [`RoomKey`]: the opaque key clients address a room by

mod config;
mod error;
mod hub;
mod registry;

pub use config::{RoomConfig, RoomKey, ROOM_KEY_LEN};
pub use error::RoomError;
pub use hub::{ClientSender, Dispatch, RoomHub, Seat};
pub use registry::RoomRegistry;
