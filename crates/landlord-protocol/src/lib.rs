//! Wire protocol for Landlord.
//!
//! This crate defines the "language" that clients and the server speak:
//!
//! - **Types** ([`Message`], [`Category`]): the one envelope shape used in
//!   both directions.
//! - **Commands** ([`Command`], [`GameCommand`], [`RoomCommand`]): inbound
//!   messages after their action and body have been checked.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how messages become frame
//!   text and back.
//! - **Errors** ([`ProtocolError`]).
//!
//! ```text
//! Transport (frame) → Codec (Message) → Command → Room
//! ```

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod codec;
mod command;
mod error;
mod types;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use codec::{Codec, JsonCodec};
pub use command::{Command, GameCommand, RoomCommand};
pub use error::ProtocolError;
pub use types::{outbound, Category, Message};
