//! Unified error type for the Landlord server.

use landlord_protocol::ProtocolError;
use landlord_room::RoomError;
use landlord_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each wrapping variant generates a `From` impl,
/// so `?` converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum LandlordError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (full, unknown connection).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// An environment setting could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The client connected to a path that names no room.
    #[error("bad route: {0}")]
    BadRoute(String),
}
