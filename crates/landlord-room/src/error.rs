//! Error types for the room layer.

use landlord_protocol::ProtocolError;
use landlord_transport::ConnectionId;

use crate::RoomKey;

/// Errors that can occur during room operations.
///
/// Rule violations never show up here: they are answered to the client as
/// `game/error` notices and the call itself succeeds.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room has no free player seat.
    #[error("room {0} is full")]
    RoomFull(RoomKey),

    /// The connection is already seated in this room.
    #[error("{0} already joined room {1}")]
    AlreadyJoined(ConnectionId, RoomKey),

    /// The connection has no seat in this room.
    #[error("{0} is not in room {1}")]
    UnknownConnection(ConnectionId, RoomKey),

    /// An outbound message could not be encoded.
    #[error(transparent)]
    Encode(#[from] ProtocolError),
}
