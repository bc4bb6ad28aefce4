//! Codec trait and the JSON implementation.
//!
//! WebSocket text frames carry the messages, so encoding produces a
//! `String`. Decoding accepts raw bytes and therefore handles both text and
//! binary frames.

use serde::{de::DeserializeOwned, Serialize};

use crate::{Command, Message, ProtocolError};

/// Converts wire values to and from their frame representation.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into frame text.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Deserializes frame bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or do not
    /// match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;

    /// Decodes a frame and interprets it as a [`Command`] in one step.
    fn decode_command(&self, data: &[u8]) -> Result<Command, ProtocolError> {
        let message: Message = self.decode(data)?;
        Command::try_from(message)
    }
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] backed by `serde_json`.
///
/// ```rust
/// use landlord_protocol::{Codec, Command, GameCommand, JsonCodec, Message};
///
/// let codec = JsonCodec;
/// let text = codec.encode(&Message::broadcast("Waiting for Player-1 to play")).unwrap();
/// assert!(text.contains(r#""action":"broadcast""#));
///
/// let cmd = codec.decode_command(br#"{"category":"game","action":"go"}"#).unwrap();
/// assert_eq!(cmd, Command::Game(GameCommand::Roll));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_garbage_returns_error() {
        let result: Result<Message, _> = JsonCodec.decode(b"not json {{{");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_command_missing_category() {
        let result = JsonCodec.decode_command(br#"{"action":"go"}"#);
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
        assert_eq!(result.unwrap_err().client_notice(), "invalid message format");
    }

    #[test]
    fn test_same_bad_frame_fails_the_same_way_twice() {
        let frame = br#"{"category":"game","action":"acceptTrade","body":{}}"#;
        let first = JsonCodec.decode_command(frame).unwrap_err().to_string();
        let second = JsonCodec.decode_command(frame).unwrap_err().to_string();
        assert_eq!(first, second);
    }

    #[test]
    fn test_encode_message() {
        let text = JsonCodec.encode(&Message::error("not your turn")).unwrap();
        assert_eq!(text, r#"{"category":"game","action":"error","body":"not your turn"}"#);
    }
}
