//! Error types for the protocol layer.
//!
//! A `ProtocolError` means the frame itself was wrong: bad JSON, a missing
//! field, or a verb nobody understands. Rule violations are `GameError`s and
//! live in `landlord-game`.

/// Errors raised while encoding, decoding, or interpreting a message.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust value into JSON).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// The frame is not JSON, or does not have the message shape.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The frame decoded but is unusable: an empty action, or a body that
    /// does not fit the action.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// The action is not one this category understands.
    #[error("unknown action: {0}")]
    UnknownAction(String),
}

impl ProtocolError {
    /// The text sent back to the client that sent the bad frame.
    ///
    /// Details stay in the server logs; the client only learns which of the
    /// two broad cases it hit.
    pub fn client_notice(&self) -> &'static str {
        match self {
            Self::UnknownAction(_) => "invalid action",
            _ => "invalid message format",
        }
    }
}
