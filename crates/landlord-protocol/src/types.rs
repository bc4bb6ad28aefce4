//! The one message shape that travels on the wire, in both directions.
//!
//! ```text
//! { "category": "game" | "room", "action": "<verb>", "body": <optional> }
//! ```
//!
//! Inbound frames are turned into a [`Command`](crate::Command) before
//! anything acts on them. Outbound frames are built with the constructors on
//! [`Message`], so every notice the server sends has a fixed action name.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Which layer a message is addressed to.
///
/// `Game` messages drive the board; `Room` messages concern the room itself
/// (chat, membership, room creation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Game,
    Room,
}

// ---------------------------------------------------------------------------
// Outbound action names
// ---------------------------------------------------------------------------

pub mod outbound {
    //! Action names used on server-to-client messages.

    pub const BROADCAST: &str = "broadcast";
    pub const PROMPT: &str = "prompt";
    pub const ERROR: &str = "error";
    pub const JOINED: &str = "joined";
    pub const LEFT: &str = "left";
    pub const CHAT: &str = "chat";
    pub const CREATED: &str = "created";
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A single wire message.
///
/// `body` is kept as raw JSON here. Its shape depends on `action`, so it is
/// only interpreted once the action is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub category: Category,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl Message {
    pub fn new(category: Category, action: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            category,
            action: action.into(),
            body,
        }
    }

    /// Narration for every client in the room.
    pub fn broadcast(text: impl Into<String>) -> Self {
        Self::new(Category::Game, outbound::BROADCAST, Some(Value::String(text.into())))
    }

    /// A question or hint for one client, e.g. a purchase offer.
    pub fn prompt(text: impl Into<String>) -> Self {
        Self::new(Category::Game, outbound::PROMPT, Some(Value::String(text.into())))
    }

    /// A rejected command, sent only to the client that issued it.
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(Category::Game, outbound::ERROR, Some(Value::String(text.into())))
    }

    pub fn joined(name: &str, player_id: u64) -> Self {
        Self::new(
            Category::Room,
            outbound::JOINED,
            Some(json!({ "name": name, "playerId": player_id })),
        )
    }

    pub fn left(name: &str) -> Self {
        Self::new(Category::Room, outbound::LEFT, Some(json!({ "name": name })))
    }

    pub fn chat(from: &str, text: &str) -> Self {
        Self::new(Category::Room, outbound::CHAT, Some(json!({ "from": from, "text": text })))
    }

    /// Reply to a room creation request.
    pub fn created(room_key: &str) -> Self {
        Self::new(Category::Room, outbound::CREATED, Some(json!({ "roomKey": room_key })))
    }

    /// The body as plain text, if it is a JSON string.
    pub fn text(&self) -> Option<&str> {
        self.body.as_ref().and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_is_lowercase_on_the_wire() {
        assert_eq!(serde_json::to_string(&Category::Game).unwrap(), r#""game""#);
        let room: Category = serde_json::from_str(r#""room""#).unwrap();
        assert_eq!(room, Category::Room);
    }

    #[test]
    fn test_message_without_body_omits_field() {
        let msg = Message::new(Category::Game, "go", None);
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"category":"game","action":"go"}"#);
    }

    #[test]
    fn test_message_body_defaults_to_none() {
        let msg: Message = serde_json::from_str(r#"{"category":"game","action":"end"}"#).unwrap();
        assert_eq!(msg.action, "end");
        assert!(msg.body.is_none());
    }

    #[test]
    fn test_missing_action_is_rejected() {
        let result: Result<Message, _> = serde_json::from_str(r#"{"category":"game"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let result: Result<Message, _> =
            serde_json::from_str(r#"{"category":"lobby","action":"go"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_outbound_shapes() {
        let prompt = serde_json::to_value(Message::prompt("Want to buy A for 60?")).unwrap();
        assert_eq!(
            prompt,
            json!({"category": "game", "action": "prompt", "body": "Want to buy A for 60?"})
        );

        let created = serde_json::to_value(Message::created("aB3xY9")).unwrap();
        assert_eq!(created["category"], "room");
        assert_eq!(created["body"]["roomKey"], "aB3xY9");

        let chat = Message::chat("Player-1", "hi");
        assert_eq!(chat.body.unwrap()["from"], "Player-1");
    }

    #[test]
    fn test_text_body() {
        assert_eq!(Message::broadcast("hello").text(), Some("hello"));
        assert_eq!(Message::left("x").text(), None);
    }
}
