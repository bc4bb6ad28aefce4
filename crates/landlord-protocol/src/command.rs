//! Typed commands parsed out of inbound messages.
//!
//! Parsing is the only place that looks at `action` strings and raw bodies.
//! Everything downstream matches on [`Command`].

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use landlord_game::{CardId, TradeRequest};

use crate::{Category, Message, ProtocolError};

/// A command aimed at the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameCommand {
    /// `go`: roll and move.
    Roll,
    /// `buy`: buy the slot the sender is standing on.
    Buy,
    /// `pass`: decline a purchase offer.
    Pass,
    /// `pay`: retry a debt left over from landing.
    Pay,
    /// `end`: end the turn.
    End,
    /// `house`: develop a property one tier.
    Develop { property: usize },
    /// `useCard`: play a held card.
    UseCard { card: CardId },
    /// `trade`: propose a trade.
    Propose(TradeRequest),
    /// `acceptTrade`: settle a pending trade.
    Accept { trade_id: usize },
    /// `forfeit`: leave the game.
    Forfeit,
}

/// A command aimed at the room itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomCommand {
    /// `message`: chat text for everyone in the room.
    Chat(String),
    /// `create`: ask for a fresh room key.
    Create,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Game(GameCommand),
    Room(RoomCommand),
}

// -- Body shapes --

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AcceptBody {
    trade_id: usize,
}

#[derive(Deserialize)]
struct HouseBody {
    property: usize,
}

#[derive(Deserialize)]
struct CardBody {
    card: CardId,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ChatBody {
    Plain(String),
    Wrapped { text: String },
}

/// Deserializes a body that the action requires.
fn required_body<T: DeserializeOwned>(action: &str, body: Option<Value>) -> Result<T, ProtocolError> {
    let body = body.ok_or_else(|| ProtocolError::InvalidMessage(format!("{action} needs a body")))?;
    serde_json::from_value(body)
        .map_err(|err| ProtocolError::InvalidMessage(format!("bad {action} body: {err}")))
}

impl TryFrom<Message> for Command {
    type Error = ProtocolError;

    fn try_from(message: Message) -> Result<Self, Self::Error> {
        let Message { category, action, body } = message;
        if action.trim().is_empty() {
            return Err(ProtocolError::InvalidMessage("empty action".into()));
        }

        let command = match (category, action.as_str()) {
            (Category::Game, "go") => Command::Game(GameCommand::Roll),
            (Category::Game, "buy") => Command::Game(GameCommand::Buy),
            (Category::Game, "pass") => Command::Game(GameCommand::Pass),
            (Category::Game, "pay") => Command::Game(GameCommand::Pay),
            (Category::Game, "end") => Command::Game(GameCommand::End),
            (Category::Game, "forfeit") => Command::Game(GameCommand::Forfeit),
            (Category::Game, "house") => {
                let HouseBody { property } = required_body(&action, body)?;
                Command::Game(GameCommand::Develop { property })
            }
            (Category::Game, "useCard") => {
                let CardBody { card } = required_body(&action, body)?;
                Command::Game(GameCommand::UseCard { card })
            }
            (Category::Game, "trade") => Command::Game(GameCommand::Propose(required_body(&action, body)?)),
            (Category::Game, "acceptTrade") => {
                let AcceptBody { trade_id } = required_body(&action, body)?;
                Command::Game(GameCommand::Accept { trade_id })
            }
            (Category::Room, "message") => {
                let text = match required_body(&action, body)? {
                    ChatBody::Plain(text) | ChatBody::Wrapped { text } => text,
                };
                Command::Room(RoomCommand::Chat(text))
            }
            (Category::Room, "create") => Command::Room(RoomCommand::Create),
            _ => return Err(ProtocolError::UnknownAction(action)),
        };
        Ok(command)
    }
}
