//! Integration tests for the Landlord server, handler, and full connection flow.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use landlord::prelude::*;
use serde_json::{json, Value};
use tokio_tungstenite::tungstenite::Message;

// =========================================================================
// Helpers
// =========================================================================

type ClientWs = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Starts a server on a random port and returns the address.
async fn start_server_with(room: RoomConfig) -> String {
    let server = LandlordServer::builder()
        .bind("127.0.0.1:0")
        .room_config(room)
        .build()
        .await
        .expect("server should build");

    let addr = server
        .local_addr()
        .expect("should have local addr")
        .to_string();

    tokio::spawn(async move {
        let _ = server.run().await;
    });

    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(10)).await;
    addr
}

async fn start_server() -> String {
    start_server_with(RoomConfig::default()).await
}

async fn connect(addr: &str, path: &str) -> ClientWs {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}{path}"))
        .await
        .expect("should connect");
    ws
}

async fn send_json(ws: &mut ClientWs, value: Value) {
    ws.send(Message::text(value.to_string()))
        .await
        .expect("send");
}

/// Next text frame as JSON, or `None` on close/timeout.
async fn next_json(ws: &mut ClientWs) -> Option<Value> {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(2), ws.next())
            .await
            .ok()??
            .ok()?;
        match msg {
            Message::Text(text) => return serde_json::from_str(text.as_str()).ok(),
            Message::Close(_) => return None,
            _ => continue,
        }
    }
}

/// Reads frames until one has the given category and action.
async fn wait_for(ws: &mut ClientWs, category: &str, action: &str) -> Value {
    loop {
        let frame = next_json(ws)
            .await
            .unwrap_or_else(|| panic!("no {category}/{action} frame arrived"));
        if frame["category"] == category && frame["action"] == action {
            return frame;
        }
    }
}

/// Reads frames until a broadcast whose text contains `needle`.
async fn wait_for_broadcast(ws: &mut ClientWs, needle: &str) -> String {
    loop {
        let frame = wait_for(ws, "game", "broadcast").await;
        let text = frame["body"].as_str().unwrap_or_default().to_string();
        if text.contains(needle) {
            return text;
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_join_announces_player_and_waiting() {
    let addr = start_server().await;
    let mut ada = connect(&addr, "/ws/lobby1?name=ada").await;

    let joined = wait_for(&mut ada, "room", "joined").await;
    assert_eq!(joined["body"]["name"], "ada");
    assert!(joined["body"]["playerId"].is_u64());

    wait_for_broadcast(&mut ada, "ada joined the game!").await;
    wait_for_broadcast(&mut ada, "Waiting for ada to play").await;
}

#[tokio::test]
async fn test_nameless_join_gets_generated_name() {
    let addr = start_server().await;
    let mut ws = connect(&addr, "/ws/lobby2").await;

    let joined = wait_for(&mut ws, "room", "joined").await;
    let name = joined["body"]["name"].as_str().unwrap();
    assert!(name.starts_with("Player-"), "got {name}");
}

#[tokio::test]
async fn test_second_player_sees_both_joins_in_order() {
    let addr = start_server().await;
    let mut ada = connect(&addr, "/ws/lobby3?name=ada").await;
    wait_for_broadcast(&mut ada, "Waiting for ada").await;

    let mut bob = connect(&addr, "/ws/lobby3?name=bob").await;
    let joined = wait_for(&mut bob, "room", "joined").await;
    assert_eq!(joined["body"]["name"], "bob");

    let seen = wait_for(&mut ada, "room", "joined").await;
    assert_eq!(seen["body"]["name"], "bob");
}

#[tokio::test]
async fn test_create_route_sends_room_key_first() {
    let addr = start_server().await;
    let mut ada = connect(&addr, "/ws/new?name=ada").await;

    let first = next_json(&mut ada).await.expect("first frame");
    assert_eq!(first["category"], "room");
    assert_eq!(first["action"], "created");
    let key = first["body"]["roomKey"].as_str().unwrap().to_string();
    assert_eq!(key.len(), 6);
    assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));

    wait_for(&mut ada, "room", "joined").await;

    let mut bob = connect(&addr, &format!("/ws/{key}?name=bob")).await;
    wait_for(&mut bob, "room", "joined").await;
    let seen = wait_for(&mut ada, "room", "joined").await;
    assert_eq!(seen["body"]["name"], "bob");
}

#[tokio::test]
async fn test_out_of_turn_error_is_private() {
    let addr = start_server().await;
    let mut ada = connect(&addr, "/ws/turns?name=ada").await;
    wait_for_broadcast(&mut ada, "Waiting for ada").await;
    let mut bob = connect(&addr, "/ws/turns?name=bob").await;
    wait_for_broadcast(&mut bob, "bob joined the game!").await;
    wait_for_broadcast(&mut ada, "bob joined the game!").await;

    send_json(&mut bob, json!({ "category": "game", "action": "go" })).await;
    let error = wait_for(&mut bob, "game", "error").await;
    assert_eq!(error["body"], "not your turn");

    // Ada gets the chat but never bob's error.
    send_json(&mut bob, json!({ "category": "room", "action": "message", "body": "sorry" })).await;
    loop {
        let frame = next_json(&mut ada).await.expect("ada should get the chat");
        assert_ne!(frame["action"], "error", "error leaked: {frame}");
        if frame["action"] == "chat" {
            break;
        }
    }
}

#[tokio::test]
async fn test_chat_reaches_everyone() {
    let addr = start_server().await;
    let mut ada = connect(&addr, "/ws/chat?name=ada").await;
    wait_for(&mut ada, "room", "joined").await;
    let mut bob = connect(&addr, "/ws/chat?name=bob").await;
    wait_for(&mut bob, "room", "joined").await;

    send_json(&mut ada, json!({ "category": "room", "action": "message", "body": "hello" })).await;

    for ws in [&mut ada, &mut bob] {
        let chat = wait_for(ws, "room", "chat").await;
        assert_eq!(chat["body"]["from"], "ada");
        assert_eq!(chat["body"]["text"], "hello");
    }
}

#[tokio::test]
async fn test_malformed_frame_gets_notice_and_connection_survives() {
    let addr = start_server().await;
    let mut ada = connect(&addr, "/ws/garbage?name=ada").await;
    wait_for(&mut ada, "room", "joined").await;

    ada.send(Message::text("this is not json")).await.unwrap();
    let error = wait_for(&mut ada, "game", "error").await;
    assert_eq!(error["body"], "invalid message format");

    send_json(&mut ada, json!({ "category": "game", "action": "dance" })).await;
    let error = wait_for(&mut ada, "game", "error").await;
    assert_eq!(error["body"], "invalid action");

    send_json(&mut ada, json!({ "category": "room", "action": "message", "body": "still here" })).await;
    let chat = wait_for(&mut ada, "room", "chat").await;
    assert_eq!(chat["body"]["text"], "still here");
}

#[tokio::test]
async fn test_disconnect_is_announced() {
    let addr = start_server().await;
    let mut ada = connect(&addr, "/ws/leavers?name=ada").await;
    wait_for(&mut ada, "room", "joined").await;
    let mut bob = connect(&addr, "/ws/leavers?name=bob").await;
    wait_for(&mut bob, "room", "joined").await;
    wait_for(&mut ada, "room", "joined").await;

    bob.close(None).await.unwrap();
    drop(bob);

    let left = wait_for(&mut ada, "room", "left").await;
    assert_eq!(left["body"]["name"], "bob");
}

#[tokio::test]
async fn test_create_action_inside_a_room() {
    let addr = start_server().await;
    let mut ada = connect(&addr, "/ws/origin?name=ada").await;
    wait_for(&mut ada, "room", "joined").await;

    send_json(&mut ada, json!({ "category": "room", "action": "create" })).await;
    let created = wait_for(&mut ada, "room", "created").await;
    let key = created["body"]["roomKey"].as_str().unwrap();
    assert_eq!(key.len(), 6);
    assert_ne!(key, "origin");
}

#[tokio::test]
async fn test_full_room_rejects_connection() {
    let addr = start_server_with(RoomConfig {
        max_players: 1,
        ..RoomConfig::default()
    })
    .await;
    let mut ada = connect(&addr, "/ws/tiny?name=ada").await;
    wait_for(&mut ada, "room", "joined").await;

    let mut bob = connect(&addr, "/ws/tiny?name=bob").await;
    let error = wait_for(&mut bob, "game", "error").await;
    assert!(error["body"].as_str().unwrap().contains("full"));
    assert!(next_json(&mut bob).await.is_none(), "connection should close");
}

#[tokio::test]
async fn test_stalled_handshake_does_not_block_others() {
    let addr = start_server().await;
    // Opens TCP but never sends the upgrade request.
    let _idle = tokio::net::TcpStream::connect(addr.as_str()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    let connect = tokio_tungstenite::connect_async(format!("ws://{addr}/ws/lobby?name=bob"));
    let (mut bob, _) = tokio::time::timeout(Duration::from_secs(3), connect)
        .await
        .expect("second client should not wait on the idle one")
        .expect("should connect");
    let joined = wait_for(&mut bob, "room", "joined").await;
    assert_eq!(joined["body"]["name"], "bob");
}

#[tokio::test]
async fn test_bad_route_is_rejected() {
    let addr = start_server().await;
    let mut ws = connect(&addr, "/somewhere/else").await;

    let error = wait_for(&mut ws, "game", "error").await;
    assert!(error["body"].as_str().unwrap().contains("bad route"));
    assert!(next_json(&mut ws).await.is_none(), "connection should close");
}

#[tokio::test]
async fn test_forfeit_on_disconnect_passes_the_turn() {
    let addr = start_server().await;
    let mut ada = connect(&addr, "/ws/forfeit?name=ada").await;
    wait_for(&mut ada, "room", "joined").await;
    let mut bob = connect(&addr, "/ws/forfeit?name=bob").await;
    wait_for(&mut bob, "room", "joined").await;

    // Ada holds the turn; once she is gone bob may roll.
    ada.close(None).await.unwrap();
    drop(ada);
    wait_for(&mut bob, "room", "left").await;

    send_json(&mut bob, json!({ "category": "game", "action": "go" })).await;
    let frame = loop {
        let frame = next_json(&mut bob).await.expect("bob should hear back");
        if frame["action"] == "broadcast" || frame["action"] == "error" {
            break frame;
        }
    };
    assert_ne!(frame["body"], "not your turn", "turn did not pass: {frame}");
}
