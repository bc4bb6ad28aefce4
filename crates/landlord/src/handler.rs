//! Per-connection handler: route, join, and the read/write loops.
//!
//! Each accepted stream gets its own Tokio task running this handler.
//! The flow is:
//!   0. Complete the WebSocket upgrade
//!   1. Parse the upgrade target → pick or create the room
//!   2. Join the room (a fresh room first sends `room/created`)
//!   3. Spawn a writer task draining the connection's outbound channel
//!   4. Loop: receive frames → hand them to the room
//!   5. On exit: leave the room, let the writer drain, close

use std::sync::Arc;

use landlord_protocol::{Codec, JsonCodec, Message, RoomCommand};
use landlord_room::{Dispatch, RoomHub, RoomRegistry};
use landlord_transport::{Connection, ConnectionId, Incoming, WebSocketConnection, WebSocketIncoming};
use tokio::sync::mpsc;

use crate::route::{parse_target, Route};
use crate::LandlordError;

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    incoming: WebSocketIncoming,
    registry: Arc<RoomRegistry>,
) -> Result<(), LandlordError> {
    let peer = incoming.peer_addr();
    let conn = match incoming.upgrade().await {
        Ok(conn) => Arc::new(conn),
        Err(e) => {
            tracing::debug!(%peer, error = %e, "handshake failed");
            return Err(e.into());
        }
    };
    let conn_id = conn.id();
    tracing::debug!(%conn_id, target = conn.target(), "handling new connection");

    let route = match parse_target(conn.target()) {
        Ok(route) => route,
        Err(e) => {
            reject(&conn, &e).await;
            return Err(e);
        }
    };

    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel::<Arc<str>>();
    let name = route.name().map(str::to_string);
    let hub = match route {
        Route::Join { key, .. } => registry.get_or_create(key).await,
        Route::Create { .. } => {
            let hub = registry.create_room().await;
            let created = JsonCodec.encode(&Message::created(hub.key().as_str()))?;
            // Queued ahead of the join so it is the first frame the client sees.
            let _ = outbound_tx.send(created.into());
            hub
        }
    };

    let seat = match hub.join(conn_id, name, outbound_tx).await {
        Ok(seat) => seat,
        Err(e) => {
            let e = LandlordError::from(e);
            reject(&conn, &e).await;
            return Err(e);
        }
    };
    tracing::info!(%conn_id, room = %hub.key(), player_id = %seat.player, "connection joined room");

    let writer = tokio::spawn(write_loop(Arc::clone(&conn), outbound_rx));

    let result = read_loop(&conn, &hub, &registry).await;

    if let Err(e) = hub.leave(conn_id).await {
        tracing::debug!(%conn_id, error = %e, "leave failed");
    }
    // The room dropped its sender in `leave`, so the writer finishes once it
    // has flushed what was already queued.
    let _ = writer.await;
    let _ = conn.close().await;
    tracing::info!(%conn_id, room = %hub.key(), "connection closed");

    result
}

async fn read_loop(
    conn: &WebSocketConnection,
    hub: &RoomHub,
    registry: &RoomRegistry,
) -> Result<(), LandlordError> {
    let conn_id = conn.id();
    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::debug!(%conn_id, "connection closed cleanly");
                return Ok(());
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                return Ok(());
            }
        };

        match hub.handle_frame(conn_id, &data).await? {
            Dispatch::Handled => {}
            Dispatch::Forward(RoomCommand::Create) => {
                let room = registry.create_room().await;
                tracing::info!(%conn_id, room = %room.key(), "room created on request");
                hub.send_to(conn_id, &Message::created(room.key().as_str()))?;
            }
            Dispatch::Forward(other) => {
                tracing::debug!(%conn_id, ?other, "unrouted room command");
            }
        }
    }
}

/// Drains the connection's outbound channel onto the socket.
async fn write_loop(conn: Arc<WebSocketConnection>, mut rx: mpsc::UnboundedReceiver<Arc<str>>) {
    let conn_id: ConnectionId = conn.id();
    while let Some(frame) = rx.recv().await {
        if let Err(e) = conn.send(&frame).await {
            // Dropping `rx` makes the room prune this connection.
            tracing::debug!(%conn_id, error = %e, "write failed");
            break;
        }
    }
}

/// Tells the client why it cannot be seated, then closes.
async fn reject(conn: &WebSocketConnection, error: &LandlordError) {
    tracing::info!(conn_id = %conn.id(), %error, "connection rejected");
    if let Ok(frame) = JsonCodec.encode(&Message::error(error.to_string())) {
        let _ = conn.send(&frame).await;
    }
    let _ = conn.close().await;
}
