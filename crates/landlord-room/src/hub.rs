//! Room hub: one board shared by every connection in a room.
//!
//! Connection tasks call into the hub directly. Every board operation runs
//! under the board lock, and broadcasts are queued while that lock is still
//! held, so the order clients see narration in matches the order the board
//! applied the operations. A single delivery task per room drains the queue
//! and fans each frame out to the live connections.
//!
//! Lock order is always board, then seats, then fan-out. The seat and
//! fan-out maps sit behind plain mutexes that are never held across an
//! await, so nothing suspends while the board is locked.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, MutexGuard, PoisonError};

use landlord_game::{Board, GameError, Outcome, PlayerId, RandomDice};
use landlord_protocol::{Codec, Command, GameCommand, JsonCodec, Message, RoomCommand};
use landlord_transport::ConnectionId;
use tokio::sync::{mpsc, Mutex};

use crate::{RoomConfig, RoomError, RoomKey};

/// Channel that carries encoded frames to one connection's writer task.
pub type ClientSender = mpsc::UnboundedSender<Arc<str>>;

type Fanout = Arc<std::sync::Mutex<HashMap<ConnectionId, ClientSender>>>;

fn lock<T>(mutex: &std::sync::Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A connection's identity within a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub player: PlayerId,
    pub name: String,
}

/// What the hub did with an inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Fully handled here, including any error notice.
    Handled,
    /// A room command that needs something outside this room.
    Forward(RoomCommand),
}

pub struct RoomHub {
    key: RoomKey,
    config: RoomConfig,
    codec: JsonCodec,
    board: Mutex<Board>,
    seats: std::sync::Mutex<HashMap<ConnectionId, Seat>>,
    fanout: Fanout,
    broadcast_tx: mpsc::UnboundedSender<Arc<str>>,
    name_seq: AtomicU64,
}

impl RoomHub {
    /// Creates a room with a fresh standard board and starts its delivery
    /// task. Must be called inside a Tokio runtime.
    pub fn spawn(key: RoomKey, config: RoomConfig) -> Arc<Self> {
        let board = Board::standard(config.rules.clone(), Box::new(RandomDice::new()));
        Self::spawn_with_board(key, config, board)
    }

    /// Like [`spawn`](Self::spawn) but with a prepared board.
    pub fn spawn_with_board(key: RoomKey, config: RoomConfig, board: Board) -> Arc<Self> {
        let (broadcast_tx, broadcast_rx) = mpsc::unbounded_channel();
        let fanout: Fanout = Arc::default();
        tokio::spawn(deliver(key.clone(), broadcast_rx, Arc::clone(&fanout)));

        tracing::info!(room = %key, "room started");
        Arc::new(Self {
            key,
            config,
            codec: JsonCodec,
            board: Mutex::new(board),
            seats: std::sync::Mutex::new(HashMap::new()),
            fanout,
            broadcast_tx,
            name_seq: AtomicU64::new(1),
        })
    }

    pub fn key(&self) -> &RoomKey {
        &self.key
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Number of connections currently seated.
    pub fn connection_count(&self) -> usize {
        lock(&self.seats).len()
    }

    /// Runs `f` against the board under the board lock.
    pub async fn inspect<R>(&self, f: impl FnOnce(&Board) -> R) -> R {
        let board = self.board.lock().await;
        f(&board)
    }

    // -- Membership --

    /// Seats a connection as a new player and announces it to the room.
    ///
    /// A missing or blank `name` becomes `Player-<n>`.
    pub async fn join(
        &self,
        conn: ConnectionId,
        name: Option<String>,
        outbound: ClientSender,
    ) -> Result<Seat, RoomError> {
        let mut board = self.board.lock().await;
        let mut seats = lock(&self.seats);

        if seats.contains_key(&conn) {
            return Err(RoomError::AlreadyJoined(conn, self.key.clone()));
        }
        if board.players().len() >= self.config.max_players {
            return Err(RoomError::RoomFull(self.key.clone()));
        }

        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("Player-{}", self.name_seq.fetch_add(1, Ordering::Relaxed)));
        let player = board.add_player(name.clone()).id;
        let seat = Seat { player, name };

        seats.insert(conn, seat.clone());
        lock(&self.fanout).insert(conn, outbound);
        tracing::info!(room = %self.key, %conn, player_id = %player, name = %seat.name, "player joined");

        self.broadcast(&Message::joined(&seat.name, player.0))?;
        self.broadcast(&Message::broadcast(format!("{} joined the game!", seat.name)))?;
        if board.players().len() == 1 {
            self.broadcast(&Message::broadcast(format!("Waiting for {} to play", seat.name)))?;
        }
        Ok(seat)
    }

    /// Drops a connection from the room. With `forfeit_on_disconnect` the
    /// player is also removed from the board and their assets revert.
    pub async fn leave(&self, conn: ConnectionId) -> Result<(), RoomError> {
        let mut board = self.board.lock().await;
        let seat = lock(&self.seats)
            .remove(&conn)
            .ok_or_else(|| RoomError::UnknownConnection(conn, self.key.clone()))?;
        lock(&self.fanout).remove(&conn);
        tracing::info!(room = %self.key, %conn, player_id = %seat.player, "player left");

        if self.config.forfeit_on_disconnect && board.player(seat.player).is_some() {
            if let Ok(outcome) = board.remove_player(seat.player) {
                self.publish_outcome(conn, outcome)?;
            }
        }
        self.broadcast(&Message::left(&seat.name))
    }

    // -- Inbound frames --

    /// Decodes one inbound frame from `conn` and acts on it.
    ///
    /// Malformed frames and rule violations are answered to `conn` alone and
    /// still return `Ok`; only hub-level failures are errors.
    pub async fn handle_frame(&self, conn: ConnectionId, data: &[u8]) -> Result<Dispatch, RoomError> {
        let seat = lock(&self.seats)
            .get(&conn)
            .cloned()
            .ok_or_else(|| RoomError::UnknownConnection(conn, self.key.clone()))?;

        let command = match self.codec.decode_command(data) {
            Ok(command) => command,
            Err(e) => {
                tracing::debug!(room = %self.key, %conn, error = %e, "rejected frame");
                self.send_to(conn, &Message::error(e.client_notice()))?;
                return Ok(Dispatch::Handled);
            }
        };

        match command {
            Command::Game(cmd) => {
                self.apply(conn, &seat, cmd).await?;
                Ok(Dispatch::Handled)
            }
            Command::Room(RoomCommand::Chat(text)) => {
                self.broadcast(&Message::chat(&seat.name, &text))?;
                Ok(Dispatch::Handled)
            }
            Command::Room(other) => Ok(Dispatch::Forward(other)),
        }
    }

    async fn apply(&self, conn: ConnectionId, seat: &Seat, cmd: GameCommand) -> Result<(), RoomError> {
        let mut board = self.board.lock().await;
        let player = seat.player;
        tracing::debug!(room = %self.key, player_id = %player, ?cmd, "game command");

        let result: Result<Outcome, GameError> = match cmd {
            GameCommand::Roll => board.roll_and_move(player),
            GameCommand::Buy => board.buy_property(player),
            GameCommand::Pass => board.decline_purchase(player),
            GameCommand::Pay => board.settle_debt(player),
            GameCommand::End => board.end_turn(player),
            GameCommand::Develop { property } => board.develop_property(player, property),
            GameCommand::UseCard { card } => board.use_card(player, card),
            GameCommand::Propose(request) => board.propose_trade(player, request),
            GameCommand::Accept { trade_id } => board.accept_trade(player, trade_id),
            GameCommand::Forfeit => board.remove_player(player),
        };

        match result {
            Ok(outcome) => self.publish_outcome(conn, outcome),
            Err(e) => {
                tracing::debug!(room = %self.key, player_id = %player, error = %e, "command refused");
                self.send_to(conn, &Message::error(e.to_string()))
            }
        }
    }

    // -- Outbound --

    /// Queues narration for everyone and sends any prompt to `conn` alone.
    /// Called with the board lock held.
    fn publish_outcome(&self, conn: ConnectionId, outcome: Outcome) -> Result<(), RoomError> {
        if let Some(text) = outcome.broadcast.filter(|t| !t.is_empty()) {
            self.broadcast(&Message::broadcast(text))?;
        }
        if let Some(text) = outcome.prompt.filter(|t| !t.is_empty()) {
            self.send_to(conn, &Message::prompt(text))?;
        }
        Ok(())
    }

    fn broadcast(&self, message: &Message) -> Result<(), RoomError> {
        let frame: Arc<str> = self.codec.encode(message)?.into();
        // Only fails once the delivery task is gone, i.e. at runtime shutdown.
        let _ = self.broadcast_tx.send(frame);
        Ok(())
    }

    /// Sends a message to one connection.
    pub fn send_to(&self, conn: ConnectionId, message: &Message) -> Result<(), RoomError> {
        let frame: Arc<str> = self.codec.encode(message)?.into();
        let mut fanout = lock(&self.fanout);
        if let Some(tx) = fanout.get(&conn) {
            if tx.send(frame).is_err() {
                tracing::warn!(room = %self.key, %conn, "pruned dead connection");
                fanout.remove(&conn);
            }
        }
        Ok(())
    }
}

/// Delivery loop: one per room, ends when the hub is dropped.
async fn deliver(key: RoomKey, mut rx: mpsc::UnboundedReceiver<Arc<str>>, fanout: Fanout) {
    while let Some(frame) = rx.recv().await {
        let mut clients = lock(&fanout);
        clients.retain(|conn, tx| {
            let alive = tx.send(Arc::clone(&frame)).is_ok();
            if !alive {
                tracing::warn!(room = %key, %conn, "pruned dead connection");
            }
            alive
        });
    }
    tracing::debug!(room = %key, "delivery loop stopped");
}
