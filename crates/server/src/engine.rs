//! Engine loop - the single owner of the room registry.
//!
//! Connections and clocks never touch rooms directly. They post
//! [`EngineEvent`]s into one queue and the engine applies them in arrival
//! order. Every handler runs to completion without awaiting, so a tick and an
//! input for the same room can never interleave.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use tetris_duel_core::{GameError, JoinOutcome, RoomRegistry, SyncEvent};
use tetris_duel_types::{PlayerAction, PlayerId, RoomId};

use crate::protocol::ClientMessage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A parsed line from a connected client
    Inbound {
        player: PlayerId,
        message: ClientMessage,
    },
    /// The client's connection closed
    Disconnected { player: PlayerId },
    /// One gravity step for a room
    Tick { room_id: RoomId },
}

pub struct Engine {
    registry: RoomRegistry,
}

impl Engine {
    pub fn new(registry: RoomRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    /// Drain the queue until every sender is gone.
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<EngineEvent>) {
        while let Some(event) = events.recv().await {
            self.handle(event);
        }
        info!(rooms = self.registry.len(), "engine stopped");
    }

    pub fn handle(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Inbound { player, message } => self.on_message(player, message),
            EngineEvent::Disconnected { player } => {
                if let Some(room) = self.registry.disconnect(player) {
                    info!(%player, %room, "player left a live room");
                }
            }
            EngineEvent::Tick { room_id } => match self.registry.tick(&room_id) {
                Ok(_) => {}
                Err(GameError::RoomNotFound) => {
                    debug!(room = %room_id, "late tick for removed room");
                }
                Err(e) => warn!(room = %room_id, error = %e, "tick failed"),
            },
        }
    }

    fn on_message(&mut self, player: PlayerId, message: ClientMessage) {
        debug!(%player, kind = message.name(), "inbound");
        match message {
            ClientMessage::CreateGame => match self.registry.host(player) {
                Ok(room_id) => self.reply(player, SyncEvent::GameCreated { room_id }),
                Err(e) => self.fail(player, e),
            },
            ClientMessage::JoinGame { room_id } => {
                let room_id = RoomId::from(room_id);
                match self.registry.join(&room_id, player) {
                    Ok(JoinOutcome::AlreadyPresent) => {
                        debug!(%player, room = %room_id, "already seated");
                    }
                    Ok(_) => {}
                    Err(e) => self.fail(player, e),
                }
            }
            ClientMessage::PlayerInput { room_id, input } => {
                let room_id = RoomId::from(room_id);
                let Some(action) = PlayerAction::from_str(&input) else {
                    self.ignore(player, &room_id, GameError::InvalidInput(input));
                    return;
                };
                if let Err(e) = self.registry.apply_input(&room_id, player, action) {
                    self.ignore(player, &room_id, e);
                }
            }
            ClientMessage::GameOver { room_id, score } => {
                let room_id = RoomId::from(room_id);
                match self.registry.report_loss(&room_id, player) {
                    Ok(()) => info!(%player, room = %room_id, reported_score = ?score, "player conceded"),
                    Err(e) => self.ignore(player, &room_id, e),
                }
            }
        }
    }

    fn reply(&self, player: PlayerId, event: SyncEvent) {
        self.registry.services().sync.send(player, &event);
    }

    /// Report a failed request back to its sender when the client expects it.
    fn fail(&self, player: PlayerId, error: GameError) {
        if error.is_reported() {
            debug!(%player, error = %error, "request refused");
            self.reply(
                player,
                SyncEvent::Error {
                    message: error.to_string(),
                },
            );
        } else {
            warn!(%player, error = %error, "request dropped");
        }
    }

    /// In-match traffic that does not apply is logged, never answered.
    fn ignore(&self, player: PlayerId, room_id: &RoomId, error: GameError) {
        match error {
            GameError::SessionInactive(_) => {
                debug!(%player, room = %room_id, "message for idle room ignored");
            }
            GameError::InvalidInput(input) => {
                debug!(%player, room = %room_id, %input, "unknown input ignored");
            }
            e => warn!(%player, room = %room_id, error = %e, "message rejected"),
        }
    }
}
