//! Outbound notifications.
//!
//! Sessions and the registry never talk to sockets. They hand [`SyncEvent`]s
//! to a [`SyncChannel`], and whoever owns the connections decides how to
//! deliver them.

use crate::snapshot::SessionSnapshot;
use crate::types::{PlayerId, RoomId};

/// A server-to-client notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// Reply to the creator of a room
    GameCreated { room_id: RoomId },
    /// Reply to a successful joiner
    GameJoined {
        room_id: RoomId,
        players: Vec<PlayerId>,
    },
    /// Second player arrived; the clock is running
    StartGame {
        room_id: RoomId,
        players: Vec<PlayerId>,
    },
    /// Full session state after a tick or accepted input
    StateUpdate(SessionSnapshot),
    /// A player lost; final scores in join order
    GameOver {
        message: String,
        scores: Vec<(PlayerId, u32)>,
    },
    /// The opponent left mid-match
    PlayerDisconnected { message: String },
    /// A request from this client failed
    Error { message: String },
}

impl SyncEvent {
    /// Short name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            SyncEvent::GameCreated { .. } => "gameCreated",
            SyncEvent::GameJoined { .. } => "gameJoined",
            SyncEvent::StartGame { .. } => "startGame",
            SyncEvent::StateUpdate(_) => "gameStateUpdate",
            SyncEvent::GameOver { .. } => "gameOver",
            SyncEvent::PlayerDisconnected { .. } => "playerDisconnected",
            SyncEvent::Error { .. } => "error",
        }
    }
}

/// Delivery seam between the simulation and the transport.
///
/// Implementations must not block and must not call back into the registry.
pub trait SyncChannel: Send + Sync {
    /// Deliver to a single player.
    fn send(&self, to: PlayerId, event: &SyncEvent);

    /// Deliver to every listed room member.
    fn broadcast(&self, members: &[PlayerId], event: &SyncEvent) {
        for &member in members {
            self.send(member, event);
        }
    }
}
