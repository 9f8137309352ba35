use crate::types::{PlayerId, RoomId};

/// Errors raised by room and session operations.
///
/// Only `RoomNotFound`, `RoomFull` and `AlreadyInRoom` are reported back to
/// the client; the rest are logged and dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Game not found")]
    RoomNotFound,
    #[error("Game is already full")]
    RoomFull,
    #[error("Unknown input: {0}")]
    InvalidInput(String),
    #[error("Player {player} is not in room {room_id}")]
    UnauthorizedAction { player: PlayerId, room_id: RoomId },
    #[error("Already playing in room {0}")]
    AlreadyInRoom(RoomId),
    #[error("Room {0} is not running")]
    SessionInactive(RoomId),
}

impl GameError {
    /// Whether the originating client should receive an `error` message.
    pub fn is_reported(&self) -> bool {
        matches!(
            self,
            GameError::RoomNotFound | GameError::RoomFull | GameError::AlreadyInRoom(_)
        )
    }
}
