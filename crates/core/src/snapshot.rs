use crate::board::BoardRows;
use crate::player::{ActivePiece, PlayerState};
use crate::types::{PieceKind, PlayerId, RoomId};

/// Everything a client needs to draw one player's half of the match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSnapshot {
    pub player: PlayerId,
    pub board: BoardRows,
    pub active: ActivePiece,
    pub next: PieceKind,
    pub score: u32,
    pub lines: u32,
}

impl PlayerSnapshot {
    pub fn capture(player: PlayerId, state: &PlayerState) -> Self {
        Self {
            player,
            board: state.board().rows(),
            active: state.active(),
            next: state.next(),
            score: state.score(),
            lines: state.lines(),
        }
    }
}

/// Full canonical state of a session, players in join order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub room_id: RoomId,
    pub players: Vec<PlayerSnapshot>,
}

impl SessionSnapshot {
    pub fn player(&self, id: PlayerId) -> Option<&PlayerSnapshot> {
        self.players.iter().find(|p| p.player == id)
    }

    /// (player, score) pairs in join order.
    pub fn scores(&self) -> Vec<(PlayerId, u32)> {
        self.players.iter().map(|p| (p.player, p.score)).collect()
    }
}
