//! Per-player simulation state: board, falling piece, preview piece, score.
//!
//! Every mutation checks [`Board::can_place`] against the target position
//! first and only then writes, so a `PlayerState` can never hold a piece in
//! an illegal spot (except the one that just topped out, which ends the match).

use crate::board::Board;
use crate::pieces::{next_rotation, shape, spawn_x, Shape, SPAWN_Y};
use crate::rng::PieceGenerator;
use crate::scoring::{drop_points, line_clear_points};
use crate::types::{PieceKind, PlayerAction};

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub kind: PieceKind,
    /// Index into the kind's rotation table
    pub rotation: u8,
    /// Anchor column (left edge of the bounding box)
    pub x: i8,
    /// Anchor row (top edge of the bounding box)
    pub y: i8,
}

impl ActivePiece {
    /// Create a new piece at the spawn position
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: 0,
            x: spawn_x(kind),
            y: SPAWN_Y,
        }
    }

    /// Get the shape for the current rotation
    pub fn shape(&self) -> &'static Shape {
        shape(self.kind, self.rotation)
    }

    /// Check if the piece fits on the board where it is
    pub fn fits(&self, board: &Board) -> bool {
        board.can_place(self.shape(), self.x, self.y)
    }

    fn offset(self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }
}

/// Result of committing a piece to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockOutcome {
    pub lines_cleared: usize,
    /// Line-clear points awarded for this lock
    pub points: u32,
    /// The replacement piece collided at its spawn position
    pub topped_out: bool,
}

/// Result of one gravity step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GravityOutcome {
    Fell,
    Locked(LockOutcome),
}

/// Result of applying a player action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The target position was illegal; nothing changed
    Rejected,
    /// The piece moved or rotated
    Moved,
    /// The piece locked (hard drop)
    Locked(LockOutcome),
}

impl ActionOutcome {
    pub fn accepted(&self) -> bool {
        !matches!(self, ActionOutcome::Rejected)
    }
}

/// Complete state for one player in a match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    board: Board,
    active: ActivePiece,
    next: PieceKind,
    score: u32,
    lines: u32,
}

impl PlayerState {
    /// Empty board, a spawned active piece and a preview piece, score 0.
    pub fn new(generator: &mut PieceGenerator) -> Self {
        let active = ActivePiece::spawn(generator.next().kind);
        let next = generator.next().kind;
        Self::from_parts(Board::new(), active, next)
    }

    /// Assemble a state from explicit parts (replays and tests).
    pub fn from_parts(board: Board, active: ActivePiece, next: PieceKind) -> Self {
        Self {
            board,
            active,
            next,
            score: 0,
            lines: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access, for scripted setups.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn active(&self) -> ActivePiece {
        self.active
    }

    pub fn next(&self) -> PieceKind {
        self.next
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    /// Move the active piece by (dx, dy) if the target is legal.
    pub fn try_move(&mut self, dx: i8, dy: i8) -> bool {
        let moved = self.active.offset(dx, dy);
        if moved.fits(&self.board) {
            self.active = moved;
            true
        } else {
            false
        }
    }

    /// Advance to the next rotation state in place, or leave the piece alone.
    pub fn try_rotate(&mut self) -> bool {
        let rotated = ActivePiece {
            rotation: next_rotation(self.active.kind, self.active.rotation),
            ..self.active
        };
        if rotated.fits(&self.board) {
            self.active = rotated;
            true
        } else {
            false
        }
    }

    /// One row down with the drop bonus.
    pub fn soft_drop(&mut self) -> bool {
        if self.try_move(0, 1) {
            self.score += drop_points(1);
            true
        } else {
            false
        }
    }

    /// Fall as far as possible (bonus per row), then lock.
    pub fn hard_drop(&mut self, generator: &mut PieceGenerator) -> LockOutcome {
        let mut cells = 0u32;
        while self.try_move(0, 1) {
            cells += 1;
        }
        self.score += drop_points(cells);
        self.lock(generator)
    }

    /// One gravity step: fall a row, or lock where the piece rests.
    pub fn gravity(&mut self, generator: &mut PieceGenerator) -> GravityOutcome {
        if self.try_move(0, 1) {
            GravityOutcome::Fell
        } else {
            GravityOutcome::Locked(self.lock(generator))
        }
    }

    /// Commit the active piece, clear lines, score, and spawn the preview piece.
    pub fn lock(&mut self, generator: &mut PieceGenerator) -> LockOutcome {
        let piece = self.active;
        self.board.place(piece.shape(), piece.x, piece.y, piece.kind);

        let lines_cleared = self.board.clear_full_lines();
        let points = line_clear_points(lines_cleared);
        self.score += points;
        self.lines += lines_cleared as u32;

        self.active = ActivePiece::spawn(self.next);
        self.next = generator.next().kind;

        LockOutcome {
            lines_cleared,
            points,
            topped_out: !self.active.fits(&self.board),
        }
    }

    /// Apply one player action.
    pub fn apply(&mut self, action: PlayerAction, generator: &mut PieceGenerator) -> ActionOutcome {
        let moved = match action {
            PlayerAction::MoveLeft => self.try_move(-1, 0),
            PlayerAction::MoveRight => self.try_move(1, 0),
            PlayerAction::SoftDrop => self.soft_drop(),
            PlayerAction::Rotate => self.try_rotate(),
            PlayerAction::HardDrop => return ActionOutcome::Locked(self.hard_drop(generator)),
        };
        if moved {
            ActionOutcome::Moved
        } else {
            ActionOutcome::Rejected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SequenceSource;

    fn generator(kind: PieceKind) -> PieceGenerator {
        PieceGenerator::new(Box::new(SequenceSource::repeat(kind)))
    }

    #[test]
    fn test_new_player_spawns_centered() {
        let mut gen = generator(PieceKind::T);
        let state = PlayerState::new(&mut gen);
        assert_eq!(state.active(), ActivePiece::spawn(PieceKind::T));
        assert_eq!(state.active().x, 3);
        assert_eq!(state.active().y, 0);
        assert_eq!(state.next(), PieceKind::T);
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_soft_drop_awards_bonus_only_when_legal() {
        let mut gen = generator(PieceKind::O);
        let mut state = PlayerState::new(&mut gen);
        assert!(state.soft_drop());
        assert_eq!(state.score(), 10);

        // Park the O on the floor.
        while state.try_move(0, 1) {}
        assert!(!state.soft_drop());
        assert_eq!(state.score(), 10);
    }

    #[test]
    fn test_hard_drop_scores_each_cell_and_locks() {
        let mut gen = generator(PieceKind::O);
        let mut state = PlayerState::new(&mut gen);

        let outcome = state.hard_drop(&mut gen);
        assert_eq!(outcome.lines_cleared, 0);
        assert!(!outcome.topped_out);
        // O spawns at y=0 and rests at y=18.
        assert_eq!(state.score(), 180);
        assert_eq!(state.board().get(4, 19), Some(Some(PieceKind::O)));
        assert_eq!(state.active(), ActivePiece::spawn(PieceKind::O));
    }

    #[test]
    fn test_gravity_falls_then_locks() {
        let mut gen = generator(PieceKind::I);
        let mut state = PlayerState::new(&mut gen);
        // Horizontal I occupies row y+1 of its box, so it rests with anchor y=18.
        for _ in 0..18 {
            assert_eq!(state.gravity(&mut gen), GravityOutcome::Fell);
        }
        assert!(matches!(state.gravity(&mut gen), GravityOutcome::Locked(_)));
        assert_eq!(state.board().get(3, 19), Some(Some(PieceKind::I)));
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_rejected_action_reports_rejected() {
        let mut gen = generator(PieceKind::O);
        let mut state = PlayerState::new(&mut gen);
        // O has a single rotation state; rotating to itself is legal.
        assert!(state.apply(PlayerAction::Rotate, &mut gen).accepted());
        while state.try_move(1, 0) {}
        assert_eq!(
            state.apply(PlayerAction::MoveRight, &mut gen),
            ActionOutcome::Rejected
        );
    }
}
