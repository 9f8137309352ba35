//! Pieces module - tetromino rotation tables
//!
//! Every kind has a fixed, ordered list of pre-rotated states. Rotating moves
//! to the next state in the list (wrapping); there is no wall-kick search, so a
//! rotation that collides is simply refused by the caller.
//!
//! Offsets are relative to the top-left of each state's bounding box, which is
//! also the piece anchor.

use crate::types::{PieceKind, BOARD_WIDTH};

/// Offset of a single mino relative to the piece anchor
pub type MinoOffset = (i8, i8);

/// One rotation state: four minos plus the bounding box they live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    pub cells: [MinoOffset; 4],
    pub width: u8,
    pub height: u8,
}

impl Shape {
    const fn new(cells: [MinoOffset; 4], width: u8, height: u8) -> Self {
        Self {
            cells,
            width,
            height,
        }
    }

    /// Bounding-box matrix with `color` in occupied cells and 0 elsewhere.
    pub fn matrix(&self, color: u8) -> Vec<Vec<u8>> {
        let mut rows = vec![vec![0u8; self.width as usize]; self.height as usize];
        for &(dx, dy) in self.cells.iter() {
            rows[dy as usize][dx as usize] = color;
        }
        rows
    }
}

const I_STATES: [Shape; 2] = [
    Shape::new([(0, 1), (1, 1), (2, 1), (3, 1)], 4, 4),
    Shape::new([(2, 0), (2, 1), (2, 2), (2, 3)], 4, 4),
];

const O_STATES: [Shape; 1] = [Shape::new([(0, 0), (1, 0), (0, 1), (1, 1)], 2, 2)];

const T_STATES: [Shape; 4] = [
    Shape::new([(1, 0), (0, 1), (1, 1), (2, 1)], 3, 3),
    Shape::new([(1, 0), (1, 1), (2, 1), (1, 2)], 3, 3),
    Shape::new([(0, 1), (1, 1), (2, 1), (1, 2)], 3, 3),
    Shape::new([(1, 0), (0, 1), (1, 1), (1, 2)], 3, 3),
];

const S_STATES: [Shape; 2] = [
    Shape::new([(1, 0), (2, 0), (0, 1), (1, 1)], 3, 3),
    Shape::new([(1, 0), (1, 1), (2, 1), (2, 2)], 3, 3),
];

const Z_STATES: [Shape; 2] = [
    Shape::new([(0, 0), (1, 0), (1, 1), (2, 1)], 3, 3),
    Shape::new([(2, 0), (1, 1), (2, 1), (1, 2)], 3, 3),
];

const J_STATES: [Shape; 4] = [
    Shape::new([(0, 0), (0, 1), (1, 1), (2, 1)], 3, 3),
    Shape::new([(1, 0), (2, 0), (1, 1), (1, 2)], 3, 3),
    Shape::new([(0, 1), (1, 1), (2, 1), (2, 2)], 3, 3),
    Shape::new([(1, 0), (1, 1), (0, 2), (1, 2)], 3, 3),
];

const L_STATES: [Shape; 4] = [
    Shape::new([(2, 0), (0, 1), (1, 1), (2, 1)], 3, 3),
    Shape::new([(1, 0), (1, 1), (1, 2), (2, 2)], 3, 3),
    Shape::new([(0, 1), (1, 1), (2, 1), (0, 2)], 3, 3),
    Shape::new([(0, 0), (1, 0), (1, 1), (1, 2)], 3, 3),
];

/// The full rotation table for a kind.
pub fn rotations(kind: PieceKind) -> &'static [Shape] {
    match kind {
        PieceKind::I => &I_STATES,
        PieceKind::O => &O_STATES,
        PieceKind::T => &T_STATES,
        PieceKind::S => &S_STATES,
        PieceKind::Z => &Z_STATES,
        PieceKind::J => &J_STATES,
        PieceKind::L => &L_STATES,
    }
}

/// Number of distinct rotation states for a kind.
pub fn rotation_count(kind: PieceKind) -> u8 {
    rotations(kind).len() as u8
}

/// Shape for a kind and rotation index. The index wraps.
pub fn shape(kind: PieceKind, rotation: u8) -> &'static Shape {
    let table = rotations(kind);
    &table[rotation as usize % table.len()]
}

/// Rotation index that follows `rotation`.
pub fn next_rotation(kind: PieceKind, rotation: u8) -> u8 {
    (rotation + 1) % rotation_count(kind)
}

/// Row new pieces spawn on.
pub const SPAWN_Y: i8 = 0;

/// Column that horizontally centers the spawn state of `kind`.
pub fn spawn_x(kind: PieceKind) -> i8 {
    ((BOARD_WIDTH - shape(kind, 0).width) / 2) as i8
}
