//! Shared types and constants for the duel server.
//!
//! Everything here is plain data with no behavior beyond parsing and
//! formatting, so it can be used from the simulation core, the wire protocol,
//! and tests alike.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, top to bottom)
//!
//! Pieces spawn horizontally centered on row 0. Cells above row 0 are legal
//! for a falling piece but are never written into the board.
//!
//! # Scoring
//!
//! | Event | Points |
//! |-------|--------|
//! | Soft drop / hard drop | 10 per cell descended |
//! | 1 line | 100 |
//! | 2 lines | 300 |
//! | 3 lines | 500 |
//! | 4 lines | 800 |
//!
//! # Examples
//!
//! ```
//! use tetris_duel_types::{PieceKind, PlayerAction, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(PieceKind::T.color_id(), 3);
//! assert_eq!(PlayerAction::from_str("hardDrop"), Some(PlayerAction::HardDrop));
//! assert_eq!((BOARD_WIDTH, BOARD_HEIGHT), (10, 20));
//! ```

use std::fmt;

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Players per room.
pub const MAX_PLAYERS: usize = 2;

/// Reference gravity period in milliseconds (one row per second).
pub const TICK_MS: u32 = 1000;

/// Points awarded for every cell a piece descends via soft or hard drop.
pub const DROP_CELL_POINTS: u32 = 10;

/// Line clear scoring table, indexed by the number of lines cleared in one lock.
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// The seven tetromino piece kinds
///
/// Each kind has a fixed color id used on the board and on the wire:
/// I=1, O=2, T=3, S=4, Z=5, J=6, L=7. Zero is reserved for empty cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds in color-id order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Color id written into board cells when this kind locks.
    pub fn color_id(&self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::O => 2,
            PieceKind::T => 3,
            PieceKind::S => 4,
            PieceKind::Z => 5,
            PieceKind::J => 6,
            PieceKind::L => 7,
        }
    }

    /// Inverse of [`PieceKind::color_id`].
    ///
    /// ```
    /// use tetris_duel_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_color_id(2), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_color_id(0), None);
    /// assert_eq!(PieceKind::from_color_id(8), None);
    /// ```
    pub fn from_color_id(id: u8) -> Option<Self> {
        match id {
            1..=7 => Some(Self::ALL[(id - 1) as usize]),
            _ => None,
        }
    }

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_duel_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Uppercase letter used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
        }
    }
}

/// Player inputs accepted by a running match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerAction {
    /// Shift the active piece one column left
    MoveLeft,
    /// Shift the active piece one column right
    MoveRight,
    /// Move the active piece down one row (scores a drop bonus)
    SoftDrop,
    /// Advance to the next rotation state (no wall kicks)
    Rotate,
    /// Drop to the lowest legal row and lock immediately
    HardDrop,
}

impl PlayerAction {
    /// Parse action from its wire name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_duel_types::PlayerAction;
    ///
    /// assert_eq!(PlayerAction::from_str("moveLeft"), Some(PlayerAction::MoveLeft));
    /// assert_eq!(PlayerAction::from_str("ROTATE"), Some(PlayerAction::Rotate));
    /// assert_eq!(PlayerAction::from_str("hold"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(PlayerAction::MoveLeft),
            "moveright" => Some(PlayerAction::MoveRight),
            "softdrop" => Some(PlayerAction::SoftDrop),
            "rotate" => Some(PlayerAction::Rotate),
            "harddrop" => Some(PlayerAction::HardDrop),
            _ => None,
        }
    }

    /// Convert to the camelCase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerAction::MoveLeft => "moveLeft",
            PlayerAction::MoveRight => "moveRight",
            PlayerAction::SoftDrop => "softDrop",
            PlayerAction::Rotate => "rotate",
            PlayerAction::HardDrop => "hardDrop",
        }
    }
}

/// Stable identifier of a connected player.
///
/// The transport assigns one per connection; it never changes for the
/// lifetime of that connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a room, shared out-of-band between the two players.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    /// Fresh random identifier (UUID v4 text).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomId {
    fn from(value: &str) -> Self {
        Self(value.trim().to_string())
    }
}

impl From<String> for RoomId {
    fn from(value: String) -> Self {
        Self(value.trim().to_string())
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell locked with the specified piece kind
pub type Cell = Option<PieceKind>;
