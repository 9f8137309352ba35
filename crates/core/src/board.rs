//! Board module - manages one player's grid
//!
//! The board is a 10x20 grid where each cell is empty or holds the kind of the
//! piece that locked there. Uses a flat array for cache locality and zero allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom).
//!
//! Rows above the grid (`y < 0`) are open space: a piece may hang there while
//! spawning, but nothing is ever stored there.

use crate::pieces::Shape;
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// Color-id view of a board, row-major, `0` for empty.
pub type BoardRows = [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * (BOARD_WIDTH as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Whether a single mino may sit at (x, y).
    ///
    /// Horizontal bounds and the floor are hard walls; rows above the grid are open.
    #[inline]
    pub fn is_open(&self, x: i8, y: i8) -> bool {
        if x < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
            return false;
        }
        if y < 0 {
            return true;
        }
        matches!(self.get(x, y), Some(None))
    }

    /// Check whether `shape` anchored at (x, y) fits.
    ///
    /// Fails on the first mino that is outside `[0, width)`, at or below the
    /// floor, or on top of a locked cell.
    pub fn can_place(&self, shape: &Shape, x: i8, y: i8) -> bool {
        shape
            .cells
            .iter()
            .all(|&(dx, dy)| self.is_open(x + dx, y + dy))
    }

    /// Write `kind` into every mino of `shape` anchored at (x, y).
    ///
    /// Minos that fall outside the grid (including rows above it) are skipped.
    pub fn place(&mut self, shape: &Shape, x: i8, y: i8, kind: PieceKind) {
        for &(dx, dy) in shape.cells.iter() {
            self.set(x + dx, y + dy, Some(kind));
        }
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }
        let start = y * BOARD_WIDTH as usize;
        let end = start + BOARD_WIDTH as usize;
        self.cells[start..end].iter().all(|cell| cell.is_some())
    }

    /// Remove every full row, shifting the rows above down and refilling the top
    /// with empty rows. Returns how many rows were removed.
    ///
    /// Two-pointer compaction from the bottom up; no allocation.
    pub fn clear_full_lines(&mut self) -> usize {
        let width = BOARD_WIDTH as usize;
        let mut cleared = 0usize;
        let mut write_y = BOARD_HEIGHT as usize;

        for read_y in (0..BOARD_HEIGHT as usize).rev() {
            if self.is_row_full(read_y) {
                cleared += 1;
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    let dst_start = write_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, dst_start);
                }
            }
        }

        for cell in &mut self.cells[..write_y * width] {
            *cell = None;
        }

        cleared
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Color-id matrix for snapshots.
    pub fn rows(&self) -> BoardRows {
        let mut rows = [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        for (i, cell) in self.cells.iter().enumerate() {
            if let Some(kind) = cell {
                rows[i / BOARD_WIDTH as usize][i % BOARD_WIDTH as usize] = kind.color_id();
            }
        }
        rows
    }

    /// Build a board from a color-id matrix. Unknown ids become empty cells.
    pub fn from_rows(rows: &BoardRows) -> Self {
        let mut board = Self::new();
        for (y, row) in rows.iter().enumerate() {
            for (x, &id) in row.iter().enumerate() {
                board.cells[y * BOARD_WIDTH as usize + x] = PieceKind::from_color_id(id);
            }
        }
        board
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
