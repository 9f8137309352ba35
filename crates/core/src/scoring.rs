//! Scoring module
//!
//! Two sources of points: a flat bonus per cell of player-driven descent, and
//! a fixed table for the number of lines a single lock clears.

use crate::types::{DROP_CELL_POINTS, LINE_SCORES};

/// Points for clearing `lines` rows with one lock.
///
/// A tetromino spans at most four rows, so anything above four scores nothing.
pub fn line_clear_points(lines: usize) -> u32 {
    LINE_SCORES.get(lines).copied().unwrap_or(0)
}

/// Points for descending `cells` rows by soft or hard drop.
pub fn drop_points(cells: u32) -> u32 {
    cells.saturating_mul(DROP_CELL_POINTS)
}
