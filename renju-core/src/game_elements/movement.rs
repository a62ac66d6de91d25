use serde::{Deserialize, Serialize};

use super::cell::Cell;
use super::color::Color;

/// A single applied placement, including the stones it captured, so that
/// `undo_move` can restore the position exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub row: usize,
    pub col: usize,
    pub side: Color,
    pub captured: Vec<(usize, usize)>,
}

impl MoveRecord {
    pub fn new(cell: Cell, side: Color, captured: Vec<(usize, usize)>) -> Self {
        Self { row: cell.row(), col: cell.col(), side, captured }
    }

    pub fn cell(&self) -> Cell {
        Cell::new(self.row, self.col).expect("move record always holds a valid cell")
    }
}
