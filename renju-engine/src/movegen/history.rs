//! Move-ordering memory that persists across the whole search: the
//! history heuristic (which placements have paid off regardless of
//! position), killer moves (which placements caused a cutoff at a given
//! depth), and countermoves (the best reply seen so far to a given
//! opponent placement).

use renju_core::{Cell, Color};

pub type MoveScore = i32;

const MAX_HISTORY_VAL: MoveScore = i32::MAX / 2;
const MAX_KILLERS: usize = 3;

/// Indexed by `[color][cell]`, like the teacher's `[color][from][to]`
/// table but collapsed to a single cell index since a placement has no
/// "from" square.
pub struct HistoryTable {
    data: [[MoveScore; 361]; 2],
}

impl HistoryTable {
    pub fn new() -> Self {
        Self { data: [[0; 361]; 2] }
    }

    pub fn get(&self, color: Color, cell: Cell) -> MoveScore {
        self.data[color_index(color)][cell.bit()]
    }

    /// Adds `depth * depth` to the cell's score, halving the whole table
    /// if that pushes it past the cap.
    pub fn record(&mut self, color: Color, cell: Cell, depth: i32) {
        let bonus = depth * depth;
        let slot = &mut self.data[color_index(color)][cell.bit()];
        *slot += bonus;
        if *slot > MAX_HISTORY_VAL {
            self.age();
        }
    }

    fn age(&mut self) {
        for color in self.data.iter_mut() {
            for val in color.iter_mut() {
                *val /= 2;
            }
        }
    }

    /// Halves every entry, called between moves so that stale history from
    /// long-past positions fades out instead of dominating ordering forever.
    pub fn age_between_moves(&mut self) {
        self.age();
    }

    pub fn clear(&mut self) {
        self.data = [[0; 361]; 2];
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Up to `MAX_KILLERS` non-capturing cutoff moves per search depth. Newest
/// insertion goes to the front; the oldest slot is dropped once full.
pub struct KillerTable {
    slots: Vec<Vec<Cell>>,
}

impl KillerTable {
    pub fn new(max_depth: usize) -> Self {
        Self { slots: vec![Vec::new(); max_depth + 1] }
    }

    pub fn record(&mut self, depth: usize, cell: Cell) {
        let Some(slots) = self.slots.get_mut(depth) else { return };
        if slots.first() == Some(&cell) {
            return;
        }
        slots.retain(|&c| c != cell);
        slots.insert(0, cell);
        slots.truncate(MAX_KILLERS);
    }

    pub fn at(&self, depth: usize) -> &[Cell] {
        self.slots.get(depth).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn is_killer(&self, depth: usize, cell: Cell) -> bool {
        self.at(depth).contains(&cell)
    }

    pub fn clear(&mut self) {
        for slots in self.slots.iter_mut() {
            slots.clear();
        }
    }
}

/// The best reply found so far to a given opponent placement, one table
/// per side to move.
pub struct CountermoveTable {
    data: [[Option<Cell>; 361]; 2],
}

impl CountermoveTable {
    pub fn new() -> Self {
        Self { data: [[None; 361]; 2] }
    }

    pub fn get(&self, color: Color, opponent_last: Cell) -> Option<Cell> {
        self.data[color_index(color)][opponent_last.bit()]
    }

    pub fn record(&mut self, color: Color, opponent_last: Cell, reply: Cell) {
        self.data[color_index(color)][opponent_last.bit()] = Some(reply);
    }

    pub fn clear(&mut self) {
        self.data = [[None; 361]; 2];
    }
}

impl Default for CountermoveTable {
    fn default() -> Self {
        Self::new()
    }
}

fn color_index(color: Color) -> usize {
    match color {
        Color::Black => 0,
        Color::White => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_accumulates_depth_squared() {
        let mut table = HistoryTable::new();
        let cell = Cell::new(3, 3).unwrap();
        table.record(Color::Black, cell, 4);
        table.record(Color::Black, cell, 3);
        assert_eq!(table.get(Color::Black, cell), 16 + 9);
    }

    #[test]
    fn killer_table_keeps_most_recent_first_and_caps_at_three() {
        let mut killers = KillerTable::new(8);
        let cells: Vec<Cell> = (0..4).map(|c| Cell::new(5, c).unwrap()).collect();
        for &c in &cells {
            killers.record(4, c);
        }
        assert_eq!(killers.at(4).len(), 3);
        assert_eq!(killers.at(4)[0], cells[3]);
        assert!(!killers.is_killer(4, cells[0]));
    }

    #[test]
    fn countermove_tracks_best_reply_per_opponent_cell() {
        let mut table = CountermoveTable::new();
        let opp_move = Cell::new(9, 9).unwrap();
        let reply = Cell::new(9, 10).unwrap();
        table.record(Color::Black, opp_move, reply);
        assert_eq!(table.get(Color::Black, opp_move), Some(reply));
        assert_eq!(table.get(Color::White, opp_move), None);
    }
}
