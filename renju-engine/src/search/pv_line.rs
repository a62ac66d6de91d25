use renju_core::Cell;

/// The principal variation found by a search: the sequence of best replies
/// from the current node down to the horizon.
pub struct PVLine {
    moves: Vec<Cell>,
}

impl PVLine {
    pub fn new() -> Self {
        Self { moves: Vec::new() }
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }

    pub fn first(&self) -> Option<Cell> {
        self.moves.first().copied()
    }

    pub fn moves(&self) -> &[Cell] {
        &self.moves
    }

    /// Prepends `cell` to `child_line` and adopts the result as this line.
    pub fn update_line(&mut self, cell: Cell, child_line: &mut Self) {
        self.moves.clear();
        self.moves.push(cell);
        self.moves.append(&mut child_line.moves);
    }
}

impl Default for PVLine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_line_prepends_and_adopts_child() {
        let mut line = PVLine::new();
        let mut child = PVLine::new();
        child.moves.push(Cell::new(1, 1).unwrap());
        child.moves.push(Cell::new(2, 2).unwrap());

        let cell = Cell::new(0, 0).unwrap();
        line.update_line(cell, &mut child);

        assert_eq!(line.first(), Some(cell));
        assert_eq!(line.moves().len(), 3);
        assert!(child.moves().is_empty());
    }
}
