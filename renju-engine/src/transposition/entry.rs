use renju_core::Cell;

/// What a stored score actually bounds: an exact value, or a fail-low/fail
/// -high bound from a search that was cut off before it could prove the
/// exact value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower,
    Upper,
}

#[derive(Debug, Clone, Copy)]
pub struct TTEntry {
    pub zobrist: u64,
    pub depth: i32,
    pub score: i32,
    pub bound: Bound,
    pub best_move: Option<Cell>,
    pub age: u32,
}
