//! Fixed-byte-budget, direct-mapped transposition table. Safe, single
//! slot per index (no unsafe lock-less sharing): the search driver owns
//! one table and probes/stores it between iterations.

use renju_core::Cell;

use super::entry::{Bound, TTEntry};

pub const DEFAULT_SIZE_MB: usize = 16;
const ENTRY_SIZE_ESTIMATE_BYTES: usize = 48;

#[derive(Debug, Default, Clone, Copy)]
pub struct TTStats {
    pub hits: u64,
    pub misses: u64,
    pub stores: u64,
    pub overwrites: u64,
}

impl TTStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

pub struct ProbeResult {
    /// Usable only when the stored depth covered the query and the bound
    /// permits it against the caller's window.
    pub score: Option<i32>,
    /// Always returned on a key match regardless of depth, for ordering.
    pub best_move: Option<Cell>,
}

pub struct TranspositionTable {
    slots: Vec<Option<TTEntry>>,
    size: usize,
    age: u32,
    filled: usize,
    stats: TTStats,
}

impl TranspositionTable {
    pub fn with_size_mb(size_mb: usize) -> Self {
        let size = ((size_mb * 1024 * 1024) / ENTRY_SIZE_ESTIMATE_BYTES).max(1);
        log::info!("transposition table sized for {size_mb} MB ({size} entries)");
        Self { slots: vec![None; size], size, age: 0, filled: 0, stats: TTStats::default() }
    }

    fn index(&self, zobrist: u64) -> usize {
        (zobrist as usize) % self.size
    }

    pub fn probe(&mut self, zobrist: u64, depth: i32, alpha: i32, beta: i32) -> ProbeResult {
        let Some(entry) = self.slots[self.index(zobrist)] else {
            self.stats.misses += 1;
            return ProbeResult { score: None, best_move: None };
        };
        if entry.zobrist != zobrist {
            self.stats.misses += 1;
            return ProbeResult { score: None, best_move: None };
        }

        self.stats.hits += 1;
        if entry.depth < depth {
            return ProbeResult { score: None, best_move: entry.best_move };
        }

        let usable = match entry.bound {
            Bound::Exact => true,
            Bound::Lower => entry.score >= beta,
            Bound::Upper => entry.score <= alpha,
        };
        ProbeResult { score: usable.then_some(entry.score), best_move: entry.best_move }
    }

    pub fn store(&mut self, zobrist: u64, depth: i32, score: i32, bound: Bound, best_move: Option<Cell>) {
        let idx = self.index(zobrist);
        let current_age = self.age;
        let slot = &mut self.slots[idx];

        let should_replace = match slot {
            None => true,
            Some(existing) => {
                existing.depth < depth
                    || existing.age < current_age
                    || (existing.depth == depth && bound == Bound::Exact && existing.bound != Bound::Exact)
            }
        };

        if !should_replace {
            return;
        }

        if slot.is_none() {
            self.filled += 1;
        } else {
            self.stats.overwrites += 1;
        }
        self.stats.stores += 1;
        *slot = Some(TTEntry { zobrist, depth, score, bound, best_move, age: current_age });
    }

    /// Called at the start of each `get_move` search: ages the table so
    /// stale entries from a previous search lose replacement priority.
    pub fn new_search(&mut self) {
        self.age += 1;
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
        self.filled = 0;
        self.age = 0;
        self.stats = TTStats::default();
    }

    pub fn fill_rate(&self) -> f64 {
        self.filled as f64 / self.size as f64
    }

    pub fn stats(&self) -> TTStats {
        self.stats
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::with_size_mb(DEFAULT_SIZE_MB)
    }
}
