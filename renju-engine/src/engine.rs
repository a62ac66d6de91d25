//! Top-level search facade: owns the tables that must persist across
//! moves (transposition table, history, killers, countermoves) and
//! reports the same debug fields the original engine tracked.

#[cfg(not(feature = "wasm"))]
use std::time::Instant;
#[cfg(feature = "wasm")]
use web_time::Instant;

use renju_core::{Captures, Cell, Color, Position};

use crate::search::{Search, SearchOptions};
use crate::time::{DEFAULT_MAX_DEPTH, DEFAULT_TIME_LIMIT_MS};

const SUGGEST_TIME_LIMIT_MS: u64 = 300;

pub struct Engine {
    search: Search,
}

#[derive(Debug, Clone, Default)]
pub struct EngineDebugInfo {
    pub thinking_time_ms: u64,
    pub search_depth: u32,
    pub nodes_evaluated: u64,
    pub nodes_per_second: f64,
    pub best_move: Option<Cell>,
    pub best_score: i32,
    pub pv_line: Vec<Cell>,
    pub top_moves: Vec<(Cell, i32)>,
    pub alpha_cutoffs: u64,
    pub beta_cutoffs: u64,
    pub null_cuts: u64,
    pub lmr_reductions: u64,
    pub lmr_researches: u64,
    pub tt_hit_rate: f64,
    pub tt_fill_rate: f64,
}

impl Engine {
    pub fn new(tt_mb: usize) -> Self {
        log::info!("constructing engine with a {tt_mb} MB transposition table");
        let options = SearchOptions { time_limit_ms: DEFAULT_TIME_LIMIT_MS, max_depth: DEFAULT_MAX_DEPTH, use_aspiration: false };
        Self { search: Search::with_tt_size_mb(options, tt_mb) }
    }

    /// Sets the depth cap and default time budget used by subsequent calls
    /// to `get_move`; `suggest_move` keeps its own shorter default.
    pub fn set_difficulty(&mut self, depth: u32, time_limit_s: f64) {
        self.search.set_max_depth(depth);
        self.search.set_time_limit_ms(seconds_to_ms(time_limit_s));
    }

    /// Finds the best move for `side` in `position`/`captures`, blocking up
    /// to roughly `time_limit_s`. Always returns a legal cell unless the
    /// board has no empty cells left.
    pub fn get_move(&mut self, position: &mut Position, captures: &mut Captures, side: Color, time_limit_s: f64) -> Option<Cell> {
        self.search.set_time_limit_ms(seconds_to_ms(time_limit_s));
        let result = self.search.find_best(position, captures, side);
        self.search.age_between_moves();
        result.best_move
    }

    /// Same contract as `get_move` with a shorter default budget, meant for
    /// move suggestions to an assisted human player rather than play.
    pub fn suggest_move(&mut self, position: &mut Position, captures: &mut Captures, side: Color, time_limit_s: Option<f64>) -> Option<Cell> {
        let ms = time_limit_s.map(seconds_to_ms).unwrap_or(SUGGEST_TIME_LIMIT_MS);
        self.search.set_time_limit_ms(ms);
        let result = self.search.find_best(position, captures, side);
        self.search.age_between_moves();
        result.best_move
    }

    /// Runs a search and returns both the chosen move and the full debug
    /// snapshot from that search, without the between-moves table aging
    /// `get_move`/`suggest_move` apply (callers that want both should call
    /// this once per real move instead of pairing it with those).
    pub fn get_move_with_debug_info(
        &mut self,
        position: &mut Position,
        captures: &mut Captures,
        side: Color,
        time_limit_s: f64,
    ) -> (Option<Cell>, EngineDebugInfo) {
        self.search.set_time_limit_ms(seconds_to_ms(time_limit_s));
        let start = Instant::now();
        let result = self.search.find_best(position, captures, side);
        let thinking_time_ms = start.elapsed().as_millis() as u64;
        self.search.age_between_moves();

        let nodes = result.nodes;
        let nodes_per_second = if thinking_time_ms > 0 { nodes as f64 / (thinking_time_ms as f64 / 1000.0) } else { 0.0 };

        let mut top_moves: Vec<(Cell, i32)> = self.search.root_scores().to_vec();
        top_moves.sort_by(|a, b| b.1.cmp(&a.1));
        top_moves.truncate(5);

        let debug = EngineDebugInfo {
            thinking_time_ms,
            search_depth: result.depth_reached,
            nodes_evaluated: nodes,
            nodes_per_second,
            best_move: result.best_move,
            best_score: result.score.raw(),
            pv_line: result.pv,
            top_moves,
            alpha_cutoffs: self.search.alpha_cutoffs(),
            beta_cutoffs: self.search.beta_cutoffs(),
            null_cuts: self.search.null_cuts(),
            lmr_reductions: self.search.lmr_reductions(),
            lmr_researches: self.search.lmr_researches(),
            tt_hit_rate: self.search.tt_hit_rate(),
            tt_fill_rate: self.search.tt_fill_rate(),
        };
        (result.best_move, debug)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(crate::transposition::DEFAULT_SIZE_MB)
    }
}

fn seconds_to_ms(seconds: f64) -> u64 {
    (seconds * 1000.0).max(1.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use renju_core::Cell as CoreCell;

    #[test]
    fn get_move_returns_a_legal_cell_on_an_empty_board() {
        let mut pos = Position::new();
        let mut caps = Captures::default();
        let mut engine = Engine::new(1);
        let mv = engine.get_move(&mut pos, &mut caps, Color::Black, 0.1);
        assert_eq!(mv, Some(CoreCell::center()));
    }

    #[test]
    fn debug_info_reports_a_completed_depth_and_zero_mutation() {
        let mut pos = Position::new();
        pos.make_move(CoreCell::new(9, 9).unwrap(), Color::Black, vec![]);
        let before = pos.zobrist_key();
        let mut caps = Captures::default();
        let mut engine = Engine::new(1);
        let (mv, debug) = engine.get_move_with_debug_info(&mut pos, &mut caps, Color::White, 0.1);
        assert!(mv.is_some());
        assert!(debug.search_depth >= 1 || debug.best_move.is_some());
        assert_eq!(pos.zobrist_key(), before);
    }
}
