//! Iterative-deepening negamax with a transposition table, null-move
//! pruning, late-move reductions and optional aspiration windows, driven
//! by a fixed time budget.

use renju_core::{Captures, Cell, Color, Position};

use super::pv_line::PVLine;
use crate::evaluation::{evaluate, has_live_threat, Evaluation};
use crate::movegen::{candidate_moves, is_forced_tier, order_moves, CountermoveTable, HistoryTable, KillerTable, OrderingContext};
use crate::time::{TimeManager, DEFAULT_MAX_DEPTH, DEFAULT_TIME_LIMIT_MS};
use crate::transposition::{Bound, TranspositionTable};

/// Minimum remaining depth for null-move pruning to fire.
const NULL_MOVE_MIN_DEPTH: i32 = 3;
const NULL_MOVE_REDUCTION: i32 = 2;
/// Move index (0-based, among already-ordered candidates) from which late
/// move reduction may apply.
const LMR_MIN_MOVE: usize = 2;
const LMR_MIN_DEPTH: i32 = 3;
const ASPIRATION_WINDOW: i32 = 50;
/// Moves between checks of the wall clock inside the recursive search.
const NODE_TIME_CHECK_INTERVAL: u64 = 10_000;
const KILLER_SLOTS: usize = 64;

pub struct SearchOptions {
    pub time_limit_ms: u64,
    pub max_depth: u32,
    pub use_aspiration: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { time_limit_ms: DEFAULT_TIME_LIMIT_MS, max_depth: DEFAULT_MAX_DEPTH, use_aspiration: false }
    }
}

pub struct SearchResult {
    pub score: Evaluation,
    pub best_move: Option<Cell>,
    pub pv: Vec<Cell>,
    pub depth_reached: u32,
    pub nodes: u64,
}

pub struct Search {
    options: SearchOptions,
    tt: TranspositionTable,
    killers: KillerTable,
    history: HistoryTable,
    countermoves: CountermoveTable,
    timer: TimeManager,
    node_count: u64,
    timed_out: bool,
    alpha_cutoffs: u64,
    beta_cutoffs: u64,
    null_cuts: u64,
    lmr_reductions: u64,
    lmr_researches: u64,
    root_scores: Vec<(Cell, i32)>,
}

impl Search {
    pub fn new(options: SearchOptions) -> Self {
        Self::with_tt_size_mb(options, crate::transposition::DEFAULT_SIZE_MB)
    }

    pub fn with_tt_size_mb(options: SearchOptions, tt_mb: usize) -> Self {
        let timer = TimeManager::new(options.time_limit_ms);
        Self {
            options,
            tt: TranspositionTable::with_size_mb(tt_mb),
            killers: KillerTable::new(KILLER_SLOTS),
            history: HistoryTable::new(),
            countermoves: CountermoveTable::new(),
            timer,
            node_count: 0,
            timed_out: false,
            alpha_cutoffs: 0,
            beta_cutoffs: 0,
            null_cuts: 0,
            lmr_reductions: 0,
            lmr_researches: 0,
            root_scores: Vec::new(),
        }
    }

    /// Called between moves (not between iterations of one search): ages
    /// the history table and drops killer moves so past-position ordering
    /// data fades rather than compounding forever.
    pub fn age_between_moves(&mut self) {
        self.history.age_between_moves();
        self.killers.clear();
    }

    pub fn set_time_limit_ms(&mut self, time_limit_ms: u64) {
        self.options.time_limit_ms = time_limit_ms;
    }

    pub fn set_max_depth(&mut self, max_depth: u32) {
        self.options.max_depth = max_depth;
    }

    pub fn tt_hit_rate(&self) -> f64 {
        self.tt.stats().hit_rate()
    }

    pub fn tt_fill_rate(&self) -> f64 {
        self.tt.fill_rate()
    }

    pub fn nodes_searched(&self) -> u64 {
        self.node_count
    }

    pub fn alpha_cutoffs(&self) -> u64 {
        self.alpha_cutoffs
    }

    pub fn beta_cutoffs(&self) -> u64 {
        self.beta_cutoffs
    }

    pub fn null_cuts(&self) -> u64 {
        self.null_cuts
    }

    pub fn lmr_reductions(&self) -> u64 {
        self.lmr_reductions
    }

    pub fn lmr_researches(&self) -> u64 {
        self.lmr_researches
    }

    /// Per-move scores from the last completed root iteration, descending.
    pub fn root_scores(&self) -> &[(Cell, i32)] {
        &self.root_scores
    }

    /// Runs iterative deepening from depth 1 up to `max_depth`, stopping
    /// early on a found forced win or an exhausted time budget, and
    /// returns the best move found by the last fully-completed iteration.
    pub fn find_best(&mut self, position: &mut Position, captures: &mut Captures, color: Color) -> SearchResult {
        self.tt.new_search();
        self.killers.clear();
        self.node_count = 0;
        self.timed_out = false;
        self.alpha_cutoffs = 0;
        self.beta_cutoffs = 0;
        self.null_cuts = 0;
        self.lmr_reductions = 0;
        self.lmr_researches = 0;
        self.root_scores.clear();
        self.timer = TimeManager::new(self.options.time_limit_ms);

        let candidates = candidate_moves(position, 0);
        if candidates.len() == 1 {
            return SearchResult {
                score: Evaluation::new(0),
                best_move: candidates.first().copied(),
                pv: candidates.first().copied().into_iter().collect(),
                depth_reached: 0,
                nodes: 0,
            };
        }
        if let Some(forced) = self.forced_move(position, captures, color, &candidates) {
            return SearchResult {
                score: Evaluation::max_val(),
                best_move: Some(forced),
                pv: vec![forced],
                depth_reached: 0,
                nodes: self.node_count,
            };
        }

        let mut alpha = Evaluation::min_val();
        let mut beta = Evaluation::max_val();
        let mut best_score = Evaluation::min_val();
        let mut best_move = None;
        let mut best_pv: Vec<Cell> = Vec::new();
        let mut depth_reached = 0u32;
        let mut depth = 1u32;
        let mut completed_root_scores = Vec::new();

        while depth <= self.options.max_depth && self.timer.should_continue(depth_reached) {
            let mut line = PVLine::new();
            self.root_scores.clear();
            let score = self.negamax(position, captures, color, depth as i32, 0, alpha, beta, true, &mut line);

            if self.timed_out {
                break;
            }

            if self.options.use_aspiration {
                if score <= alpha {
                    alpha = Evaluation::min_val();
                    continue;
                }
                if score >= beta {
                    beta = Evaluation::max_val();
                    continue;
                }
            }

            best_score = score;
            if let Some(mv) = line.first() {
                best_move = Some(mv);
            }
            best_pv = line.moves().to_vec();
            depth_reached = depth;
            completed_root_scores = self.root_scores.clone();
            log::debug!("depth {depth}, score {best_score}, nodes {}", self.node_count);

            if best_score.is_positive_mate() || best_score.is_negative_mate() {
                break;
            }

            if self.options.use_aspiration {
                alpha = best_score - ASPIRATION_WINDOW;
                beta = best_score + ASPIRATION_WINDOW;
            }

            depth += 1;
        }

        if best_move.is_none() {
            best_move = candidates.first().copied();
            best_pv = best_move.into_iter().collect();
        }
        self.root_scores = completed_root_scores;

        SearchResult { score: best_score, best_move, pv: best_pv, depth_reached, nodes: self.node_count }
    }

    /// Checks the forced-move prelude: an outright win, or a candidate
    /// whose ordering tier is itself a tactically-forced reply, is played
    /// without spending the iterative-deepening budget on it.
    fn forced_move(&mut self, position: &mut Position, captures: &mut Captures, color: Color, candidates: &[Cell]) -> Option<Cell> {
        for &cell in candidates {
            let Ok(captured) = renju_core::game::check_move(position, cell.row(), cell.col(), color) else { continue };
            let taken = captured.len() as u32;
            captures.add(color, taken);
            position.make_move(cell, color, captured);
            let wins = renju_core::game::check_winner(position, color, captures) == Some(color);
            position.undo_move();
            captures.sub(color, taken);
            if wins {
                return Some(cell);
            }
        }

        let ctx = OrderingContext {
            color,
            captures: &*captures,
            tt_move: None,
            pv_move: None,
            depth: 0,
            killers: &self.killers,
            countermove: None,
            history: &self.history,
        };
        let rated = order_moves(position, candidates.to_vec(), &ctx);
        rated.first().filter(|rm| is_forced_tier(rm.score)).map(|rm| rm.cell)
    }

    #[allow(clippy::too_many_arguments)]
    fn negamax(
        &mut self,
        position: &mut Position,
        captures: &mut Captures,
        color: Color,
        depth_remaining: i32,
        ply: u32,
        mut alpha: Evaluation,
        mut beta: Evaluation,
        can_null: bool,
        pv_line: &mut PVLine,
    ) -> Evaluation {
        self.node_count += 1;
        if self.node_count % NODE_TIME_CHECK_INTERVAL == 0 && self.timer.should_abort() {
            self.timed_out = true;
        }
        if self.timed_out {
            return Evaluation::new(0);
        }

        if ply > 0 {
            if let Some(winner) = renju_core::game::check_winner(position, !color, captures) {
                return if winner == color { Evaluation::win_in(ply as i32) } else { Evaluation::loss_in(ply as i32) };
            }
        }

        if depth_remaining <= 0 {
            return Evaluation::new(evaluate(position, color, captures));
        }

        let zobrist = position.zobrist_key();
        let probe = self.tt.probe(zobrist, depth_remaining, alpha.raw(), beta.raw());
        let tt_move = probe.best_move;
        if ply > 0 {
            if let Some(score) = probe.score {
                return Evaluation::new(score);
            }
        }

        let reply_to = position.last_move().map(|r| r.cell());
        let opponent_already_threatening = has_live_threat(position, !color);
        let is_pv_node = beta.raw() - alpha.raw() > 1;

        if can_null
            && !is_pv_node
            && depth_remaining >= NULL_MOVE_MIN_DEPTH
            && position.count(Color::Black) + position.count(Color::White) >= 5
            && !opponent_already_threatening
        {
            position.make_null_move();
            let mut scratch = PVLine::new();
            let reduced = (depth_remaining - 1 - NULL_MOVE_REDUCTION).max(0);
            let null_score =
                -self.negamax(position, captures, !color, reduced, ply + 1, -beta, -beta + 1, false, &mut scratch);
            position.undo_null_move();

            if null_score >= beta && !null_score.is_positive_mate() {
                self.null_cuts += 1;
                return beta;
            }
        }

        let candidates = candidate_moves(position, ply);
        let ctx = OrderingContext {
            color,
            captures: &*captures,
            tt_move,
            pv_move: if ply == 0 { pv_line.first() } else { None },
            depth: ply as usize,
            killers: &self.killers,
            countermove: reply_to.and_then(|c| self.countermoves.get(color, c)),
            history: &self.history,
        };
        let rated_moves = order_moves(position, candidates, &ctx);

        let mut best_score = Evaluation::min_val();
        let mut best_cell = None;
        let mut bound = Bound::Upper;
        let mut analyzed = 0usize;

        for rated in rated_moves {
            let cell = rated.cell;
            let Ok(captured) = renju_core::game::check_move(position, cell.row(), cell.col(), color) else { continue };
            let is_capture = !captured.is_empty();
            let is_killer = self.killers.is_killer(ply as usize, cell);
            let taken = captured.len() as u32;

            captures.add(color, taken);
            position.make_move(cell, color, captured);

            let mut child_pv = PVLine::new();
            let mut reduction = 0;
            if !is_pv_node
                && analyzed >= LMR_MIN_MOVE
                && depth_remaining >= LMR_MIN_DEPTH
                && !is_capture
                && !is_killer
                && !opponent_already_threatening
            {
                reduction = (1 + (analyzed as i32 - LMR_MIN_MOVE as i32) / 4).min(depth_remaining - 1);
                self.lmr_reductions += 1;
            }

            let score = if reduction > 0 {
                let reduced_score = -self.negamax(
                    position,
                    captures,
                    !color,
                    depth_remaining - 1 - reduction,
                    ply + 1,
                    -(alpha + 1),
                    -alpha,
                    true,
                    &mut child_pv,
                );
                if reduced_score > alpha {
                    self.lmr_researches += 1;
                    -self.negamax(position, captures, !color, depth_remaining - 1, ply + 1, -beta, -alpha, true, &mut child_pv)
                } else {
                    reduced_score
                }
            } else if analyzed == 0 {
                -self.negamax(position, captures, !color, depth_remaining - 1, ply + 1, -beta, -alpha, true, &mut child_pv)
            } else {
                let null_window = -self.negamax(
                    position,
                    captures,
                    !color,
                    depth_remaining - 1,
                    ply + 1,
                    -(alpha + 1),
                    -alpha,
                    true,
                    &mut child_pv,
                );
                if null_window > alpha && null_window < beta {
                    -self.negamax(position, captures, !color, depth_remaining - 1, ply + 1, -beta, -alpha, true, &mut child_pv)
                } else {
                    null_window
                }
            };

            position.undo_move();
            captures.sub(color, taken);
            analyzed += 1;

            if ply == 0 {
                self.root_scores.push((cell, score.raw()));
            }

            if score > best_score {
                best_score = score;
                best_cell = Some(cell);
                pv_line.update_line(cell, &mut child_pv);
            }
            if best_score > alpha {
                alpha = best_score;
                bound = Bound::Exact;
                self.alpha_cutoffs += 1;
            }
            if alpha >= beta {
                bound = Bound::Lower;
                self.beta_cutoffs += 1;
                if !is_capture {
                    self.killers.record(ply as usize, cell);
                    self.history.record(color, cell, depth_remaining);
                    if let Some(opp_last) = reply_to {
                        self.countermoves.record(color, opp_last, cell);
                    }
                }
                break;
            }
            if self.timed_out {
                break;
            }
        }

        if best_cell.is_none() && analyzed == 0 {
            return Evaluation::new(0);
        }

        self.tt.store(zobrist, depth_remaining, best_score.raw(), bound, best_cell);
        best_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use renju_core::{Cell as CoreCell, Position as CorePosition};

    #[test]
    fn finds_the_winning_move_when_one_is_available() {
        let mut pos = CorePosition::new();
        for c in 4..8 {
            pos.make_move(CoreCell::new(9, c).unwrap(), Color::Black, vec![]);
            if c < 7 {
                pos.make_move(CoreCell::new(0, c).unwrap(), Color::White, vec![]);
            }
        }
        let mut captures = Captures::default();
        let mut search = Search::new(SearchOptions { time_limit_ms: 200, max_depth: 6, use_aspiration: false });
        let result = search.find_best(&mut pos, &mut captures, Color::Black);
        assert_eq!(result.best_move, Some(CoreCell::new(9, 8).unwrap()));
    }

    #[test]
    fn does_not_mutate_the_position_after_the_search_returns() {
        let mut pos = CorePosition::new();
        pos.make_move(CoreCell::new(9, 9).unwrap(), Color::Black, vec![]);
        let before = pos.zobrist_key();
        let mut captures = Captures::default();
        let mut search = Search::new(SearchOptions { time_limit_ms: 100, max_depth: 3, use_aspiration: false });
        search.find_best(&mut pos, &mut captures, Color::White);
        assert_eq!(pos.zobrist_key(), before);
    }

    #[test]
    fn single_legal_move_is_returned_without_searching() {
        let mut pos = CorePosition::new();
        let mut captures = Captures::default();
        let mut search = Search::new(SearchOptions { time_limit_ms: 100, max_depth: 3, use_aspiration: false });
        let result = search.find_best(&mut pos, &mut captures, Color::Black);
        assert_eq!(result.best_move, Some(CoreCell::center()));
        assert_eq!(result.nodes, 0);
    }
}
