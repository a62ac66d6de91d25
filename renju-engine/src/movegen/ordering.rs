//! Move ordering: each candidate cell is rated by a descending cascade of
//! tactical and heuristic tiers, then sorted so the search tries the
//! most promising replies first. Big gaps between tiers mean a lower
//! tier's contribution can never outweigh a higher one.

use renju_core::board::bitboard::Direction;
use renju_core::{Captures, Cell, Color, Position};

use super::history::{HistoryTable, KillerTable};
use crate::evaluation::scan_from;

pub type MoveScore = i64;

const WINNING_PLACEMENT: MoveScore = MoveScore::MAX;
const BLOCKS_OPPONENT_FIVE: MoveScore = WINNING_PLACEMENT - 1_000_000;
const BLOCKS_OPPONENT_OPEN_FOUR: MoveScore = BLOCKS_OPPONENT_FIVE - 1_000_000;
const BLOCKS_OPPONENT_CLOSED_FOUR: MoveScore = BLOCKS_OPPONENT_OPEN_FOUR - 1_000_000;
const OWN_OPEN_FOUR: MoveScore = BLOCKS_OPPONENT_CLOSED_FOUR - 1_000_000;
const BLOCKS_OPPONENT_OPEN_THREE: MoveScore = OWN_OPEN_FOUR - 1_000_000;
const WINNING_CAPTURE: MoveScore = BLOCKS_OPPONENT_OPEN_THREE - 1_000_000;
const TT_MOVE: MoveScore = WINNING_CAPTURE - 1_000_000;
const PV_MOVE: MoveScore = TT_MOVE - 1;
const KILLER_BASE: MoveScore = PV_MOVE - 1_000;
const COUNTERMOVE: MoveScore = KILLER_BASE - 1_000;

const AXES: [Direction; 4] = Direction::ALL;

/// True for a score in one of the tactically-forced tiers (win, block a
/// five, block or create a four, block an open three, or a
/// threshold-reaching capture) — used by the search driver's forced-move
/// prelude to short-circuit the full search when one candidate is simply
/// not optional.
pub fn is_forced_tier(score: MoveScore) -> bool {
    score >= WINNING_CAPTURE
}

pub struct RatedMove {
    pub cell: Cell,
    pub score: MoveScore,
}

/// Everything `rate_move` needs beyond the position itself, bundled so the
/// call sites in `searching.rs` don't have to pass a dozen loose arguments.
pub struct OrderingContext<'a> {
    pub color: Color,
    pub captures: &'a Captures,
    pub tt_move: Option<Cell>,
    pub pv_move: Option<Cell>,
    pub depth: usize,
    pub killers: &'a KillerTable,
    pub countermove: Option<Cell>,
    pub history: &'a HistoryTable,
}

pub fn order_moves(position: &Position, candidates: Vec<Cell>, ctx: &OrderingContext) -> Vec<RatedMove> {
    let mut rated: Vec<RatedMove> = candidates.into_iter().map(|cell| rate_move(position, cell, ctx)).collect();
    rated.sort_unstable_by(|a, b| b.score.cmp(&a.score));
    rated
}

fn rate_move(position: &Position, cell: Cell, ctx: &OrderingContext) -> RatedMove {
    let color = ctx.color;
    let opp = !color;

    let score = if creates_five(position, cell, color) {
        WINNING_PLACEMENT
    } else if creates_five(position, cell, opp) {
        BLOCKS_OPPONENT_FIVE
    } else if creates_open_four(position, cell, opp) {
        BLOCKS_OPPONENT_OPEN_FOUR
    } else if creates_closed_four(position, cell, opp) {
        BLOCKS_OPPONENT_CLOSED_FOUR
    } else if creates_open_four(position, cell, color) {
        OWN_OPEN_FOUR
    } else if creates_open_three(position, cell, opp) {
        BLOCKS_OPPONENT_OPEN_THREE
    } else if reaches_capture_win(position, cell, color, ctx.captures) {
        WINNING_CAPTURE
    } else if ctx.tt_move == Some(cell) {
        TT_MOVE
    } else if ctx.pv_move == Some(cell) {
        PV_MOVE
    } else if ctx.killers.is_killer(ctx.depth, cell) {
        KILLER_BASE + killer_rank_bonus(ctx.killers, ctx.depth, cell)
    } else if ctx.countermove == Some(cell) {
        COUNTERMOVE
    } else {
        ctx.history.get(color, cell) as MoveScore + static_residual(cell)
    };

    RatedMove { cell, score }
}

/// Killers are stored newest-first; the first slot gets a small bonus over
/// later slots so repeated fresh cutoffs still sort ahead of stale ones.
fn killer_rank_bonus(killers: &KillerTable, depth: usize, cell: Cell) -> MoveScore {
    killers.at(depth).iter().position(|&c| c == cell).map(|rank| (2 - rank as MoveScore).max(0)).unwrap_or(0)
}

fn static_residual(cell: Cell) -> MoveScore {
    let dist = cell.manhattan_distance(&Cell::center());
    (18 - dist).max(0) as MoveScore
}

fn reaches_capture_win(position: &Position, cell: Cell, color: Color, captures: &Captures) -> bool {
    let taken = renju_core::game::captures_for(position, cell, color).len() as u32;
    captures.of(color) + taken >= Captures::WIN_THRESHOLD
}

fn creates_five(position: &Position, cell: Cell, color: Color) -> bool {
    AXES.iter().any(|&dir| scan_from(position, cell, dir, color).0 >= 5)
}

fn creates_open_four(position: &Position, cell: Cell, color: Color) -> bool {
    AXES.iter().any(|&dir| scan_from(position, cell, dir, color) == (4, 2))
}

fn creates_closed_four(position: &Position, cell: Cell, color: Color) -> bool {
    AXES.iter().any(|&dir| {
        let (count, open_ends) = scan_from(position, cell, dir, color);
        count == 4 && open_ends == 1
    })
}

fn creates_open_three(position: &Position, cell: Cell, color: Color) -> bool {
    AXES.iter().any(|&dir| scan_from(position, cell, dir, color) == (3, 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_ctx<'a>(killers: &'a KillerTable, history: &'a HistoryTable, captures: &'a Captures, color: Color) -> OrderingContext<'a> {
        OrderingContext {
            color,
            captures,
            tt_move: None,
            pv_move: None,
            depth: 0,
            killers,
            countermove: None,
            history,
        }
    }

    #[test]
    fn winning_placement_outranks_everything_else() {
        let mut pos = Position::new();
        for c in 4..8 {
            pos.make_move(Cell::new(9, c).unwrap(), Color::Black, vec![]);
        }
        let captures = Captures::default();
        let killers = KillerTable::new(4);
        let history = HistoryTable::new();
        let ctx = empty_ctx(&killers, &history, &captures, Color::Black);

        let win_cell = Cell::new(9, 8).unwrap();
        let other_cell = Cell::new(0, 0).unwrap();
        let rated = order_moves(&pos, vec![other_cell, win_cell], &ctx);
        assert_eq!(rated[0].cell, win_cell);
    }

    #[test]
    fn blocking_opponent_five_outranks_an_ordinary_move() {
        let mut pos = Position::new();
        for c in 4..8 {
            pos.make_move(Cell::new(9, c).unwrap(), Color::White, vec![]);
        }
        let captures = Captures::default();
        let killers = KillerTable::new(4);
        let history = HistoryTable::new();
        let ctx = empty_ctx(&killers, &history, &captures, Color::Black);

        let block_cell = Cell::new(9, 8).unwrap();
        let other_cell = Cell::new(0, 0).unwrap();
        let rated = order_moves(&pos, vec![other_cell, block_cell], &ctx);
        assert_eq!(rated[0].cell, block_cell);
    }

    #[test]
    fn tt_move_outranks_plain_history_score() {
        let pos = Position::new();
        let captures = Captures::default();
        let killers = KillerTable::new(4);
        let mut history = HistoryTable::new();
        let hot_cell = Cell::new(10, 10).unwrap();
        history.record(Color::Black, hot_cell, 10);

        let tt_cell = Cell::new(3, 3).unwrap();
        let ctx = OrderingContext {
            color: Color::Black,
            captures: &captures,
            tt_move: Some(tt_cell),
            pv_move: None,
            depth: 0,
            killers: &killers,
            countermove: None,
            history: &history,
        };
        let rated = order_moves(&pos, vec![hot_cell, tt_cell], &ctx);
        assert_eq!(rated[0].cell, tt_cell);
    }
}
