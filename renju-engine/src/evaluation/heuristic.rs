//! Static position evaluation: pattern-based line scoring, capture
//! balance, and center control, from the mover's perspective.

use renju_core::board::bitboard::Direction;
use renju_core::{Captures, Cell, Color, Position};

pub const ATTACK_WEIGHT: f64 = 1.3;
pub const DEFENSE_WEIGHT: f64 = 1.6;
pub const CENTER_WEIGHT_SCALE: i32 = 2;

pub const WIN_SCORE: i32 = 1_000_000;
pub const LOSE_SCORE: i32 = -1_000_000;

const SCORE_FIVE: i32 = 500_000;
const SCORE_OPEN_FOUR: i32 = 100_000;
const SCORE_CLOSED_FOUR: i32 = 50_000;
const SCORE_OPEN_THREE: i32 = 10_000;
const SCORE_CLOSED_THREE: i32 = 1_000;
const SCORE_OPEN_TWO: i32 = 500;
const SCORE_CLOSED_TWO: i32 = 50;

const CAPTURE_NEAR_WIN_BONUS: i32 = 2_000;
const CAPTURE_NEAR_WIN_DANGER: i32 = 2_500;

const AXES: [Direction; 4] = Direction::ALL;

/// Full static evaluation of `position` from `color`'s perspective.
/// Short-circuits through a cascade of decisive-threat checks (five,
/// open-four, closed-four, open-three, multiple closed-threes) before
/// falling back to the per-stone line-scan score, mirroring the priority
/// a human player gives to forced continuations over balance-of-power.
pub fn evaluate(position: &Position, color: Color, captures: &Captures) -> i32 {
    let opp = !color;

    if captures.of(color) >= renju_core::Captures::WIN_THRESHOLD {
        return WIN_SCORE;
    }
    if captures.of(opp) >= renju_core::Captures::WIN_THRESHOLD {
        return LOSE_SCORE;
    }
    if position.has_five(color) {
        return WIN_SCORE;
    }
    if position.has_five(opp) {
        return LOSE_SCORE;
    }

    if has_open_four(position, opp) {
        return LOSE_SCORE / 2;
    }
    if has_open_four(position, color) {
        return WIN_SCORE / 2;
    }

    if has_closed_four(position, opp) {
        return LOSE_SCORE / 3;
    }
    if has_closed_four(position, color) {
        return WIN_SCORE / 3;
    }

    if count_open_threes(position, opp) >= 1 {
        return LOSE_SCORE / 4;
    }
    if count_open_threes(position, color) >= 1 {
        return WIN_SCORE / 4;
    }

    if count_closed_threes(position, opp) >= 2 {
        return LOSE_SCORE / 6;
    }

    let my_score = fast_evaluate(position, color, opp);
    let opp_score = fast_evaluate(position, opp, color);

    let mut capture_diff = (captures.of(color) as i32 - captures.of(opp) as i32) * 500;
    if captures.of(color) >= 8 {
        capture_diff += CAPTURE_NEAR_WIN_BONUS;
    }
    if captures.of(opp) >= 8 {
        capture_diff -= CAPTURE_NEAR_WIN_DANGER;
    }

    (my_score as f64 * ATTACK_WEIGHT - opp_score as f64 * DEFENSE_WEIGHT) as i32 + capture_diff
}

/// A cheap per-move score for ordering candidates, not a full evaluation:
/// checks whether the move wins outright, blocks an opponent five, scores
/// its captures, and adds a quick one-pass line scan.
pub fn score_move(position: &Position, cell: Cell, color: Color, captures: &Captures, captured: &[(usize, usize)]) -> i32 {
    if AXES.iter().any(|&dir| scan_from(position, cell, dir, color).0 >= 5) {
        return WIN_SCORE;
    }

    let mut score = 0;
    if AXES.iter().any(|&dir| scan_from(position, cell, dir, !color).0 >= 5) {
        score += SCORE_OPEN_FOUR;
    }

    score += captured.len() as i32 * super::patterns::score::CAPTURE_THREAT;
    if captures.of(color) + captured.len() as u32 >= renju_core::Captures::WIN_THRESHOLD {
        return WIN_SCORE;
    }

    score += center_bonus(cell);

    for dir in AXES {
        let (count, open_ends) = scan_from(position, cell, dir, color);
        score += match (count, open_ends) {
            (c, _) if c >= 5 => SCORE_FIVE,
            (4, 2) => SCORE_OPEN_FOUR,
            (4, _) => SCORE_CLOSED_FOUR / 2,
            (3, 2) => SCORE_OPEN_THREE,
            (3, _) => SCORE_CLOSED_THREE,
            (2, 2) => SCORE_OPEN_TWO,
            (2, _) => SCORE_CLOSED_TWO,
            _ => 0,
        };
    }

    score
}

fn center_bonus(cell: Cell) -> i32 {
    let dist = cell.manhattan_distance(&Cell::center());
    (18 - dist).max(0) * CENTER_WEIGHT_SCALE
}

fn fast_evaluate(position: &Position, color: Color, opp: Color) -> i32 {
    let mut score = 0;
    for bit in position.stones(color).iter_ones() {
        let (row, col) = renju_core::board::bitboard::bit_to_pos(bit);
        let cell = Cell::new(row, col).unwrap();
        score += center_bonus(cell);
        for dir in AXES {
            score += evaluate_line_fast(position, cell, dir, color, opp);
        }
    }
    score
}

/// Looks up to 4 cells each way from `cell`, stopping at the first
/// opponent stone or board edge, tracking consecutive own-stones and
/// whether the run can still extend.
fn evaluate_line_fast(position: &Position, cell: Cell, dir: Direction, color: Color, _opp: Color) -> i32 {
    let (dr, dc) = dir.delta();
    let mut consecutive = 1;
    let mut space_after = 0;

    for i in 1..5 {
        match cell.offset(dr * i, dc * i) {
            None => break,
            Some(c) => {
                if position.get(c) == color.into() {
                    consecutive += 1;
                } else if position.is_empty_at(c) {
                    space_after += 1;
                    break;
                } else {
                    break;
                }
            }
        }
    }
    for i in 1..5 {
        match cell.offset(-dr * i, -dc * i) {
            None => break,
            Some(c) => {
                if position.get(c) == color.into() {
                    consecutive += 1;
                } else if position.is_empty_at(c) {
                    space_after += 1;
                    break;
                } else {
                    break;
                }
            }
        }
    }

    match consecutive {
        c if c >= 5 => SCORE_FIVE,
        4 => {
            if space_after >= 1 {
                SCORE_OPEN_FOUR
            } else {
                SCORE_CLOSED_FOUR
            }
        }
        3 => {
            if space_after >= 2 {
                SCORE_OPEN_THREE
            } else {
                SCORE_CLOSED_THREE
            }
        }
        2 => {
            if space_after >= 2 {
                SCORE_OPEN_TWO
            } else {
                SCORE_CLOSED_TWO
            }
        }
        _ => 0,
    }
}

/// Consecutive same-color run through `cell` along `dir` (both
/// directions) and how many of its two ends are open, used by both the
/// decisive-threat checks and `score_move`.
pub(crate) fn scan_from(position: &Position, cell: Cell, dir: Direction, color: Color) -> (i32, i32) {
    let (dr, dc) = dir.delta();
    let mut count = 1;
    let mut open_ends = 0;

    let mut cur = cell;
    while let Some(next) = cur.offset(dr, dc) {
        if position.get(next) == color.into() {
            count += 1;
            cur = next;
        } else {
            if position.is_empty_at(next) {
                open_ends += 1;
            }
            break;
        }
    }
    let mut cur = cell;
    while let Some(next) = cur.offset(-dr, -dc) {
        if position.get(next) == color.into() {
            count += 1;
            cur = next;
        } else {
            if position.is_empty_at(next) {
                open_ends += 1;
            }
            break;
        }
    }
    (count, open_ends)
}

fn for_each_stone(position: &Position, color: Color, mut visit: impl FnMut(Cell) -> bool) -> bool {
    for bit in position.stones(color).iter_ones() {
        let (row, col) = renju_core::board::bitboard::bit_to_pos(bit);
        if visit(Cell::new(row, col).unwrap()) {
            return true;
        }
    }
    false
}

fn has_open_four(position: &Position, color: Color) -> bool {
    for_each_stone(position, color, |cell| AXES.iter().any(|&dir| scan_from(position, cell, dir, color) == (4, 2)))
}

fn has_closed_four(position: &Position, color: Color) -> bool {
    for_each_stone(position, color, |cell| {
        AXES.iter().any(|&dir| {
            let (count, open_ends) = scan_from(position, cell, dir, color);
            count == 4 && open_ends == 1
        })
    })
}

/// Like `scan_from`, but for the open-three case specifically: a three is
/// only a live threat if at least one open end also has room two cells
/// further out that isn't blocked by the opponent, i.e. it can actually
/// grow into an open four. A three capped on both far sides
/// (`O_XXX_O`) isn't counted.
fn open_three_has_room(position: &Position, cell: Cell, dir: Direction, color: Color) -> bool {
    let (dr, dc) = dir.delta();
    let mut count = 1;

    let mut cur = cell;
    let mut pos_open = false;
    let mut pos_room = false;
    while let Some(next) = cur.offset(dr, dc) {
        if position.get(next) == color.into() {
            count += 1;
            cur = next;
        } else {
            if position.is_empty_at(next) {
                pos_open = true;
                pos_room = match next.offset(dr, dc) {
                    None => true,
                    Some(far) => position.get(far) != (!color).into(),
                };
            }
            break;
        }
    }

    let mut cur = cell;
    let mut neg_open = false;
    let mut neg_room = false;
    while let Some(next) = cur.offset(-dr, -dc) {
        if position.get(next) == color.into() {
            count += 1;
            cur = next;
        } else {
            if position.is_empty_at(next) {
                neg_open = true;
                neg_room = match next.offset(-dr, -dc) {
                    None => true,
                    Some(far) => position.get(far) != (!color).into(),
                };
            }
            break;
        }
    }

    count == 3 && pos_open && neg_open && (pos_room || neg_room)
}

fn count_open_threes(position: &Position, color: Color) -> usize {
    let mut seen = std::collections::HashSet::new();
    let mut count = 0;
    for bit in position.stones(color).iter_ones() {
        let (row, col) = renju_core::board::bitboard::bit_to_pos(bit);
        let cell = Cell::new(row, col).unwrap();
        for dir in AXES {
            let (dr, dc) = dir.delta();
            if let Some(prev) = cell.offset(-dr, -dc) {
                if position.get(prev) == color.into() {
                    continue;
                }
            }
            if open_three_has_room(position, cell, dir, color) {
                if seen.insert((row, col, dr, dc)) {
                    count += 1;
                }
            }
        }
    }
    count
}

fn count_closed_threes(position: &Position, color: Color) -> usize {
    count_distinct_runs(position, color, |count, open_ends| count == 3 && open_ends == 1)
}

/// Whether `color` already has a threat on the board urgent enough that
/// passing the move (as null-move pruning does) would be unsound: a
/// standing closed four, any open three, or two or more closed threes.
pub(crate) fn has_live_threat(position: &Position, color: Color) -> bool {
    has_closed_four(position, color) || count_open_threes(position, color) >= 1 || count_closed_threes(position, color) >= 2
}

/// Scans every stone/axis pair, counting a match once per underlying
/// run (keyed by its lowest-indexed cell) rather than once per stone in
/// it, since every stone in a three would otherwise report the same
/// pattern three times over.
fn count_distinct_runs(position: &Position, color: Color, matches: impl Fn(i32, i32) -> bool) -> usize {
    let mut seen = std::collections::HashSet::new();
    let mut count = 0;
    for bit in position.stones(color).iter_ones() {
        let (row, col) = renju_core::board::bitboard::bit_to_pos(bit);
        let cell = Cell::new(row, col).unwrap();
        for dir in AXES {
            let (dr, dc) = dir.delta();
            // Only evaluate from the run's lexicographically-first cell.
            if let Some(prev) = cell.offset(-dr, -dc) {
                if position.get(prev) == color.into() {
                    continue;
                }
            }
            let (run_count, open_ends) = scan_from(position, cell, dir, color);
            if matches(run_count, open_ends) {
                let key = (row, col, dr, dc);
                if seen.insert(key) {
                    count += 1;
                }
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use renju_core::Cell as CoreCell;

    #[test]
    fn open_three_scores_better_than_closed_three() {
        let mut open = Position::new();
        for c in 5..8 {
            open.make_move(CoreCell::new(9, c).unwrap(), Color::Black, vec![]);
        }
        let caps = Captures::default();
        let open_score = evaluate(&open, Color::Black, &caps);
        assert!(open_score >= WIN_SCORE / 4);
    }

    #[test]
    fn five_in_a_row_is_a_win_score() {
        let mut pos = Position::new();
        for c in 4..9 {
            pos.make_move(CoreCell::new(9, c).unwrap(), Color::Black, vec![]);
        }
        let caps = Captures::default();
        assert_eq!(evaluate(&pos, Color::Black, &caps), WIN_SCORE);
        assert_eq!(evaluate(&pos, Color::White, &caps), LOSE_SCORE);
    }

    #[test]
    fn capture_tally_near_threshold_shifts_score() {
        let pos = Position::new();
        let mut caps = Captures::default();
        let baseline = evaluate(&pos, Color::Black, &caps);
        caps.black = 8;
        let boosted = evaluate(&pos, Color::Black, &caps);
        assert!(boosted > baseline);
    }

    #[test]
    fn three_capped_on_both_far_sides_is_not_live() {
        // Same O_XXX_O shape as the rules-level regression: neither end has
        // room to grow into an open four, so it shouldn't count as open or
        // gate null-move pruning as a live threat.
        let mut pos = Position::new();
        pos.make_move(CoreCell::new(9, 5).unwrap(), Color::White, vec![]);
        pos.make_move(CoreCell::new(9, 11).unwrap(), Color::White, vec![]);
        pos.make_move(CoreCell::new(9, 7).unwrap(), Color::Black, vec![]);
        pos.make_move(CoreCell::new(9, 8).unwrap(), Color::Black, vec![]);
        pos.make_move(CoreCell::new(9, 9).unwrap(), Color::Black, vec![]);

        assert_eq!(count_open_threes(&pos, Color::Black), 0);
        assert!(!has_live_threat(&pos, Color::Black));
    }
}
