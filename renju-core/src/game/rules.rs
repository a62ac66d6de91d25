//! Capture, double-three, five/overline and winner-adjudication rules.
//!
//! Every check here is pure with respect to `Position`: none of these
//! functions mutate the board. Captures and double-three detection both
//! reason about a stone that *would* be placed, by substituting the
//! hypothetical color in on a read of the existing board rather than
//! mutating and undoing it.

use std::collections::HashSet;
use std::fmt;

use crate::board::bitboard::Direction;
use crate::board::{Position, Stone};
use crate::game_elements::{Cell, Color};

/// Why a candidate move was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    OutOfBounds,
    Occupied,
    DoubleThreeForbidden,
    OpeningRuleViolated,
    GameOver,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::OutOfBounds => write!(f, "cell is outside the board"),
            MoveError::Occupied => write!(f, "cell is already occupied"),
            MoveError::DoubleThreeForbidden => write!(f, "move creates two simultaneous open threes"),
            MoveError::OpeningRuleViolated => write!(f, "move is not legal under the active opening rule"),
            MoveError::GameOver => write!(f, "the game has already finished"),
        }
    }
}

impl std::error::Error for MoveError {}

/// Running per-side capture counts. Ten captured stones is a win.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Captures {
    pub black: u32,
    pub white: u32,
}

impl Captures {
    pub const WIN_THRESHOLD: u32 = 10;

    pub fn of(&self, color: Color) -> u32 {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
        }
    }

    pub fn add(&mut self, color: Color, n: u32) {
        match color {
            Color::Black => self.black += n,
            Color::White => self.white += n,
        }
    }

    pub fn sub(&mut self, color: Color, n: u32) {
        match color {
            Color::Black => self.black -= n,
            Color::White => self.white -= n,
        }
    }
}

const DIRS8: [(i32, i32); 8] = [(0, 1), (0, -1), (1, 0), (-1, 0), (1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Cells a placement at `cell` by `side` would custody-capture: a pair of
/// the opponent's stones flanked immediately by the mover's own stone on
/// both sides, `side _ opp opp side`.
pub fn captures_for(position: &Position, cell: Cell, side: Color) -> Vec<(usize, usize)> {
    let opp_stone = Stone::from(!side);
    let own_stone = Stone::from(side);
    let mut captured = Vec::new();
    for (dr, dc) in DIRS8 {
        let (c1, c2, c3) = (cell.offset(dr, dc), cell.offset(2 * dr, 2 * dc), cell.offset(3 * dr, 3 * dc));
        if let (Some(c1), Some(c2), Some(c3)) = (c1, c2, c3) {
            if position.get(c1) == opp_stone && position.get(c2) == opp_stone && position.get(c3) == own_stone {
                captured.push((c1.row(), c1.col()));
                captured.push((c2.row(), c2.col()));
            }
        }
    }
    captured
}

/// Reads an 11-wide window of `side`'s view of the board centered on
/// `cell`, along `dir`'s full axis (both directions), with `cell` itself
/// read as if `side` had already played there. `#` marks off-board cells,
/// `_` empty, `X` the mover's stones, `O` the opponent's.
fn axis_window(position: &Position, cell: Cell, dir: Direction, side: Color, radius: i32) -> Vec<char> {
    let (dr, dc) = dir.delta();
    let own_stone = Stone::from(side);
    (-radius..=radius)
        .map(|i| match cell.offset(dr * i, dc * i) {
            None => '#',
            Some(c) if c == cell => 'X',
            Some(c) => match position.get(c) {
                Stone::Empty => '_',
                s if s == own_stone => 'X',
                _ => 'O',
            },
        })
        .collect()
}

const OPEN_THREE_PATTERNS: [&str; 3] = ["_XXX_", "_XX_X_", "_X_XX_"];

/// True iff `window` contains one of the canonical open-three shapes, and
/// the matched window covers the center cell (the one that was just
/// hypothetically placed) — otherwise it's a pre-existing three the new
/// stone had no part in. For the consecutive `_XXX_` shape, also requires
/// room on at least one far side to actually extend to an open four; a
/// three capped by an opponent stone two cells beyond either open end
/// (`O_XXX_O`) isn't a real threat and doesn't count.
fn window_has_open_three(window: &[char]) -> bool {
    let s: String = window.iter().collect();
    let center = window.len() / 2;
    for pat in OPEN_THREE_PATTERNS {
        let plen = pat.len();
        if plen > window.len() {
            continue;
        }
        for start in 0..=(window.len() - plen) {
            if start <= center && center < start + plen && &s[start..start + plen] == pat {
                if plen == 5 {
                    let far_left = start >= 1 && window[start - 1] != 'O';
                    let far_right = start + plen < window.len() && window[start + plen] != 'O';
                    if !far_left && !far_right {
                        continue;
                    }
                }
                return true;
            }
        }
    }
    false
}

/// How many of the four axes through `cell` would become an open three if
/// `side` played there.
pub fn count_open_threes(position: &Position, cell: Cell, side: Color) -> usize {
    Direction::ALL
        .iter()
        .filter(|&&dir| window_has_open_three(&axis_window(position, cell, dir, side, 5)))
        .count()
}

/// The double-three prohibition: a move that forms two or more open threes
/// at once is forbidden, unless it also captures (a capturing move is
/// always allowed to break the restriction, since it removes stones from
/// the board rather than merely threatening).
pub fn creates_forbidden_double_three(position: &Position, cell: Cell, side: Color, captured: &[(usize, usize)]) -> bool {
    if !captured.is_empty() {
        return false;
    }
    count_open_threes(position, cell, side) >= 2
}

/// Full legality check for placing `side` at `(row, col)`: bounds, vacancy,
/// and the double-three prohibition. Opening-phase restrictions (Pro rule
/// center exclusion, Swap2 move budget, etc.) are layered on top by the
/// game-state machine and are not checked here.
pub fn check_move(position: &Position, row: usize, col: usize, side: Color) -> Result<Vec<(usize, usize)>, MoveError> {
    let cell = Cell::new(row, col).ok_or(MoveError::OutOfBounds)?;
    if !position.is_empty_at(cell) {
        return Err(MoveError::Occupied);
    }
    let captured = captures_for(position, cell, side);
    if creates_forbidden_double_three(position, cell, side, &captured) {
        return Err(MoveError::DoubleThreeForbidden);
    }
    Ok(captured)
}

/// All empty cells within Chebyshev `radius` of an existing stone for
/// which `check_move` succeeds.
pub fn legal_moves(position: &Position, side: Color, radius: i32) -> Vec<Cell> {
    use rayon::prelude::*;
    position
        .neighbors_of_occupied(radius)
        .into_par_iter()
        .filter(|&cell| check_move(position, cell.row(), cell.col(), side).is_ok())
        .collect()
}

/// Every cell that participates in a run of five or more of `color`,
/// across all four axes (a cell on two runs at once appears once).
fn run_cells_for(position: &Position, color: Color) -> HashSet<(usize, usize)> {
    let stone = Stone::from(color);
    let mut result = HashSet::new();
    for bit in position.stones(color).iter_ones() {
        let (row, col) = crate::board::bitboard::bit_to_pos(bit);
        let cell = Cell::new(row, col).unwrap();
        for dir in Direction::ALL {
            let (dr, dc) = dir.delta();
            if let Some(prev) = cell.offset(-dr, -dc) {
                if position.get(prev) == stone {
                    continue; // not the start of this run
                }
            }
            let mut run = vec![cell];
            let mut cur = cell;
            while let Some(next) = cur.offset(dr, dc) {
                if position.get(next) != stone {
                    break;
                }
                run.push(next);
                cur = next;
            }
            if run.len() >= 5 {
                result.extend(run.into_iter().map(|c| (c.row(), c.col())));
            }
        }
    }
    result
}

/// Whether the opponent has an immediate custody-capture that removes a
/// stone belonging to `side`'s five-in-a-row, which under the breakable-five
/// rule denies the win for now.
pub fn can_break_five(position: &Position, side: Color) -> bool {
    let opp = !side;
    let run = run_cells_for(position, side);
    let mut candidates = HashSet::new();
    for &(r, c) in &run {
        let cell = Cell::new(r, c).unwrap();
        for dir in Direction::ALL {
            let (dr, dc) = dir.delta();
            for sign in [1, -1] {
                for dist in 1..=3 {
                    if let Some(cand) = cell.offset(dr * sign * dist, dc * sign * dist) {
                        if position.is_empty_at(cand) {
                            candidates.insert((cand.row(), cand.col()));
                        }
                    }
                }
            }
        }
    }
    candidates.into_iter().any(|(r, c)| {
        let cand = Cell::new(r, c).unwrap();
        captures_for(position, cand, opp).iter().any(|rc| run.contains(rc))
    })
}

/// True iff `opp` has some legal reply that would push their capture count
/// past the win threshold in one move, used to decide whether a five by
/// `side` actually stands when `opp` is one capturing move from ten.
fn opponent_can_reach_ten(position: &Position, opp: Color, captures: &Captures) -> bool {
    if captures.of(opp) + 2 < Captures::WIN_THRESHOLD {
        return false;
    }
    position
        .neighbors_of_occupied(2)
        .into_iter()
        .any(|cell| position.is_empty_at(cell) && !captures_for(position, cell, opp).is_empty())
}

/// Adjudicates the game after `side` has just moved, given the running
/// capture tally. Mirrors the precedence order: capture-threshold wins
/// first, then any standing five, with the breakable-five exception and
/// the last-minute capture-to-ten escape both checked before a five is
/// allowed to stand.
pub fn check_winner(position: &Position, side: Color, captures: &Captures) -> Option<Color> {
    if captures.of(side) >= Captures::WIN_THRESHOLD {
        return Some(side);
    }
    let opp = !side;
    if captures.of(opp) >= Captures::WIN_THRESHOLD {
        return Some(opp);
    }
    if position.has_five(opp) {
        return Some(opp);
    }
    if position.has_five(side) {
        if can_break_five(position, side) {
            return None;
        }
        if opponent_can_reach_ten(position, opp, captures) {
            return Some(opp);
        }
        return Some(side);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(position: &mut Position, captures: &mut Captures, row: usize, col: usize, side: Color) {
        let captured = check_move(position, row, col, side).expect("legal move");
        captures.add(side, captured.len() as u32);
        position.make_move(Cell::new(row, col).unwrap(), side, captured);
    }

    #[test]
    fn horizontal_capture_is_detected_and_applied() {
        let mut pos = Position::new();
        let mut caps = Captures::default();
        play(&mut pos, &mut caps, 5, 5, Color::Black); // anchor
        play(&mut pos, &mut caps, 5, 6, Color::White);
        play(&mut pos, &mut caps, 9, 9, Color::White); // filler, keeps turn order irrelevant here
        play(&mut pos, &mut caps, 5, 7, Color::White);
        play(&mut pos, &mut caps, 5, 8, Color::Black);
        assert_eq!(pos.get(Cell::new(5, 6).unwrap()), Stone::Empty);
        assert_eq!(pos.get(Cell::new(5, 7).unwrap()), Stone::Empty);
        assert_eq!(caps.of(Color::Black), 2);
    }

    #[test]
    fn diagonal_capture_is_detected() {
        let mut pos = Position::new();
        pos.make_move(Cell::new(3, 3).unwrap(), Color::Black, vec![]);
        pos.make_move(Cell::new(4, 4).unwrap(), Color::White, vec![]);
        pos.make_move(Cell::new(5, 5).unwrap(), Color::White, vec![]);
        let captured = captures_for(&pos, Cell::new(6, 6).unwrap(), Color::Black);
        assert_eq!(captured.len(), 2);
        assert!(captured.contains(&(4, 4)));
        assert!(captured.contains(&(5, 5)));
    }

    #[test]
    fn five_in_a_row_wins_when_unbreakable() {
        let mut pos = Position::new();
        for c in 4..9 {
            pos.make_move(Cell::new(9, c).unwrap(), Color::Black, vec![]);
            if c < 8 {
                pos.make_move(Cell::new(0, c).unwrap(), Color::White, vec![]);
            }
        }
        let caps = Captures::default();
        assert_eq!(check_winner(&pos, Color::Black, &caps), Some(Color::Black));
    }

    #[test]
    fn breakable_five_denies_the_win() {
        // Black's five sits at row 9, cols 4..=8. An extra Black stone at
        // (10, 6) plus a pre-placed White anchor at (11, 6) means White
        // playing (8, 6) captures the (9, 6)-(10, 6) pair, removing a
        // five-run stone.
        let mut pos = Position::new();
        for c in 4..9 {
            pos.make_move(Cell::new(9, c).unwrap(), Color::Black, vec![]);
        }
        pos.make_move(Cell::new(10, 6).unwrap(), Color::Black, vec![]);
        pos.make_move(Cell::new(11, 6).unwrap(), Color::White, vec![]);
        assert!(position_has_five_black(&pos));
        assert!(can_break_five(&pos, Color::Black));

        let caps = Captures::default();
        assert_eq!(check_winner(&pos, Color::Black, &caps), None);
    }

    #[test]
    fn unassailable_five_cannot_be_broken() {
        let mut pos = Position::new();
        for c in 4..9 {
            pos.make_move(Cell::new(9, c).unwrap(), Color::Black, vec![]);
            pos.make_move(Cell::new(0, c).unwrap(), Color::White, vec![]);
        }
        assert!(!can_break_five(&pos, Color::Black));
        let caps = Captures::default();
        assert_eq!(check_winner(&pos, Color::Black, &caps), Some(Color::Black));
    }

    fn position_has_five_black(position: &Position) -> bool {
        position.has_five(Color::Black)
    }

    #[test]
    fn capturing_move_is_exempt_from_double_three_prohibition() {
        let mut pos = Position::new();
        pos.make_move(Cell::new(9, 8).unwrap(), Color::Black, vec![]);
        pos.make_move(Cell::new(9, 10).unwrap(), Color::Black, vec![]);
        pos.make_move(Cell::new(8, 9).unwrap(), Color::Black, vec![]);
        pos.make_move(Cell::new(10, 9).unwrap(), Color::Black, vec![]);
        assert!(count_open_threes(&pos, Cell::new(9, 9).unwrap(), Color::Black) >= 2);
        let fake_capture = vec![(0, 0)];
        assert!(!creates_forbidden_double_three(&pos, Cell::new(9, 9).unwrap(), Color::Black, &fake_capture));
    }

    #[test]
    fn double_three_without_capture_is_forbidden() {
        let mut pos = Position::new();
        // Build an open-three that, when crossed by a second one through the
        // placement cell, forms a double three.
        pos.make_move(Cell::new(9, 8).unwrap(), Color::Black, vec![]);
        pos.make_move(Cell::new(0, 0).unwrap(), Color::White, vec![]);
        pos.make_move(Cell::new(9, 10).unwrap(), Color::Black, vec![]);
        pos.make_move(Cell::new(0, 1).unwrap(), Color::White, vec![]);
        pos.make_move(Cell::new(8, 9).unwrap(), Color::Black, vec![]);
        pos.make_move(Cell::new(0, 2).unwrap(), Color::White, vec![]);
        pos.make_move(Cell::new(10, 9).unwrap(), Color::Black, vec![]);
        // Placing at (9,9) completes both the horizontal (9,8)-(9,9)-(9,10)
        // and the diagonal (8,9)/(9,9)/(10,9)... this is actually vertical,
        // use it as the second axis (vertical, not diagonal) which is still
        // a distinct axis from horizontal.
        let err = check_move(&pos, 9, 9, Color::Black);
        assert_eq!(err, Err(MoveError::DoubleThreeForbidden));
    }

    #[test]
    fn three_capped_on_both_far_sides_is_not_an_open_three() {
        // Row 9: White at col 5 and col 11, Black filling 7,8,9 with empties
        // at 6 and 10. `_XXX_` matches the substring, but neither far cell
        // (5 or 11) is open, so this can never grow into an open four.
        let mut pos = Position::new();
        pos.make_move(Cell::new(9, 5).unwrap(), Color::White, vec![]);
        pos.make_move(Cell::new(9, 11).unwrap(), Color::White, vec![]);
        pos.make_move(Cell::new(9, 7).unwrap(), Color::Black, vec![]);
        pos.make_move(Cell::new(9, 9).unwrap(), Color::Black, vec![]);

        assert_eq!(count_open_threes(&pos, Cell::new(9, 8).unwrap(), Color::Black), 0);
    }
}
