//! Candidate-move generation: a depth-shrinking neighborhood around the
//! occupied stones, widened by any five-in-line window that is one or two
//! stones away from completing for a single color. The neighborhood alone
//! can lose a tactical reply that lies outside the current radius; the
//! window scan guarantees it never does.

use renju_core::board::bitboard::Direction;
use renju_core::{Cell, Color, Position, Stone};

/// Radius (Chebyshev distance from any stone) used to seed candidates at a
/// given distance from the root. Shrinks as the search goes deeper, since
/// a wide net close to the root matters far more than one many plies down.
pub fn radius_for_ply(ply: u32) -> i32 {
    if ply <= 2 {
        2
    } else {
        1
    }
}

/// The full candidate set for one node: the radius-expanded neighborhood
/// plus any empty cell a critical five-window forces in regardless of
/// radius. Order is neighborhood first, then forced cells not already
/// present; callers that want a stable order should sort/score afterward.
pub fn candidate_moves(position: &Position, ply: u32) -> Vec<Cell> {
    let mut moves = position.neighbors_of_occupied(radius_for_ply(ply));
    let forced = critical_window_cells(position);
    for cell in forced {
        if !moves.contains(&cell) {
            moves.push(cell);
        }
    }
    moves
}

/// Scans every five-in-line window on the board. A window with exactly
/// four stones of one color and one empty, or three stones of one color
/// and two empties with no opposing stone, forces its empty cell(s) into
/// the result.
fn critical_window_cells(position: &Position) -> Vec<Cell> {
    let mut forced = Vec::new();
    for dir in Direction::ALL {
        let (dr, dc) = dir.delta();
        for row in 0..renju_core::BOARD_SIZE {
            for col in 0..renju_core::BOARD_SIZE {
                let Some(start) = Cell::new(row, col) else { continue };
                let Some(window) = window_cells(start, dr, dc) else { continue };

                let mut black = 0;
                let mut white = 0;
                let mut empties = Vec::new();
                for cell in window {
                    match position.get(cell) {
                        Stone::Black => black += 1,
                        Stone::White => white += 1,
                        Stone::Empty => empties.push(cell),
                    }
                }

                let forces = (black == 4 && white == 0 && empties.len() == 1)
                    || (white == 4 && black == 0 && empties.len() == 1)
                    || (black == 3 && white == 0 && empties.len() == 2)
                    || (white == 3 && black == 0 && empties.len() == 2);

                if forces {
                    forced.extend(empties);
                }
            }
        }
    }
    forced
}

/// The five on-board cells starting at `start` and stepping by `(dr, dc)`,
/// or `None` if any of them falls off the board.
fn window_cells(start: Cell, dr: i32, dc: i32) -> Option<[Cell; 5]> {
    let mut cells = [start; 5];
    cells[0] = start;
    for i in 1..5 {
        cells[i] = cells[i - 1].offset(dr, dc)?;
    }
    Some(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_board_yields_center() {
        let pos = Position::new();
        let moves = candidate_moves(&pos, 0);
        assert_eq!(moves, vec![Cell::center()]);
    }

    #[test]
    fn four_in_a_row_forces_the_extension_cell_even_outside_radius() {
        let mut pos = Position::new();
        for c in 0..4 {
            pos.make_move(Cell::new(0, c).unwrap(), Color::Black, vec![]);
            if c < 3 {
                pos.make_move(Cell::new(18, c).unwrap(), Color::White, vec![]);
            }
        }
        // Black has a closed four at row 0, cols 0..4; the forcing empty is (0, 4).
        let forced = critical_window_cells(&pos);
        assert!(forced.contains(&Cell::new(0, 4).unwrap()));
    }

    #[test]
    fn open_three_forces_both_extension_cells() {
        let mut pos = Position::new();
        for c in 8..11 {
            pos.make_move(Cell::new(9, c).unwrap(), Color::Black, vec![]);
            if c < 10 {
                pos.make_move(Cell::new(0, c).unwrap(), Color::White, vec![]);
            }
        }
        let forced = critical_window_cells(&pos);
        assert!(forced.contains(&Cell::new(9, 7).unwrap()));
        assert!(forced.contains(&Cell::new(9, 11).unwrap()));
    }

    #[test]
    fn radius_shrinks_away_from_the_root() {
        assert_eq!(radius_for_ply(0), 2);
        assert_eq!(radius_for_ply(2), 2);
        assert_eq!(radius_for_ply(3), 1);
        assert_eq!(radius_for_ply(10), 1);
    }
}
