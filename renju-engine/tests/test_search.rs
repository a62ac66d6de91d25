//! End-to-end search scenarios driven through `Engine`/`Search`'s public
//! API rather than their internals, the way the teacher's own
//! `tests/test_board.rs` exercises `Board` from outside the crate.

use renju_core::{Captures, Cell, Color, Position};
use renju_engine::search::{Search, SearchOptions};
use renju_engine::Engine;

fn options(max_depth: u32, time_limit_ms: u64) -> SearchOptions {
    SearchOptions { time_limit_ms, max_depth, use_aspiration: false }
}

#[test]
fn forced_block_of_an_open_four() {
    // White has four in a row, both ends open; Black to move must play one
    // of the two blocking cells or White wins next turn regardless of reply.
    let mut pos = Position::new();
    let mut caps = Captures::default();
    for c in 5..9 {
        pos.make_move(Cell::new(9, c).unwrap(), Color::White, vec![]);
    }
    pos.make_move(Cell::new(0, 0).unwrap(), Color::Black, vec![]);

    let mut search = Search::new(options(4, 2_000));
    let result = search.find_best(&mut pos, &mut caps, Color::Black);

    let best = result.best_move.expect("a move must be found");
    assert!(best == Cell::new(9, 4).unwrap() || best == Cell::new(9, 9).unwrap());
}

#[test]
fn search_does_not_mutate_position_or_captures() {
    let mut pos = Position::new();
    pos.make_move(Cell::new(9, 9).unwrap(), Color::Black, vec![]);
    pos.make_move(Cell::new(9, 10).unwrap(), Color::White, vec![]);
    let mut caps = Captures::default();
    caps.add(Color::Black, 4);

    let before_key = pos.zobrist_key();
    let before_caps = caps;

    let mut search = Search::new(options(3, 500));
    search.find_best(&mut pos, &mut caps, Color::Black);

    assert_eq!(pos.zobrist_key(), before_key);
    assert_eq!(caps, before_caps);
}

#[test]
fn engine_get_move_returns_a_legal_empty_cell() {
    let mut pos = Position::new();
    pos.make_move(Cell::new(9, 9).unwrap(), Color::Black, vec![]);
    let mut caps = Captures::default();

    let mut engine = Engine::new(1);
    let mv = engine.get_move(&mut pos, &mut caps, Color::White, 0.2).expect("a move");
    assert!(pos.is_empty_at(mv));
}

#[test]
fn engine_debug_info_reports_nonzero_nodes_and_a_usable_pv() {
    let mut pos = Position::new();
    pos.make_move(Cell::new(9, 9).unwrap(), Color::Black, vec![]);
    let mut caps = Captures::default();

    let mut engine = Engine::new(1);
    let (mv, debug) = engine.get_move_with_debug_info(&mut pos, &mut caps, Color::White, 0.2);
    assert!(mv.is_some());
    assert!(debug.nodes_evaluated > 0);
    assert_eq!(debug.pv_line.first().copied(), mv);
}

#[test]
fn ordering_independence_same_depth_same_score() {
    // Same candidate set searched to the same fixed depth must return the
    // same score regardless of which order the moves are generated in;
    // approximate this by searching twice from the same position (the
    // move generator/orderer is deterministic, so this also pins down
    // that nothing incidentally depends on table contents from a warm TT).
    let mut pos = Position::new();
    for (r, c, side) in [(9, 9, Color::Black), (9, 10, Color::White), (8, 8, Color::Black), (10, 11, Color::White)] {
        pos.make_move(Cell::new(r, c).unwrap(), side, vec![]);
    }
    let mut caps = Captures::default();

    let mut search_a = Search::new(options(3, 1_000));
    let mut pos_a = pos.clone();
    let mut caps_a = caps;
    let result_a = search_a.find_best(&mut pos_a, &mut caps_a, Color::Black);

    let mut search_b = Search::new(options(3, 1_000));
    let mut pos_b = pos.clone();
    let result_b = search_b.find_best(&mut pos_b, &mut caps, Color::Black);

    assert_eq!(result_a.score, result_b.score);
}

#[test]
fn capture_counters_stay_consistent_through_a_short_search_driven_game() {
    let mut pos = Position::new();
    let mut caps = Captures::default();
    pos.make_move(Cell::new(5, 5).unwrap(), Color::White, vec![]);
    pos.make_move(Cell::new(5, 6).unwrap(), Color::Black, vec![]);
    pos.make_move(Cell::new(9, 9).unwrap(), Color::Black, vec![]);
    pos.make_move(Cell::new(5, 7).unwrap(), Color::Black, vec![]);

    let captured = renju_core::game::check_move(&pos, 5, 8, Color::White).unwrap();
    assert_eq!(captured.len(), 2);
    caps.add(Color::White, captured.len() as u32);
    pos.make_move(Cell::new(5, 8).unwrap(), Color::White, captured);

    assert_eq!(caps.of(Color::White), 2);
}
