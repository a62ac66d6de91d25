use wasm_bindgen::prelude::*;

use renju_core::{Cell, Color, GameInfo};
use renju_engine::EngineDebugInfo;

fn color_str(color: Color) -> &'static str {
    match color {
        Color::Black => "black",
        Color::White => "white",
    }
}

/// JS-facing projection of `GameInfo`. Enums become lowercase strings and the
/// optional last move is split into two optional fields since wasm-bindgen
/// structs can't expose a field typed as a tuple.
#[wasm_bindgen(getter_with_clone)]
pub struct TurnInfo {
    pub turn: String,
    pub move_count: u32,
    pub captures_black: u32,
    pub captures_white: u32,
    pub phase: String,
    pub phase_message: String,
    pub in_choice_phase: bool,
    pub is_game_over: bool,
    pub winner: Option<String>,
    pub last_move_row: Option<i32>,
    pub last_move_col: Option<i32>,
}

impl TurnInfo {
    pub(crate) fn from_info(info: &GameInfo) -> Self {
        Self {
            turn: color_str(info.turn).to_string(),
            move_count: info.move_count as u32,
            captures_black: info.captures_black,
            captures_white: info.captures_white,
            phase: format!("{:?}", info.phase),
            phase_message: info.phase_message.clone(),
            in_choice_phase: info.in_choice_phase,
            is_game_over: info.is_game_over,
            winner: info.winner.map(color_str).map(str::to_string),
            last_move_row: info.last_move.map(|(r, _)| r as i32),
            last_move_col: info.last_move.map(|(_, c)| c as i32),
        }
    }
}

/// JS-facing projection of a search result: the chosen cell (absent when the
/// board has no legal move left) plus the headline evaluation score.
#[wasm_bindgen(getter_with_clone)]
pub struct SearchResult {
    pub row: Option<i32>,
    pub col: Option<i32>,
    pub score: i32,
}

impl SearchResult {
    pub(crate) fn new(cell: Option<Cell>, score: i32) -> Self {
        Self { row: cell.map(|c| c.row() as i32), col: cell.map(|c| c.col() as i32), score }
    }
}

/// JS-facing projection of `EngineDebugInfo`, flattened to scalar fields and a
/// flat `[row0, col0, row1, col1, ...]` principal-variation array.
#[wasm_bindgen(getter_with_clone)]
pub struct SearchDebugInfo {
    pub thinking_time_ms: u32,
    pub search_depth: u32,
    pub nodes_evaluated: u32,
    pub nodes_per_second: f64,
    pub row: Option<i32>,
    pub col: Option<i32>,
    pub best_score: i32,
    pub pv_line: Vec<u32>,
    pub tt_hit_rate: f64,
    pub tt_fill_rate: f64,
}

impl SearchDebugInfo {
    pub(crate) fn from_debug(best_move: Option<Cell>, debug: &EngineDebugInfo) -> Self {
        let pv_line = debug.pv_line.iter().flat_map(|c| [c.row() as u32, c.col() as u32]).collect();
        Self {
            thinking_time_ms: debug.thinking_time_ms as u32,
            search_depth: debug.search_depth,
            nodes_evaluated: debug.nodes_evaluated as u32,
            nodes_per_second: debug.nodes_per_second,
            row: best_move.map(|c| c.row() as i32),
            col: best_move.map(|c| c.col() as i32),
            best_score: debug.best_score,
            pv_line,
            tt_hit_rate: debug.tt_hit_rate,
            tt_fill_rate: debug.tt_fill_rate,
        }
    }
}
