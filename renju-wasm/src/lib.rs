mod data_structures;

use wasm_bindgen::prelude::*;

use renju_core::{Cell, Color, GameMode, GameState, StartingRule};
use renju_engine::Engine;

pub use data_structures::{SearchDebugInfo, SearchResult, TurnInfo};

fn parse_color(s: &str) -> Result<Color, JsValue> {
    match s {
        "black" => Ok(Color::Black),
        "white" => Ok(Color::White),
        other => Err(JsValue::from_str(&format!("unknown color '{other}'"))),
    }
}

fn parse_mode(s: &str) -> Result<GameMode, JsValue> {
    match s {
        "pvp" => Ok(GameMode::Pvp),
        "pve" => Ok(GameMode::Pve),
        "eve" => Ok(GameMode::Eve),
        other => Err(JsValue::from_str(&format!("unknown game mode '{other}'"))),
    }
}

fn parse_starting_rule(s: &str) -> Result<StartingRule, JsValue> {
    match s {
        "standard" => Ok(StartingRule::Standard),
        "pro" => Ok(StartingRule::Pro),
        "swap" => Ok(StartingRule::Swap),
        "swap2" => Ok(StartingRule::Swap2),
        other => Err(JsValue::from_str(&format!("unknown starting rule '{other}'"))),
    }
}

/// A single game plus the persistent search engine backing its move
/// suggestions, bound together behind one handle for JS. Unlike a short
/// position encoding such as FEN, `GameState`'s opening-rule phase machine
/// and capture counters have no compact textual form to round-trip through
/// on every call, so the wasm boundary keeps a live instance instead of
/// reconstructing one per call.
#[wasm_bindgen]
pub struct Game {
    state: GameState,
    engine: Engine,
}

#[wasm_bindgen]
impl Game {
    #[wasm_bindgen(constructor)]
    pub fn new(mode: &str, starting_rule: &str, tt_size_mb: usize) -> Result<Game, JsValue> {
        let mode = parse_mode(mode)?;
        let starting_rule = parse_starting_rule(starting_rule)?;
        Ok(Self { state: GameState::new(mode, starting_rule), engine: Engine::new(tt_size_mb) })
    }

    pub fn reset(&mut self, mode: &str, starting_rule: &str) -> Result<(), JsValue> {
        let mode = parse_mode(mode)?;
        let starting_rule = parse_starting_rule(starting_rule)?;
        self.state = GameState::new(mode, starting_rule);
        Ok(())
    }

    pub fn make_move(&mut self, row: usize, col: usize, thinking_time_ms: u32) -> bool {
        self.state.make_move(row, col, thinking_time_ms as u64).is_ok()
    }

    pub fn undo_move(&mut self) -> bool {
        self.state.undo_move()
    }

    pub fn choose_color(&mut self, color: &str) -> Result<bool, JsValue> {
        let color = parse_color(color)?;
        Ok(self.state.choose_color(color).is_ok())
    }

    pub fn choose_swap2_option(&mut self, option: u8) -> bool {
        self.state.choose_swap2_option(option).is_ok()
    }

    /// Flattened `[row0, col0, row1, col1, ...]`, converted to a typed array
    /// on the JS side rather than a `Vec` of pair objects.
    pub fn get_valid_moves(&self) -> Vec<u32> {
        self.state.valid_moves().iter().flat_map(|c: &Cell| [c.row() as u32, c.col() as u32]).collect()
    }

    pub fn get_game_info(&self) -> TurnInfo {
        TurnInfo::from_info(&self.state.info())
    }

    pub fn set_difficulty(&mut self, depth: u32, time_limit_s: f64) {
        self.engine.set_difficulty(depth, time_limit_s);
    }

    /// Runs a full-budget search for the side to move and returns the chosen
    /// cell, without applying it; the caller still drives `make_move`.
    pub fn get_move(&mut self, time_limit_s: f64) -> SearchResult {
        let mut position = self.state.position().clone();
        let mut captures = self.state.captures();
        let side = self.state.current_turn();
        let (best, debug) = self.engine.get_move_with_debug_info(&mut position, &mut captures, side, time_limit_s);
        SearchResult::new(best, debug.best_score)
    }

    /// Same contract as `get_move` but meant for a shorter, assistive
    /// suggestion rather than the engine's own play.
    pub fn suggest_move(&mut self, time_limit_s: f64) -> SearchResult {
        let mut position = self.state.position().clone();
        let mut captures = self.state.captures();
        let side = self.state.current_turn();
        let best = self.engine.suggest_move(&mut position, &mut captures, side, Some(time_limit_s));
        SearchResult::new(best, 0)
    }

    pub fn get_move_debug(&mut self, time_limit_s: f64) -> SearchDebugInfo {
        let mut position = self.state.position().clone();
        let mut captures = self.state.captures();
        let side = self.state.current_turn();
        let (best, debug) = self.engine.get_move_with_debug_info(&mut position, &mut captures, side, time_limit_s);
        SearchDebugInfo::from_debug(best, &debug)
    }
}
