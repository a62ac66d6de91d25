//! Top-level game-state machine: turn order, capture tally, move history,
//! and the opening-rule phase transitions for Standard / Pro / Swap / Swap2.

use serde::{Deserialize, Serialize};

use super::rules::{self, Captures, MoveError};
use crate::board::Position;
use crate::game_elements::{Cell, Color, MoveRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    Pvp,
    Pve,
    Eve,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartingRule {
    Standard,
    Pro,
    Swap,
    Swap2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Normal,
    OpeningPlace,
    SwapChoice,
    Swap2Choice,
    Swap2Extra,
    Swap2Final,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerKind {
    Human,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub color: Color,
    pub kind: PlayerKind,
    pub name: String,
}

impl Player {
    pub fn new(color: Color, kind: PlayerKind) -> Self {
        let color_name = match color {
            Color::Black => "Black",
            Color::White => "White",
        };
        let type_name = match kind {
            PlayerKind::Human => "Human",
            PlayerKind::Ai => "AI",
        };
        Self { color, kind, name: format!("{color_name} ({type_name})") }
    }
}

/// One entry in the human-facing move log: the placement plus how long the
/// mover spent deciding, in milliseconds (0 for opening-phase placements).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveLogEntry {
    pub record: MoveRecord,
    pub thinking_time_ms: u64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct PerColor<T> {
    black: T,
    white: T,
}

impl<T: Copy> PerColor<T> {
    fn get(&self, color: Color) -> T {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
        }
    }

    fn set(&mut self, color: Color, value: T) {
        match color {
            Color::Black => self.black = value,
            Color::White => self.white = value,
        }
    }
}

/// Snapshot of the game used for display and for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameInfo {
    pub mode: GameMode,
    pub starting_rule: StartingRule,
    pub phase: GamePhase,
    pub turn: Color,
    pub move_count: usize,
    pub captures_black: u32,
    pub captures_white: u32,
    pub is_game_over: bool,
    pub winner: Option<Color>,
    pub last_move: Option<(usize, usize)>,
    pub phase_message: String,
    pub in_choice_phase: bool,
}

pub struct GameState {
    position: Position,
    mode: GameMode,
    starting_rule: StartingRule,
    captures: Captures,
    move_log: Vec<MoveLogEntry>,
    winner: Option<Color>,
    is_game_over: bool,
    last_move: Option<(usize, usize)>,
    last_move_time_ms: PerColor<u64>,

    phase: GamePhase,
    opening_stones: Vec<(usize, usize, Color)>,
    swap_player: Option<Color>,

    players: PerColor<Player>,
}

const OPENING_PATTERN: [Color; 3] = [Color::Black, Color::White, Color::Black];
const SWAP2_EXTRA_PATTERN: [Color; 2] = [Color::White, Color::Black];

impl GameState {
    pub fn new(mode: GameMode, starting_rule: StartingRule) -> Self {
        let phase = match starting_rule {
            StartingRule::Standard | StartingRule::Pro => GamePhase::Normal,
            StartingRule::Swap | StartingRule::Swap2 => GamePhase::OpeningPlace,
        };
        Self {
            position: Position::new(),
            mode,
            starting_rule,
            captures: Captures::default(),
            move_log: Vec::new(),
            winner: None,
            is_game_over: false,
            last_move: None,
            last_move_time_ms: PerColor::default(),
            phase,
            opening_stones: Vec::new(),
            swap_player: None,
            players: Self::players_for_mode(mode),
        }
    }

    fn players_for_mode(mode: GameMode) -> PerColor<Player> {
        match mode {
            GameMode::Pvp => {
                PerColor { black: Player::new(Color::Black, PlayerKind::Human), white: Player::new(Color::White, PlayerKind::Human) }
            }
            GameMode::Pve => {
                PerColor { black: Player::new(Color::Black, PlayerKind::Human), white: Player::new(Color::White, PlayerKind::Ai) }
            }
            GameMode::Eve => {
                PerColor { black: Player::new(Color::Black, PlayerKind::Ai), white: Player::new(Color::White, PlayerKind::Ai) }
            }
        }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn current_turn(&self) -> Color {
        self.position.turn()
    }

    pub fn current_player(&self) -> &Player {
        self.player(self.current_turn())
    }

    pub fn player(&self, color: Color) -> &Player {
        match color {
            Color::Black => &self.players.black,
            Color::White => &self.players.white,
        }
    }

    pub fn is_ai_turn(&self) -> bool {
        !self.is_game_over && self.current_player().kind == PlayerKind::Ai
    }

    pub fn move_count(&self) -> usize {
        self.move_log.len()
    }

    pub fn captures(&self) -> Captures {
        self.captures
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Attempts a placement by the side to move. Dispatches to the
    /// opening-rule handlers while those phases are active.
    pub fn make_move(&mut self, row: usize, col: usize, thinking_time_ms: u64) -> Result<(), MoveError> {
        let turn = self.current_turn();
        let result = self.try_make_move(row, col, thinking_time_ms);
        if let Err(ref reason) = result {
            log::warn!("rejected move ({row}, {col}) by {turn:?}: {reason}");
        }
        result
    }

    fn try_make_move(&mut self, row: usize, col: usize, thinking_time_ms: u64) -> Result<(), MoveError> {
        if self.is_game_over {
            return Err(MoveError::GameOver);
        }
        match self.phase {
            GamePhase::OpeningPlace => return self.make_opening_move(row, col),
            GamePhase::Swap2Extra => return self.make_swap2_extra_move(row, col),
            _ => {}
        }

        let color = self.current_turn();
        self.check_starting_rule_restriction(row, col)?;

        let captured = rules::check_move(&self.position, row, col, color)?;
        let cell = Cell::new(row, col).ok_or(MoveError::OutOfBounds)?;

        self.captures.add(color, captured.len() as u32);
        self.position.make_move(cell, color, captured);
        self.last_move = Some((row, col));
        self.last_move_time_ms.set(color, thinking_time_ms);
        self.move_log.push(MoveLogEntry {
            record: self.position.last_move().expect("move was just pushed").clone(),
            thinking_time_ms,
        });

        self.winner = rules::check_winner(&self.position, color, &self.captures);
        if self.winner.is_some() {
            self.is_game_over = true;
        }

        Ok(())
    }

    fn check_starting_rule_restriction(&self, row: usize, col: usize) -> Result<(), MoveError> {
        if self.starting_rule != StartingRule::Pro {
            return Ok(());
        }
        let center = Cell::center();
        let move_count = self.move_count();
        if move_count == 0 && (row, col) != (center.row(), center.col()) {
            return Err(MoveError::OpeningRuleViolated);
        }
        if move_count == 2 {
            let cell = Cell::new(row, col).ok_or(MoveError::OutOfBounds)?;
            if cell.chebyshev_distance(&center) < 3 {
                return Err(MoveError::OpeningRuleViolated);
            }
        }
        Ok(())
    }

    fn make_opening_move(&mut self, row: usize, col: usize) -> Result<(), MoveError> {
        let cell = Cell::new(row, col).ok_or(MoveError::OutOfBounds)?;
        if !self.position.is_empty_at(cell) {
            return Err(MoveError::Occupied);
        }
        let color = OPENING_PATTERN[self.opening_stones.len().min(2)];
        self.position.make_move(cell, color, vec![]);
        self.opening_stones.push((row, col, color));
        self.last_move = Some((row, col));
        self.move_log.push(MoveLogEntry { record: self.position.last_move().unwrap().clone(), thinking_time_ms: 0 });

        if self.opening_stones.len() == 3 {
            match self.starting_rule {
                StartingRule::Swap => {
                    self.phase = GamePhase::SwapChoice;
                    self.swap_player = Some(Color::White);
                }
                StartingRule::Swap2 => {
                    self.phase = GamePhase::Swap2Choice;
                    self.swap_player = Some(Color::White);
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn make_swap2_extra_move(&mut self, row: usize, col: usize) -> Result<(), MoveError> {
        let cell = Cell::new(row, col).ok_or(MoveError::OutOfBounds)?;
        if !self.position.is_empty_at(cell) {
            return Err(MoveError::Occupied);
        }
        let extra_count = self.opening_stones.len() - 3;
        let color = SWAP2_EXTRA_PATTERN[extra_count.min(1)];
        self.position.make_move(cell, color, vec![]);
        self.opening_stones.push((row, col, color));
        self.last_move = Some((row, col));
        self.move_log.push(MoveLogEntry { record: self.position.last_move().unwrap().clone(), thinking_time_ms: 0 });

        if self.opening_stones.len() == 5 {
            self.phase = GamePhase::Swap2Final;
            self.swap_player = Some(Color::Black);
        }
        Ok(())
    }

    /// Swaps the *logical* player/color assignment (never the board
    /// colors): the chosen `color` becomes whoever continues as mover.
    /// In PVE this is also where the human/AI seat assignment flips.
    pub fn choose_color(&mut self, chosen_color: Color) -> Result<(), MoveError> {
        if self.phase != GamePhase::SwapChoice && self.phase != GamePhase::Swap2Final {
            return Err(MoveError::OpeningRuleViolated);
        }
        if self.mode == GameMode::Pve && chosen_color == Color::White {
            self.players.black = Player::new(Color::Black, PlayerKind::Ai);
            self.players.white = Player::new(Color::White, PlayerKind::Human);
        }
        self.phase = GamePhase::Normal;
        Ok(())
    }

    /// Swap2 mid-choice: take Black, take White, or place two more stones.
    pub fn choose_swap2_option(&mut self, option: u8) -> Result<(), MoveError> {
        if self.phase != GamePhase::Swap2Choice {
            return Err(MoveError::OpeningRuleViolated);
        }
        match option {
            1 => {
                if self.mode == GameMode::Pve {
                    self.players.black = Player::new(Color::Black, PlayerKind::Ai);
                    self.players.white = Player::new(Color::White, PlayerKind::Human);
                }
                self.phase = GamePhase::Normal;
                Ok(())
            }
            2 => {
                self.phase = GamePhase::Normal;
                Ok(())
            }
            3 => {
                self.phase = GamePhase::Swap2Extra;
                Ok(())
            }
            _ => Err(MoveError::OpeningRuleViolated),
        }
    }

    pub fn is_in_choice_phase(&self) -> bool {
        matches!(self.phase, GamePhase::SwapChoice | GamePhase::Swap2Choice | GamePhase::Swap2Final)
    }

    pub fn undo_move(&mut self) -> bool {
        if self.move_log.is_empty() {
            return false;
        }
        let record = self.position.undo_move();
        let Some(record) = record else { return false };
        self.move_log.pop();
        self.captures.sub(record.side, record.captured.len() as u32);
        self.is_game_over = false;
        self.winner = None;
        self.last_move = self.move_log.last().map(|entry| (entry.record.row, entry.record.col));
        true
    }

    pub fn valid_moves(&self) -> Vec<Cell> {
        rules::legal_moves(&self.position, self.current_turn(), 2)
    }

    fn phase_message(&self) -> String {
        match self.phase {
            GamePhase::OpeningPlace => {
                let count = self.opening_stones.len();
                if count < 3 {
                    format!("Place {:?} stone ({} remaining)", OPENING_PATTERN[count], 3 - count)
                } else {
                    String::new()
                }
            }
            GamePhase::SwapChoice | GamePhase::Swap2Final => "Choose color: Black or White".to_string(),
            GamePhase::Swap2Choice => "Choose: take Black, take White, or place 2 more stones".to_string(),
            GamePhase::Swap2Extra => {
                let extra = self.opening_stones.len() - 3;
                format!("Place {:?} stone ({} remaining)", SWAP2_EXTRA_PATTERN[extra.min(1)], 2 - extra)
            }
            GamePhase::Normal if self.starting_rule == StartingRule::Pro => match self.move_count() {
                0 => "Pro rule: first move must be center".to_string(),
                2 => "Pro rule: must be 3+ from center".to_string(),
                _ => String::new(),
            },
            GamePhase::Normal => String::new(),
        }
    }

    pub fn info(&self) -> GameInfo {
        GameInfo {
            mode: self.mode,
            starting_rule: self.starting_rule,
            phase: self.phase,
            turn: self.current_turn(),
            move_count: self.move_count(),
            captures_black: self.captures.black,
            captures_white: self.captures.white,
            is_game_over: self.is_game_over,
            winner: self.winner,
            last_move: self.last_move,
            phase_message: self.phase_message(),
            in_choice_phase: self.is_in_choice_phase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_game_starts_in_normal_phase_with_black_to_move() {
        let game = GameState::new(GameMode::Pve, StartingRule::Standard);
        assert_eq!(game.phase(), GamePhase::Normal);
        assert_eq!(game.current_turn(), Color::Black);
    }

    #[test]
    fn pro_rule_rejects_first_move_off_center() {
        let mut game = GameState::new(GameMode::Pvp, StartingRule::Pro);
        assert_eq!(game.make_move(0, 0, 0), Err(MoveError::OpeningRuleViolated));
        assert!(game.make_move(9, 9, 0).is_ok());
    }

    #[test]
    fn pro_rule_rejects_second_black_move_too_close_to_center() {
        let mut game = GameState::new(GameMode::Pvp, StartingRule::Pro);
        game.make_move(9, 9, 0).unwrap();
        game.make_move(0, 0, 0).unwrap();
        assert_eq!(game.make_move(10, 10, 0), Err(MoveError::OpeningRuleViolated));
        assert!(game.make_move(12, 12, 0).is_ok());
    }

    #[test]
    fn swap_opening_places_three_stones_then_waits_for_choice() {
        let mut game = GameState::new(GameMode::Pvp, StartingRule::Swap);
        assert_eq!(game.phase(), GamePhase::OpeningPlace);
        game.make_move(9, 9, 0).unwrap();
        game.make_move(9, 10, 0).unwrap();
        game.make_move(9, 11, 0).unwrap();
        assert_eq!(game.phase(), GamePhase::SwapChoice);
        assert!(game.is_in_choice_phase());
        game.choose_color(Color::White).unwrap();
        assert_eq!(game.phase(), GamePhase::Normal);
    }

    #[test]
    fn swap2_extra_path_places_five_stones_before_final_choice() {
        let mut game = GameState::new(GameMode::Pvp, StartingRule::Swap2);
        game.make_move(9, 9, 0).unwrap();
        game.make_move(9, 10, 0).unwrap();
        game.make_move(9, 11, 0).unwrap();
        assert_eq!(game.phase(), GamePhase::Swap2Choice);
        game.choose_swap2_option(3).unwrap();
        assert_eq!(game.phase(), GamePhase::Swap2Extra);
        game.make_move(10, 9, 0).unwrap();
        game.make_move(10, 10, 0).unwrap();
        assert_eq!(game.phase(), GamePhase::Swap2Final);
        game.choose_color(Color::Black).unwrap();
        assert_eq!(game.phase(), GamePhase::Normal);
    }

    #[test]
    fn undo_clears_game_over_and_restores_turn() {
        let mut game = GameState::new(GameMode::Pvp, StartingRule::Standard);
        game.make_move(9, 9, 120).unwrap();
        assert_eq!(game.current_turn(), Color::White);
        assert!(game.undo_move());
        assert_eq!(game.current_turn(), Color::Black);
        assert_eq!(game.move_count(), 0);
    }
}
