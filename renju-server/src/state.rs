use std::collections::HashMap;
use std::fmt;

use rand::Rng;

use renju_core::{Color, GameInfo, GameMode, GameState, MoveError, StartingRule};
use renju_engine::Engine;

const KEY_LENGTH: u32 = 15;
const SUGGESTION_TT_MB: usize = 16;

/// Server-layer error enum wrapping the core `MoveError`, per the error
/// handling design: a lookup miss is a routing concern the core crate has
/// no notion of, so it isn't shoehorned into a `MoveError` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerError {
    GameNotFound,
    Move(MoveError),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::GameNotFound => write!(f, "game not found"),
            ServerError::Move(e) => write!(f, "{e}"),
        }
    }
}

impl From<MoveError> for ServerError {
    fn from(e: MoveError) -> Self {
        ServerError::Move(e)
    }
}

pub struct ServerState {
    games: HashMap<String, GameData>,
}

struct GameData {
    state: GameState,
    // Kept per-game rather than built fresh per request so the TT,
    // history and killer tables actually accumulate across a game the
    // way `Engine::age_between_moves` expects.
    engine: Engine,
}

impl ServerState {
    pub fn new() -> Self {
        Self { games: HashMap::new() }
    }

    pub fn create_game(&mut self, mode: GameMode, starting_rule: StartingRule) -> (String, GameInfo) {
        let key = random_string(KEY_LENGTH);
        let state = GameState::new(mode, starting_rule);
        let info = state.info();
        self.games.insert(key.clone(), GameData { state, engine: Engine::new(SUGGESTION_TT_MB) });
        (key, info)
    }

    pub fn get_info(&self, key: &str) -> Option<GameInfo> {
        self.games.get(key).map(|gd| gd.state.info())
    }

    pub fn make_move(&mut self, key: &str, row: usize, col: usize) -> Result<GameInfo, ServerError> {
        let game = self.games.get_mut(key).ok_or(ServerError::GameNotFound)?;
        game.state.make_move(row, col, 0)?;
        Ok(game.state.info())
    }

    pub fn choose_color(&mut self, key: &str, color: Color) -> Result<GameInfo, ServerError> {
        let game = self.games.get_mut(key).ok_or(ServerError::GameNotFound)?;
        game.state.choose_color(color)?;
        Ok(game.state.info())
    }

    pub fn choose_swap2_option(&mut self, key: &str, option: u8) -> Result<GameInfo, ServerError> {
        let game = self.games.get_mut(key).ok_or(ServerError::GameNotFound)?;
        game.state.choose_swap2_option(option)?;
        Ok(game.state.info())
    }

    /// Runs a move suggestion off the game's own persistent search tables,
    /// against a scratch copy of the position (the search never needs to
    /// keep its working copy). `Ok(None)` means the board has no legal
    /// move left, the structural "no legal move" case from the error
    /// taxonomy rather than a lookup failure.
    pub fn move_suggestion(&mut self, key: &str) -> Result<Option<(usize, usize)>, ServerError> {
        let game = self.games.get_mut(key).ok_or(ServerError::GameNotFound)?;
        let side = game.state.current_turn();
        let mut position = game.state.position().clone();
        let mut captures = game.state.captures();
        Ok(game.engine.suggest_move(&mut position, &mut captures, side, None).map(|cell| (cell.row(), cell.col())))
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}

fn random_string(length: u32) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    (0..length).map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char).collect()
}
