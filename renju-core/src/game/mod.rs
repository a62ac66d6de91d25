pub mod rules;
mod state;

pub use rules::{can_break_five, captures_for, check_move, check_winner, count_open_threes, legal_moves, Captures, MoveError};
pub use state::{GameInfo, GameMode, GamePhase, GameState, MoveLogEntry, Player, PlayerKind, StartingRule};
