//! Board representation, capture/double-three/five rules, and the
//! opening-rule game-state machine for 19x19 Gomoku with Ninuki-style
//! captures.

pub mod board;
pub mod game;
pub mod game_elements;
pub mod zobrist;

pub use board::{BitSet361, Direction, Position, Stone, BOARD_SIZE, TOTAL_CELLS};
pub use game::{
    Captures, GameInfo, GameMode, GamePhase, GameState, MoveError, MoveLogEntry, Player, PlayerKind, StartingRule,
};
pub use game_elements::{Cell, Color, MoveRecord};
