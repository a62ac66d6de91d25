pub mod bitboard;
mod position;
mod stone_ext;

pub use bitboard::{BitSet361, Direction, BOARD_SIZE, TOTAL_CELLS};
pub use position::{Position, Stone};
