mod heuristic;
pub mod patterns;
mod score;

pub use heuristic::{evaluate, score_move, LOSE_SCORE, WIN_SCORE};
pub(crate) use heuristic::{has_live_threat, scan_from};
pub use score::{Evaluation, INF};
