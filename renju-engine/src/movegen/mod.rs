mod candidates;
mod history;
mod ordering;

pub use candidates::{candidate_moves, radius_for_ply};
pub use history::{CountermoveTable, HistoryTable, KillerTable};
pub use ordering::{is_forced_tier, order_moves, OrderingContext, RatedMove};
