mod pv_line;
mod searching;

pub use pv_line::PVLine;
pub use searching::{Search, SearchOptions, SearchResult};
