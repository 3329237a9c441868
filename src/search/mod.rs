//! Search engine: depth-limited minimax with alpha-beta pruning
//!
//! Every branch works on its own board copy produced by the move applier,
//! so sibling branches never share mutable state.

pub mod params;
pub mod search;
pub mod stats;

pub use self::params::{SearchParams, DEFAULT_DEPTH};
pub use self::search::{best_move, Search, SearchResult, INFINITY, MATE, MATE_THRESHOLD};
pub use self::stats::SearchStats;
