//! Search parameters and configuration
//!
//! Controls the look-ahead depth and how positions without legal moves
//! are scored.

/// Default look-ahead in plies.
pub const DEFAULT_DEPTH: u8 = 3;

/// Search parameters for the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Search depth in plies
    pub depth: u8,

    /// Score positions without legal moves as mate (or zero on stalemate)
    /// instead of falling back to the static evaluation
    pub score_mates: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            score_mates: false,
        }
    }
}

impl SearchParams {
    /// Create new search params with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set depth in plies
    pub fn depth(mut self, depth: u8) -> Self {
        self.depth = depth;
        self
    }

    /// Enable or disable mate scoring
    pub fn score_mates(mut self, enable: bool) -> Self {
        self.score_mates = enable;
        self
    }
}
