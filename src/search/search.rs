//! Main search engine implementation
//!
//! Plain minimax with alpha-beta pruning. White maximizes, black minimizes,
//! scores are always from white's point of view. Moves are tried in the
//! order the legality filter yields them (square by square, rank-major) and
//! the first move that strictly improves the running best is kept.

use super::params::SearchParams;
use super::stats::SearchStats;
use crate::board::{Board, Color, Move};
use crate::eval::evaluate;
use crate::rules::{all_legal_moves, is_in_check};
#[cfg(feature = "instrumentation")]
use tracing::instrument;

/// Bound larger than any reachable score
pub const INFINITY: i32 = 1_000_000;
/// Score of a mate delivered at the root; reduced by one per ply
pub const MATE: i32 = 100_000;
/// Any score beyond this magnitude is a forced mate
pub const MATE_THRESHOLD: i32 = MATE - 1_000;

/// Outcome of one search invocation. `mv` is None only when the side to
/// move had no legal move (or depth was zero).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub score: i32,
    pub mv: Option<Move>,
}

impl SearchResult {
    fn leaf(score: i32) -> Self {
        Self { score, mv: None }
    }

    /// True when the score reports a forced mate for either side.
    pub fn is_mate(&self) -> bool {
        self.score.abs() >= MATE_THRESHOLD
    }
}

/// Main search engine
pub struct Search {
    /// Search parameters
    params: SearchParams,

    /// Search statistics
    stats: SearchStats,
}

impl Search {
    /// Create new search engine
    pub fn new(params: SearchParams) -> Self {
        Self {
            params,
            stats: SearchStats::new(),
        }
    }

    /// Search with default parameters at the given depth
    pub fn with_depth(depth: u8) -> Self {
        Self::new(SearchParams::new().depth(depth))
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Get statistics of the last search
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Best move for `side` on `board` at the configured depth
    #[cfg_attr(feature = "instrumentation", instrument(skip_all))]
    pub fn search(&mut self, board: &Board, side: Color) -> SearchResult {
        self.stats.reset();
        self.stats.start_timing();

        let depth = self.params.depth;
        let result = self.minimax(board, side, depth, 0, -INFINITY, INFINITY);

        self.stats.update_timing();
        result
    }

    fn minimax(
        &mut self,
        board: &Board,
        side: Color,
        depth: u8,
        ply: u8,
        mut alpha: i32,
        mut beta: i32,
    ) -> SearchResult {
        self.stats.inc_node();

        if depth == 0 {
            self.stats.inc_evaluation();
            return SearchResult::leaf(evaluate(board));
        }

        let moves = all_legal_moves(board, side);
        if moves.is_empty() {
            self.stats.inc_evaluation();
            return SearchResult::leaf(self.terminal_score(board, side, ply));
        }

        let maximizing = side == Color::White;
        let mut best = SearchResult::leaf(if maximizing { -INFINITY } else { INFINITY });

        for mv in moves {
            // Copia di lavoro per questo ramo, scartata al ritorno
            let child = board.apply_unchecked(mv);
            let score = self
                .minimax(&child, side.opposite(), depth - 1, ply + 1, alpha, beta)
                .score;

            if maximizing {
                if score > best.score {
                    best = SearchResult {
                        score,
                        mv: Some(mv),
                    };
                }
                alpha = alpha.max(best.score);
            } else {
                if score < best.score {
                    best = SearchResult {
                        score,
                        mv: Some(mv),
                    };
                }
                beta = beta.min(best.score);
            }

            if beta <= alpha {
                self.stats.inc_cutoff();
                break;
            }
        }

        best
    }

    // Side to move has no legal move
    fn terminal_score(&self, board: &Board, side: Color, ply: u8) -> i32 {
        if !self.params.score_mates {
            return evaluate(board);
        }
        if !is_in_check(board, side) {
            return 0;
        }
        let mate = MATE - ply as i32;
        match side {
            Color::White => -mate,
            Color::Black => mate,
        }
    }
}

/// Search `board` for `side` to `depth` plies with default parameters.
pub fn best_move(board: &Board, side: Color, depth: u8) -> SearchResult {
    Search::with_depth(depth).search(board, side)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Square;

    #[test]
    fn test_search_creation() {
        let search = Search::new(SearchParams::new());
        assert_eq!(search.params().depth, 3);
        assert!(!search.params().score_mates);
        assert_eq!(search.stats().nodes, 0);
    }

    #[test]
    fn depth_zero_returns_static_evaluation() {
        let (board, _) = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let result = best_move(&board, Color::White, 0);
        assert_eq!(result, SearchResult::leaf(evaluate(&board)));
    }

    #[test]
    fn black_minimizes_by_taking_the_queen() {
        let (board, _) = Board::from_fen("3rk3/8/8/8/7K/8/8/3Q4 b - - 0 1").unwrap();
        let result = best_move(&board, Color::Black, 1);
        assert_eq!(result.mv, Some(Move::from_uci("d8d1").unwrap()));
        assert!(result.score < 0);
    }

    #[test]
    fn white_maximizes_by_taking_the_rook() {
        let (board, _) = Board::from_fen("4k3/8/8/8/3r4/8/8/3QK3 w - - 0 1").unwrap();
        let result = best_move(&board, Color::White, 2);
        assert_eq!(result.mv, Some(Move::from_uci("d1d4").unwrap()));
        assert!(result.score > 0);
    }

    #[test]
    fn no_legal_moves_yields_no_move_and_static_score() {
        // Stallo: il Nero non ha mosse
        let (board, _) = Board::from_fen("k7/8/1Q6/8/8/8/8/7K b - - 0 1").unwrap();
        let result = best_move(&board, Color::Black, 3);
        assert_eq!(result.mv, None);
        assert_eq!(result.score, evaluate(&board));
    }

    #[test]
    fn mate_scoring_reports_distance() {
        let (board, _) = Board::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let mut search = Search::new(SearchParams::new().depth(2).score_mates(true));
        let result = search.search(&board, Color::White);
        assert_eq!(result.score, MATE - 1);
        assert!(result.is_mate());
        assert_eq!(
            result.mv.map(|m| m.to),
            Some(Square::from_algebraic("a8").unwrap())
        );
        assert!(search.stats().nodes > 0);
    }
}
