//! Move-selection backends.
//!
//! Everything that can propose a move implements `MoveSelector`; the game
//! driver only ever talks to the trait. Backends:
//! - `MinimaxPlayer`: the built-in alpha-beta search
//! - `RandomPlayer`: uniform pick among our legal moves
//! - `ShakmatyPlayer`: uniform pick among the legal moves of the `shakmaty`
//!   rules library, standing in for our legality layer
//! - `EngineClient` (in `uci::client`): an external UCI engine process

use rand::Rng;
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Position};

use crate::board::{Board, Color, Move};
use crate::error::{Error, Result};
use crate::rules::all_legal_moves;
use crate::search::{Search, SearchParams, SearchStats};

/// "Propose a move for `side` on `board`". `Ok(None)` means the side has no
/// legal move; the caller decides between checkmate and stalemate.
pub trait MoveSelector {
    fn select_move(&mut self, board: &Board, side: Color) -> Result<Option<Move>>;

    /// Print whatever the backend tracks about its last decision.
    fn report(&self) {}
}

pub struct MinimaxPlayer {
    search: Search,
}

impl MinimaxPlayer {
    /// Depth is raised to at least one ply: a zero-depth search never
    /// proposes a move, which would read as "no legal move".
    pub fn new(params: SearchParams) -> Self {
        let depth = params.depth.max(1);
        Self {
            search: Search::new(params.depth(depth)),
        }
    }

    pub fn with_depth(depth: u8) -> Self {
        Self::new(SearchParams::new().depth(depth))
    }

    /// Statistics of the most recent search
    pub fn stats(&self) -> &SearchStats {
        self.search.stats()
    }
}

impl MoveSelector for MinimaxPlayer {
    fn select_move(&mut self, board: &Board, side: Color) -> Result<Option<Move>> {
        Ok(self.search.search(board, side).mv)
    }

    fn report(&self) {
        self.search.stats().print_summary();
    }
}

/// Trivial opponent. The random source is injected so games replay
/// identically from the same seed.
pub struct RandomPlayer<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomPlayer<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> MoveSelector for RandomPlayer<R> {
    fn select_move(&mut self, board: &Board, side: Color) -> Result<Option<Move>> {
        let moves = all_legal_moves(board, side);
        if moves.is_empty() {
            return Ok(None);
        }
        Ok(Some(moves[self.rng.gen_range(0..moves.len())]))
    }
}

/// Legal moves come from `shakmaty` through the FEN boundary, so castling
/// and en passant are never offered (the FEN carries neither).
pub struct ShakmatyPlayer<R: Rng> {
    rng: R,
}

impl<R: Rng> ShakmatyPlayer<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

/// Legal moves of `side` according to `shakmaty`, in UCI notation.
pub fn shakmaty_legal_moves(board: &Board, side: Color) -> Result<Vec<String>> {
    let fen = board
        .to_fen(side)
        .parse::<Fen>()
        .map_err(|e| Error::InvalidFen(e.to_string()))?;
    let pos = fen
        .into_position::<Chess>(CastlingMode::Standard)
        .map_err(|e| Error::EngineUnavailable(format!("position rejected: {}", e)))?;
    Ok(pos
        .legal_moves()
        .iter()
        .map(|m| m.to_uci(CastlingMode::Standard).to_string())
        .collect())
}

impl<R: Rng> MoveSelector for ShakmatyPlayer<R> {
    fn select_move(&mut self, board: &Board, side: Color) -> Result<Option<Move>> {
        let moves = shakmaty_legal_moves(board, side)?;
        if moves.is_empty() {
            return Ok(None);
        }
        let pick = &moves[self.rng.gen_range(0..moves.len())];
        Move::from_uci(pick)
            .map(Some)
            .map_err(|_| Error::Protocol(format!("library produced '{}'", pick)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn random_player_is_reproducible_from_seed() {
        let board = Board::initial();
        let mut a = RandomPlayer::new(StdRng::seed_from_u64(7));
        let mut b = RandomPlayer::new(StdRng::seed_from_u64(7));
        for _ in 0..5 {
            assert_eq!(
                a.select_move(&board, Color::White).unwrap(),
                b.select_move(&board, Color::White).unwrap()
            );
        }
    }

    #[test]
    fn players_report_no_move_when_stalemated() {
        let (board, side) = Board::from_fen("k7/8/1Q6/8/8/8/8/7K b - - 0 1").unwrap();
        let mut random = RandomPlayer::new(StdRng::seed_from_u64(1));
        let mut library = ShakmatyPlayer::new(StdRng::seed_from_u64(1));
        let mut minimax = MinimaxPlayer::with_depth(2);
        assert_eq!(random.select_move(&board, side).unwrap(), None);
        assert_eq!(library.select_move(&board, side).unwrap(), None);
        assert_eq!(minimax.select_move(&board, side).unwrap(), None);
    }

    #[test]
    fn minimax_player_moves_even_at_depth_zero() {
        let board = Board::initial();
        let mut minimax = MinimaxPlayer::with_depth(0);
        let mv = minimax.select_move(&board, Color::White).unwrap();
        assert!(mv.is_some_and(|m| all_legal_moves(&board, Color::White).contains(&m)));
    }

    #[test]
    fn shakmaty_move_is_legal_for_us() {
        let board = Board::initial();
        let mut library = ShakmatyPlayer::new(StdRng::seed_from_u64(42));
        let mv = library.select_move(&board, Color::White).unwrap().unwrap();
        assert!(all_legal_moves(&board, Color::White).contains(&mv));
    }
}
