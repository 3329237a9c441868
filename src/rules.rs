//! Legality filter and game-end detection.
//!
//! A pseudo-legal destination is kept only if, on a scratch copy of the
//! board with the move applied, the mover's king is not attacked. This is
//! the single source of truth for legality: `Board::apply` and the search
//! both take their moves from here.

use crate::board::{Board, Color, Move, PieceKind, Square};
use crate::movegen::{generate, is_square_attacked};
#[cfg(feature = "instrumentation")]
use tracing::instrument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndReason {
    Checkmate,
    Stalemate,
}

/// Derived game state; recomputed after every applied move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameStatus {
    pub is_over: bool,
    pub winner: Option<Color>,
    pub reason: Option<EndReason>,
}

impl GameStatus {
    pub fn ongoing() -> Self {
        Self {
            is_over: false,
            winner: None,
            reason: None,
        }
    }

    pub fn checkmate(winner: Color) -> Self {
        Self {
            is_over: true,
            winner: Some(winner),
            reason: Some(EndReason::Checkmate),
        }
    }

    pub fn stalemate() -> Self {
        Self {
            is_over: true,
            winner: None,
            reason: Some(EndReason::Stalemate),
        }
    }
}

/// Legal moves of the piece on `from`, whatever its color.
#[cfg_attr(feature = "instrumentation", instrument(skip_all))]
pub fn legal_moves(board: &Board, from: Square) -> Vec<Move> {
    let piece = match board.piece_at(from) {
        Some(p) => p,
        None => return Vec::new(),
    };

    let mut legal = Vec::new();
    for to in generate(board, from, false) {
        let promotes = piece.kind == PieceKind::Pawn && to.rank == piece.color.promotion_rank();
        let probe = Move::new(from, to);
        let scratch = board.apply_unchecked(probe);
        // Se muove il re, la sua casa è la destinazione
        let king = if piece.kind == PieceKind::King {
            Some(to)
        } else {
            scratch.king_square(piece.color)
        };
        if king.map_or(false, |k| is_square_attacked(&scratch, k, piece.color)) {
            continue;
        }
        if promotes {
            legal.extend(
                PieceKind::PROMOTIONS
                    .iter()
                    .map(|&kind| Move::with_promotion(from, to, kind)),
            );
        } else {
            legal.push(probe);
        }
    }
    legal
}

/// Legal moves from `from` for the side to move; empty when the square is
/// empty or holds the other side's piece.
pub fn legal_moves_for(board: &Board, from: Square, side: Color) -> Vec<Move> {
    match board.piece_at(from) {
        Some(p) if p.color == side => legal_moves(board, from),
        _ => Vec::new(),
    }
}

/// Every legal move of `side`, square by square in rank-major order.
pub fn all_legal_moves(board: &Board, side: Color) -> Vec<Move> {
    board
        .pieces()
        .filter(|(_, p)| p.color == side)
        .flat_map(|(sq, _)| legal_moves(board, sq))
        .collect()
}

pub fn has_any_legal_move(board: &Board, side: Color) -> bool {
    board
        .pieces()
        .filter(|(_, p)| p.color == side)
        .any(|(sq, _)| !legal_moves(board, sq).is_empty())
}

/// A side without a king is never in check.
pub fn is_in_check(board: &Board, side: Color) -> bool {
    board
        .king_square(side)
        .map_or(false, |k| is_square_attacked(board, k, side))
}

/// Status of the game with `side` to move.
pub fn game_status(board: &Board, side: Color) -> GameStatus {
    if has_any_legal_move(board, side) {
        GameStatus::ongoing()
    } else if is_in_check(board, side) {
        GameStatus::checkmate(side.opposite())
    } else {
        GameStatus::stalemate()
    }
}

/// Number of leaf nodes of the legal move tree at `depth` plies.
pub fn perft(board: &Board, side: Color, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = all_legal_moves(board, side);
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .into_iter()
        .map(|mv| perft(&board.apply_unchecked(mv), side.opposite(), depth - 1))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(text: &str) -> Square {
        Square::from_algebraic(text).unwrap()
    }

    #[test]
    fn initial_position_has_twenty_moves() {
        let board = Board::initial();
        assert_eq!(all_legal_moves(&board, Color::White).len(), 20);
        assert_eq!(all_legal_moves(&board, Color::Black).len(), 20);
    }

    #[test]
    fn wrong_color_or_empty_square_yields_nothing() {
        let board = Board::initial();
        assert!(legal_moves_for(&board, sq("e7"), Color::White).is_empty());
        assert!(legal_moves_for(&board, sq("e4"), Color::White).is_empty());
        assert_eq!(legal_moves_for(&board, sq("e2"), Color::White).len(), 2);
    }

    #[test]
    fn pinned_piece_cannot_leave_the_line() {
        // Alfiere e2 inchiodato dalla torre e8
        let (board, _) = Board::from_fen("4r1k1/8/8/8/8/8/4B3/4K3 w - - 0 1").unwrap();
        assert!(legal_moves(&board, sq("e2")).is_empty());
    }

    #[test]
    fn king_cannot_capture_defended_piece() {
        let (board, _) = Board::from_fen("6k1/8/8/8/8/3q4/4r3/4K3 w - - 0 1").unwrap();
        let moves: Vec<String> = legal_moves(&board, sq("e1"))
            .iter()
            .map(|m| m.to_string())
            .collect();
        assert!(!moves.contains(&"e1e2".to_string()));
    }

    #[test]
    fn promotion_expands_to_four_choices() {
        let (board, _) = Board::from_fen("7k/P7/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let moves = legal_moves(&board, sq("a7"));
        let kinds: Vec<_> = moves.iter().map(|m| m.promotion).collect();
        assert_eq!(
            kinds,
            vec![
                Some(PieceKind::Queen),
                Some(PieceKind::Rook),
                Some(PieceKind::Bishop),
                Some(PieceKind::Knight)
            ]
        );
    }

    #[test]
    fn status_of_initial_position_is_ongoing() {
        assert_eq!(
            game_status(&Board::initial(), Color::White),
            GameStatus::ongoing()
        );
    }

    #[test]
    fn perft_initial_shallow() {
        let board = Board::initial();
        assert_eq!(perft(&board, Color::White, 1), 20);
        assert_eq!(perft(&board, Color::White, 2), 400);
    }
}
