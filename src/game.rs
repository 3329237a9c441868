//! Game driver: owns the current board and side to move, and asks a
//! `MoveSelector` for moves without knowing which backend it is.

use crate::board::{Board, Color, Move, Square};
use crate::error::{Error, Result};
use crate::player::MoveSelector;
use crate::rules::{game_status, legal_moves_for, GameStatus};

#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    side: Color,
    status: GameStatus,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self {
            board: Board::initial(),
            side: Color::White,
            status: GameStatus::ongoing(),
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self> {
        let (board, side) = Board::from_fen(fen)?;
        let status = game_status(&board, side);
        Ok(Self {
            board,
            side,
            status,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side(&self) -> Color {
        self.side
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Moves selectable from `from` for the side to move.
    pub fn legal_moves(&self, from: Square) -> Vec<Move> {
        if self.status.is_over {
            return Vec::new();
        }
        legal_moves_for(&self.board, from, self.side)
    }

    /// Commit a move for the side to move and recompute the status.
    pub fn play(&mut self, mv: Move) -> Result<GameStatus> {
        if self.status.is_over {
            return Err(Error::IllegalMove(mv));
        }
        match self.board.piece_at(mv.from) {
            Some(p) if p.color == self.side => {}
            _ => return Err(Error::IllegalMove(mv)),
        }
        self.board = self.board.apply(mv)?;
        self.side = self.side.opposite();
        self.status = game_status(&self.board, self.side);
        Ok(self.status)
    }

    /// Let `player` move for the side to move. Returns the move played, or
    /// None when the game is already over or the backend has no move. On
    /// error nothing is applied.
    pub fn step(&mut self, player: &mut dyn MoveSelector) -> Result<Option<Move>> {
        if self.status.is_over {
            return Ok(None);
        }
        match player.select_move(&self.board, self.side)? {
            Some(mv) => {
                self.play(mv)?;
                Ok(Some(mv))
            }
            None => Ok(None),
        }
    }
}
