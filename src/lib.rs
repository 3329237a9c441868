pub mod board;
pub mod error;
pub mod eval;
pub mod game;
pub mod movegen;
pub mod player;
pub mod rules;
pub mod search;
pub mod uci;

pub use board::{Board, Color, Move, Piece, PieceKind, Square};
pub use error::{Error, Result};
pub use game::Game;
pub use player::MoveSelector;
pub use rules::{game_status, legal_moves, EndReason, GameStatus};
pub use search::{best_move, SearchResult};
