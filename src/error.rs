//! Error type shared by the rules core, the backends and the UCI layer.

use std::fmt;

use crate::board::Move;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The move is not in the legal set for the square it starts from.
    IllegalMove(Move),
    /// FEN text could not be turned into a board.
    InvalidFen(String),
    /// Square or move text is not valid algebraic notation.
    InvalidNotation(String),
    /// External backend missing, not initialised, or gone away.
    EngineUnavailable(String),
    /// The external engine answered with something we cannot use.
    Protocol(String),
    /// A request is already pending on this engine session.
    SearchInProgress,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IllegalMove(mv) => write!(f, "illegal move {}", mv),
            Error::InvalidFen(why) => write!(f, "invalid FEN: {}", why),
            Error::InvalidNotation(text) => write!(f, "invalid notation '{}'", text),
            Error::EngineUnavailable(why) => write!(f, "engine unavailable: {}", why),
            Error::Protocol(why) => write!(f, "protocol error: {}", why),
            Error::SearchInProgress => write!(f, "a search is already in flight"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
