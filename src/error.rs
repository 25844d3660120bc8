// src/error.rs
use std::error::Error;
use std::fmt;

use crate::moves::Move;
use crate::position::Position;

/// Construction-time failures. Nothing partially built escapes when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidArgument {
    RowOutOfRange(i32),
    ColumnOutOfRange(i32),
    Notation(String),
    PieceSymbol(char),
}

impl fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidArgument::RowOutOfRange(row) => write!(f, "Row must be in 1..8, got {}", row),
            InvalidArgument::ColumnOutOfRange(col) => write!(f, "Column must be in 1..8, got {}", col),
            InvalidArgument::Notation(input) => write!(f, "Invalid notation: '{}'. Use format like 'e4', 'e2e4' or 'a7a8q'.", input),
            InvalidArgument::PieceSymbol(c) => write!(f, "Invalid piece symbol: '{}'. Use one of KQRBNP / kqrbnp.", c),
        }
    }
}

/// Operation-time failures raised by `Game::make_move`. The game is untouched when one is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidMove {
    GameResigned,
    NoPieceAt(Position),
    NotYourTurn,
    IllegalMove(Move),
}

impl fmt::Display for InvalidMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidMove::GameResigned => write!(f, "The game has been resigned. No moves can be made."),
            InvalidMove::NoPieceAt(pos) => write!(f, "No piece found at {}", pos),
            InvalidMove::NotYourTurn => write!(f, "It's not that piece's turn to move."),
            InvalidMove::IllegalMove(mv) => write!(f, "Illegal move: {}", mv),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    InvalidArgument(InvalidArgument),
    InvalidMove(InvalidMove),
}

impl fmt::Display for ChessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChessError::InvalidArgument(e) => write!(f, "Invalid argument: {}", e),
            ChessError::InvalidMove(e) => write!(f, "Invalid move: {}", e),
        }
    }
}

impl Error for InvalidArgument {}
impl Error for InvalidMove {}

impl Error for ChessError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ChessError::InvalidArgument(e) => Some(e),
            ChessError::InvalidMove(e) => Some(e),
        }
    }
}

// Automatic conversions for `?`
impl From<InvalidArgument> for ChessError {
    fn from(e: InvalidArgument) -> Self { ChessError::InvalidArgument(e) }
}
impl From<InvalidMove> for ChessError {
    fn from(e: InvalidMove) -> Self { ChessError::InvalidMove(e) }
}

pub type Result<T> = std::result::Result<T, ChessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_keep_the_error_kind() {
        let e: ChessError = InvalidArgument::RowOutOfRange(9).into();
        assert!(matches!(e, ChessError::InvalidArgument(InvalidArgument::RowOutOfRange(9))));
        let e: ChessError = InvalidMove::NotYourTurn.into();
        assert!(matches!(e, ChessError::InvalidMove(InvalidMove::NotYourTurn)));
    }

    #[test]
    fn messages_name_the_offending_value() {
        let e = ChessError::from(InvalidArgument::ColumnOutOfRange(0));
        assert_eq!(e.to_string(), "Invalid argument: Column must be in 1..8, got 0");
        assert!(e.source().is_some());
    }
}
