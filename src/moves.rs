// src/moves.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::piece::PieceType;
use crate::position::Position;

/// A move from `start` to `end`. `promotion` is only meaningful for a pawn reaching the far rank.
/// Equality includes the promotion field.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    start: Position,
    end: Position,
    promotion: Option<PieceType>,
}

impl Move {
    pub fn new(start: Position, end: Position, promotion: Option<PieceType>) -> Self {
        Move { start, end, promotion }
    }

    #[inline(always)]
    pub fn start(&self) -> Position { self.start }

    #[inline(always)]
    pub fn end(&self) -> Position { self.end }

    #[inline(always)]
    pub fn promotion(&self) -> Option<PieceType> { self.promotion }

    /// Signed (rows, columns) travelled.
    pub(crate) fn delta(&self) -> (i32, i32) {
        (self.end.row() - self.start.row(), self.end.col() - self.start.col())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.start, self.end)?;
        if let Some(kind) = self.promotion {
            write!(f, " = {}", kind)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotion_is_part_of_identity() {
        let from = Position::new(7, 1).unwrap();
        let to = Position::new(8, 1).unwrap();
        assert_ne!(Move::new(from, to, Some(PieceType::Queen)), Move::new(from, to, Some(PieceType::Knight)));
        assert_ne!(Move::new(from, to, None), Move::new(from, to, Some(PieceType::Queen)));
        assert_eq!(Move::new(from, to, None), Move::new(from, to, None));
    }

    #[test]
    fn display_shows_promotion() {
        let mv = Move::new(Position::new(7, 1).unwrap(), Position::new(8, 1).unwrap(), Some(PieceType::Rook));
        assert_eq!(mv.to_string(), "(7, 1) -> (8, 1) = ROOK");
        assert_eq!(mv.delta(), (1, 0));
    }
}
