// src/position.rs
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;

use crate::error::{InvalidArgument, Result};

pub const MIN_INDEX: i32 = 1;
pub const MAX_INDEX: i32 = 8;

/// A square on the board. Row 1 is WHITE's back rank, column 1 is the a-file.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "RawPosition", into = "RawPosition")]
pub struct Position {
    row: u8,
    col: u8,
}

impl Position {
    /// Fails with `InvalidArgument` unless both coordinates are in 1..=8.
    pub fn new(row: i32, col: i32) -> Result<Self> {
        Ok(Self::checked(row, col)?)
    }

    fn checked(row: i32, col: i32) -> std::result::Result<Self, InvalidArgument> {
        if !(MIN_INDEX..=MAX_INDEX).contains(&row) {
            return Err(InvalidArgument::RowOutOfRange(row));
        }
        if !(MIN_INDEX..=MAX_INDEX).contains(&col) {
            return Err(InvalidArgument::ColumnOutOfRange(col));
        }
        Ok(Position { row: row as u8, col: col as u8 })
    }

    /// Constant squares known to be on the board (home squares etc).
    pub(crate) const fn at(row: u8, col: u8) -> Self {
        Position { row, col }
    }

    #[inline(always)]
    pub fn row(&self) -> i32 { self.row as i32 }

    #[inline(always)]
    pub fn col(&self) -> i32 { self.col as i32 }

    /// The square `(dr, dc)` away, or `None` if that falls off the board.
    #[inline]
    pub fn offset(&self, dr: i32, dc: i32) -> Option<Position> {
        Self::checked(self.row() + dr, self.col() + dc).ok()
    }

    /// Index 0..64 in row-major order starting at (1, 1).
    #[inline(always)]
    pub(crate) fn index(&self) -> usize {
        (self.row as usize - 1) * 8 + (self.col as usize - 1)
    }

    pub(crate) fn from_index(index: usize) -> Self {
        Position { row: (index / 8) as u8 + 1, col: (index % 8) as u8 + 1 }
    }

    /// All 64 squares, row-major from (1, 1) to (8, 8).
    pub fn all() -> impl Iterator<Item = Position> {
        (0..64).map(Position::from_index)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Serialize, Deserialize)]
struct RawPosition {
    row: i32,
    col: i32,
}

impl TryFrom<RawPosition> for Position {
    type Error = InvalidArgument;

    fn try_from(raw: RawPosition) -> std::result::Result<Self, Self::Error> {
        Position::checked(raw.row, raw.col)
    }
}

impl From<Position> for RawPosition {
    fn from(pos: Position) -> Self {
        RawPosition { row: pos.row(), col: pos.col() }
    }
}
