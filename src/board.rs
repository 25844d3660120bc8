// src/board.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::moves::Move;
use crate::piece::{Color, Piece, PieceType};
use crate::position::Position;

/// Back rank from column 1 to column 8.
pub const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook, PieceType::Knight, PieceType::Bishop, PieceType::Queen,
    PieceType::King, PieceType::Bishop, PieceType::Knight, PieceType::Rook,
];

/// 8x8 grid of optional pieces, `squares[row - 1][col - 1]`.
/// No piece-count invariant is enforced: a board may lack a king or hold two.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// An empty board.
    pub fn new() -> Self {
        Board::default()
    }

    /// A board holding the standard opening array.
    pub fn starting() -> Self {
        let mut board = Board::new();
        board.reset_to_start();
        board
    }

    #[inline(always)]
    pub fn get(&self, pos: Position) -> Option<Piece> {
        self.squares[pos.row() as usize - 1][pos.col() as usize - 1]
    }

    /// Places `piece` on `pos` (or clears it with `None`), returning the previous occupant.
    #[inline(always)]
    pub fn set(&mut self, pos: Position, piece: Option<Piece>) -> Option<Piece> {
        std::mem::replace(&mut self.squares[pos.row() as usize - 1][pos.col() as usize - 1], piece)
    }

    /// Relocates the piece at `mv.start()` to `mv.end()`, overwriting (capturing) any occupant.
    /// A pawn carrying a promotion is replaced by a piece of the promotion type.
    /// Knows nothing about castling or en passant. Returns the overwritten piece.
    ///
    /// If `mv.start()` is empty the board is left untouched and `None` is returned,
    /// the same value as a non-capturing move; check `get(mv.start())` first when
    /// the two must be told apart.
    pub fn apply_move(&mut self, mv: &Move) -> Option<Piece> {
        let moving = match self.set(mv.start(), None) {
            Some(piece) => piece,
            None => {
                eprintln!("WARN (apply): no piece at {} for move {}", mv.start(), mv);
                return None;
            }
        };
        let placed = match mv.promotion() {
            Some(kind) if moving.kind() == PieceType::Pawn => Piece::new(moving.color(), kind),
            _ => moving,
        };
        self.set(mv.end(), Some(placed))
    }

    /// Clears the board, then sets up WHITE on rows 1-2 and BLACK on rows 7-8.
    pub fn reset_to_start(&mut self) {
        self.squares = Default::default();
        for color in [Color::White, Color::Black] {
            let back = color.home_row() as usize - 1;
            let front = color.pawn_row() as usize - 1;
            for (col, &kind) in BACK_RANK.iter().enumerate() {
                self.squares[back][col] = Some(Piece::new(color, kind));
                self.squares[front][col] = Some(Piece::new(color, PieceType::Pawn));
            }
        }
    }

    /// First square, row-major from (1, 1), holding a piece equal to `piece`.
    pub fn find_first(&self, piece: Piece) -> Option<Position> {
        Position::all().find(|&pos| self.get(pos) == Some(piece))
    }

    /// All occupied squares with their pieces, row-major.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(move |pos| self.get(pos).map(|piece| (pos, piece)))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.squares.iter().rev() {
            for square in row {
                match square {
                    Some(piece) => write!(f, "{}", piece)?,
                    None => write!(f, ".")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
