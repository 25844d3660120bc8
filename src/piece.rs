// src/piece.rs
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use lazy_static::lazy_static;

use crate::board::Board;
use crate::error::InvalidArgument;
use crate::moves::Move;
use crate::position::Position;

// --- Direction sets ---
const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (2, 1), (2, -1), (-2, 1), (-2, -1),
    (1, 2), (1, -2), (-1, 2), (-1, -2),
];
const KING_OFFSETS: [(i32, i32); 8] = [
    (1, -1), (1, 0), (1, 1),
    (0, -1),         (0, 1),
    (-1, -1), (-1, 0), (-1, 1),
];
const DIAGONALS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ORTHOGONALS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Order in which promotion variants are generated.
pub const PROMOTION_CHOICES: [PieceType; 4] = [PieceType::Queen, PieceType::Rook, PieceType::Bishop, PieceType::Knight];

// --- Precomputed step tables ---
lazy_static! {
    static ref KNIGHT_TARGETS: Vec<Vec<Position>> = compute_step_targets(&KNIGHT_OFFSETS);
    static ref KING_TARGETS: Vec<Vec<Position>> = compute_step_targets(&KING_OFFSETS);
}

/// For every square (row-major index), the on-board squares reachable by one of `offsets`.
fn compute_step_targets(offsets: &[(i32, i32)]) -> Vec<Vec<Position>> {
    Position::all()
        .map(|from| offsets.iter().filter_map(|&(dr, dc)| from.offset(dr, dc)).collect())
        .collect()
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Color { White, Black }

impl Color {
    pub fn opponent(&self) -> Color {
        match self { Color::White => Color::Black, Color::Black => Color::White }
    }

    /// Row holding this color's king and rooks at the start.
    pub fn home_row(&self) -> i32 {
        match self { Color::White => 1, Color::Black => 8 }
    }

    pub fn pawn_row(&self) -> i32 {
        match self { Color::White => 2, Color::Black => 7 }
    }

    /// Row a pawn of this color promotes on.
    pub fn promotion_row(&self) -> i32 {
        match self { Color::White => 8, Color::Black => 1 }
    }

    /// Row delta of a forward pawn step.
    pub fn forward(&self) -> i32 {
        match self { Color::White => 1, Color::Black => -1 }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self { Color::White => "WHITE", Color::Black => "BLACK" })
    }
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PieceType { King, Queen, Bishop, Knight, Rook, Pawn }

impl PieceType {
    fn symbol(&self) -> char {
        match self {
            PieceType::Pawn => 'p', PieceType::Knight => 'n', PieceType::Bishop => 'b',
            PieceType::Rook => 'r', PieceType::Queen => 'q', PieceType::King => 'k',
        }
    }

    fn from_symbol(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceType::Pawn), 'n' => Some(PieceType::Knight), 'b' => Some(PieceType::Bishop),
            'r' => Some(PieceType::Rook), 'q' => Some(PieceType::Queen), 'k' => Some(PieceType::King),
            _ => None,
        }
    }

    /// Lowercase letter used in move notation (e7e8q). `None` for types a pawn can't become.
    pub fn promotion_symbol(&self) -> Option<char> {
        match self {
            PieceType::Queen | PieceType::Rook | PieceType::Bishop | PieceType::Knight => Some(self.symbol()),
            PieceType::King | PieceType::Pawn => None,
        }
    }

    pub fn from_promotion_symbol(c: char) -> Option<Self> {
        Self::from_symbol(c).filter(|kind| kind.promotion_symbol().is_some())
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PieceType::King => "KING", PieceType::Queen => "QUEEN", PieceType::Bishop => "BISHOP",
            PieceType::Knight => "KNIGHT", PieceType::Rook => "ROOK", PieceType::Pawn => "PAWN",
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    color: Color,
    kind: PieceType,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceType) -> Self { Piece { color, kind } }

    #[inline(always)]
    pub fn color(&self) -> Color { self.color }

    #[inline(always)]
    pub fn kind(&self) -> PieceType { self.kind }

    /// Uppercase for WHITE, lowercase for BLACK.
    pub fn symbol(&self) -> char {
        match self.color {
            Color::White => self.kind.symbol().to_ascii_uppercase(),
            Color::Black => self.kind.symbol(),
        }
    }

    pub fn from_symbol(c: char) -> Result<Self, InvalidArgument> {
        let kind = PieceType::from_symbol(c).ok_or(InvalidArgument::PieceSymbol(c))?;
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        Ok(Piece::new(color, kind))
    }

    /// Moves this piece could make from `at` on `board`, ignoring king safety.
    /// Castling and en passant need game history and are added by `Game`.
    pub fn pseudo_legal_moves(&self, board: &Board, at: Position) -> HashSet<Move> {
        let mut moves = HashSet::with_capacity(28);
        match self.kind {
            PieceType::Pawn => self.generate_pawn_moves(board, at, &mut moves),
            PieceType::Knight => self.generate_step_moves(board, at, &KNIGHT_TARGETS[at.index()], &mut moves),
            PieceType::King => self.generate_step_moves(board, at, &KING_TARGETS[at.index()], &mut moves),
            PieceType::Bishop => self.generate_sliding_moves(board, at, &DIAGONALS, &mut moves),
            PieceType::Rook => self.generate_sliding_moves(board, at, &ORTHOGONALS, &mut moves),
            PieceType::Queen => {
                self.generate_sliding_moves(board, at, &DIAGONALS, &mut moves);
                self.generate_sliding_moves(board, at, &ORTHOGONALS, &mut moves);
            }
        }
        moves
    }

    /// True if `target` is empty or held by the other side.
    #[inline]
    fn can_land_on(&self, board: &Board, target: Position) -> bool {
        board.get(target).map_or(true, |p| p.color != self.color)
    }

    fn generate_pawn_moves(&self, board: &Board, from: Position, moves: &mut HashSet<Move>) {
        let dir = self.color.forward();

        // 1. Single push, then double push from the home rank through an empty square
        if let Some(one) = from.offset(dir, 0).filter(|&sq| board.get(sq).is_none()) {
            self.add_pawn_move(from, one, moves);
            if from.row() == self.color.pawn_row() {
                if let Some(two) = from.offset(2 * dir, 0).filter(|&sq| board.get(sq).is_none()) {
                    moves.insert(Move::new(from, two, None));
                }
            }
        }

        // 2. Diagonal captures
        for dc in [-1, 1] {
            if let Some(target) = from.offset(dir, dc) {
                if board.get(target).map_or(false, |p| p.color != self.color) {
                    self.add_pawn_move(from, target, moves);
                }
            }
        }
    }

    /// Plain move, or the four promotion variants when `to` is the far rank.
    fn add_pawn_move(&self, from: Position, to: Position, moves: &mut HashSet<Move>) {
        if to.row() == self.color.promotion_row() {
            for kind in PROMOTION_CHOICES {
                moves.insert(Move::new(from, to, Some(kind)));
            }
        } else {
            moves.insert(Move::new(from, to, None));
        }
    }

    fn generate_step_moves(&self, board: &Board, from: Position, targets: &[Position], moves: &mut HashSet<Move>) {
        for &to in targets {
            if self.can_land_on(board, to) {
                moves.insert(Move::new(from, to, None));
            }
        }
    }

    fn generate_sliding_moves(&self, board: &Board, from: Position, directions: &[(i32, i32)], moves: &mut HashSet<Move>) {
        for &(dr, dc) in directions {
            let mut current = from;
            while let Some(next) = current.offset(dr, dc) {
                match board.get(next) {
                    None => {
                        moves.insert(Move::new(from, next, None));
                    }
                    Some(occupant) => {
                        if occupant.color != self.color {
                            moves.insert(Move::new(from, next, None));
                        }
                        break; // Stop at the first occupied square
                    }
                }
                current = next;
            }
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: i32, col: i32) -> Position {
        Position::new(row, col).unwrap()
    }

    fn destinations(moves: &HashSet<Move>) -> HashSet<Position> {
        moves.iter().map(|m| m.end()).collect()
    }

    #[test]
    fn knight_in_corner_has_two_moves() {
        let board = Board::new();
        let knight = Piece::new(Color::White, PieceType::Knight);
        let moves = knight.pseudo_legal_moves(&board, pos(1, 1));
        assert_eq!(destinations(&moves), HashSet::from([pos(3, 2), pos(2, 3)]));
    }

    #[test]
    fn knight_cannot_land_on_own_piece() {
        let mut board = Board::new();
        board.set(pos(3, 2), Some(Piece::new(Color::White, PieceType::Pawn)));
        board.set(pos(2, 3), Some(Piece::new(Color::Black, PieceType::Pawn)));
        let moves = Piece::new(Color::White, PieceType::Knight).pseudo_legal_moves(&board, pos(1, 1));
        assert_eq!(destinations(&moves), HashSet::from([pos(2, 3)]));
    }

    #[test]
    fn rook_ray_stops_at_blockers() {
        let mut board = Board::new();
        board.set(pos(4, 7), Some(Piece::new(Color::Black, PieceType::Knight)));
        board.set(pos(6, 4), Some(Piece::new(Color::White, PieceType::Pawn)));
        let rook = Piece::new(Color::White, PieceType::Rook);
        let moves = destinations(&rook.pseudo_legal_moves(&board, pos(4, 4)));
        // right: 4,5 4,6 4,7(capture) | left: 3 squares | up: 5,4 only | down: 3 squares
        assert_eq!(moves.len(), 3 + 3 + 1 + 3);
        assert!(moves.contains(&pos(4, 7)));
        assert!(!moves.contains(&pos(4, 8)));
        assert!(!moves.contains(&pos(6, 4)));
    }

    #[test]
    fn queen_on_empty_board_covers_27_squares() {
        let board = Board::new();
        let moves = Piece::new(Color::Black, PieceType::Queen).pseudo_legal_moves(&board, pos(4, 4));
        assert_eq!(moves.len(), 27);
    }

    #[test]
    fn bishop_moves_only_diagonally() {
        let board = Board::new();
        let moves = Piece::new(Color::White, PieceType::Bishop).pseudo_legal_moves(&board, pos(1, 3));
        assert_eq!(moves.len(), 7);
        assert!(moves.iter().all(|m| (m.end().row() - 1).abs() == (m.end().col() - 3).abs()));
    }

    #[test]
    fn king_steps_one_square() {
        let board = Board::new();
        let moves = Piece::new(Color::White, PieceType::King).pseudo_legal_moves(&board, pos(1, 5));
        assert_eq!(moves.len(), 5);
    }

    #[test]
    fn pawn_double_push_needs_both_squares_empty() {
        let mut board = Board::new();
        let pawn = Piece::new(Color::White, PieceType::Pawn);
        assert_eq!(destinations(&pawn.pseudo_legal_moves(&board, pos(2, 5))), HashSet::from([pos(3, 5), pos(4, 5)]));

        board.set(pos(4, 5), Some(Piece::new(Color::Black, PieceType::Pawn)));
        assert_eq!(destinations(&pawn.pseudo_legal_moves(&board, pos(2, 5))), HashSet::from([pos(3, 5)]));

        board.set(pos(3, 5), Some(Piece::new(Color::Black, PieceType::Pawn)));
        assert!(pawn.pseudo_legal_moves(&board, pos(2, 5)).is_empty());
    }

    #[test]
    fn black_pawn_moves_down_and_captures_diagonally() {
        let mut board = Board::new();
        board.set(pos(6, 3), Some(Piece::new(Color::White, PieceType::Knight)));
        board.set(pos(6, 5), Some(Piece::new(Color::Black, PieceType::Knight)));
        let pawn = Piece::new(Color::Black, PieceType::Pawn);
        let moves = destinations(&pawn.pseudo_legal_moves(&board, pos(7, 4)));
        assert_eq!(moves, HashSet::from([pos(6, 4), pos(5, 4), pos(6, 3)]));
    }

    #[test]
    fn pawn_reaching_far_rank_enumerates_promotions() {
        let mut board = Board::new();
        board.set(pos(8, 2), Some(Piece::new(Color::Black, PieceType::Rook)));
        let moves = Piece::new(Color::White, PieceType::Pawn).pseudo_legal_moves(&board, pos(7, 1));
        assert_eq!(moves.len(), 8);
        assert!(moves.iter().all(|m| m.promotion().is_some()));
    }

    #[test]
    fn generation_does_not_touch_the_board() {
        let mut board = Board::new();
        board.reset_to_start();
        let before = board.clone();
        for at in Position::all() {
            if let Some(piece) = board.get(at) {
                piece.pseudo_legal_moves(&board, at);
            }
        }
        assert_eq!(board, before);
    }

    #[test]
    fn symbols_round_trip() {
        let piece = Piece::from_symbol('N').unwrap();
        assert_eq!(piece, Piece::new(Color::White, PieceType::Knight));
        assert_eq!(Piece::new(Color::Black, PieceType::Queen).to_string(), "q");
        assert_eq!(Piece::from_symbol('x'), Err(InvalidArgument::PieceSymbol('x')));
        assert_eq!(PieceType::from_promotion_symbol('k'), None);
    }
}
