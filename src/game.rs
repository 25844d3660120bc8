// src/game.rs
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::board::Board;
use crate::error::{InvalidMove, Result};
use crate::moves::Move;
use crate::piece::{Color, Piece, PieceType};
use crate::position::Position;

const KING_HOME_COL: u8 = 5;
const KINGSIDE_ROOK_COL: u8 = 8;
const QUEENSIDE_ROOK_COL: u8 = 1;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum CastleSide { Kingside, Queenside }

impl CastleSide {
    fn rook_col(&self) -> u8 {
        match self { CastleSide::Kingside => KINGSIDE_ROOK_COL, CastleSide::Queenside => QUEENSIDE_ROOK_COL }
    }

    fn king_dest_col(&self) -> u8 {
        match self { CastleSide::Kingside => 7, CastleSide::Queenside => 3 }
    }

    /// The rook lands next to the king, on the square the king crossed.
    fn rook_dest_col(&self) -> u8 {
        match self { CastleSide::Kingside => 6, CastleSide::Queenside => 4 }
    }

    /// Columns strictly between king and rook; all must be empty.
    fn between_cols(&self) -> &'static [u8] {
        match self { CastleSide::Kingside => &[6, 7], CastleSide::Queenside => &[2, 3, 4] }
    }

    /// Columns the king passes through or lands on; none may be attacked.
    fn crossed_cols(&self) -> [u8; 2] {
        match self { CastleSide::Kingside => [6, 7], CastleSide::Queenside => [4, 3] }
    }

    fn from_king_dest(col: i32) -> Option<Self> {
        match col {
            7 => Some(CastleSide::Kingside),
            3 => Some(CastleSide::Queenside),
            _ => None,
        }
    }

    /// Which home-rook square `pos` is for `color`, if any.
    fn of_rook_home(color: Color, pos: Position) -> Option<Self> {
        if pos.row() != color.home_row() {
            return None;
        }
        match pos.col() as u8 {
            KINGSIDE_ROOK_COL => Some(CastleSide::Kingside),
            QUEENSIDE_ROOK_COL => Some(CastleSide::Queenside),
            _ => None,
        }
    }
}

fn home_square(color: Color, col: u8) -> Position {
    Position::at(color.home_row() as u8, col)
}

/// "Has moved or been captured" flags. Monotone: once set, never cleared.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    white_king_moved: bool, white_kingside_rook_moved: bool, white_queenside_rook_moved: bool,
    black_king_moved: bool, black_kingside_rook_moved: bool, black_queenside_rook_moved: bool,
}

impl CastlingRights {
    pub fn king_moved(&self, color: Color) -> bool {
        match color { Color::White => self.white_king_moved, Color::Black => self.black_king_moved }
    }

    pub fn kingside_rook_moved(&self, color: Color) -> bool {
        match color { Color::White => self.white_kingside_rook_moved, Color::Black => self.black_kingside_rook_moved }
    }

    pub fn queenside_rook_moved(&self, color: Color) -> bool {
        match color { Color::White => self.white_queenside_rook_moved, Color::Black => self.black_queenside_rook_moved }
    }

    fn rook_moved(&self, color: Color, side: CastleSide) -> bool {
        match side {
            CastleSide::Kingside => self.kingside_rook_moved(color),
            CastleSide::Queenside => self.queenside_rook_moved(color),
        }
    }

    fn mark_king(&mut self, color: Color) {
        match color {
            Color::White => self.white_king_moved = true,
            Color::Black => self.black_king_moved = true,
        }
    }

    fn mark_rook(&mut self, color: Color, side: CastleSide) {
        match (color, side) {
            (Color::White, CastleSide::Kingside) => self.white_kingside_rook_moved = true,
            (Color::White, CastleSide::Queenside) => self.white_queenside_rook_moved = true,
            (Color::Black, CastleSide::Kingside) => self.black_kingside_rook_moved = true,
            (Color::Black, CastleSide::Queenside) => self.black_queenside_rook_moved = true,
        }
    }
}

/// A game in progress: board, side to move, and the history-derived state
/// (castling rights, en passant target) that move legality depends on.
///
/// Equality and hashing cover the board and side to move only, so a
/// simulation clone compares equal to its original.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    turn: Color,
    resigned: Option<Color>,
    en_passant_target: Option<Position>,
    castling_rights: CastlingRights,
}

impl Game {
    /// Standard starting position, WHITE to move.
    pub fn new() -> Self {
        Game::from_board(Board::starting(), Color::White)
    }

    /// A game over an externally supplied position. Castling rights start clear
    /// and there is no en passant target.
    pub fn from_board(board: Board, turn: Color) -> Self {
        Game {
            board,
            turn,
            resigned: None,
            en_passant_target: None,
            castling_rights: CastlingRights::default(),
        }
    }

    pub fn board(&self) -> &Board { &self.board }

    pub fn board_mut(&mut self) -> &mut Board { &mut self.board }

    pub fn set_board(&mut self, board: Board) { self.board = board; }

    pub fn turn(&self) -> Color { self.turn }

    pub fn set_turn(&mut self, turn: Color) { self.turn = turn; }

    /// The color that resigned, if any.
    pub fn resigned(&self) -> Option<Color> { self.resigned }

    pub fn en_passant_target(&self) -> Option<Position> { self.en_passant_target }

    pub fn castling_rights(&self) -> CastlingRights { self.castling_rights }

    /// Ends the game. The flag is never cleared; a second resignation keeps the first.
    pub fn resign(&mut self, color: Color) {
        if self.resigned.is_none() {
            self.resigned = Some(color);
        }
    }

    // --- Legality ---

    /// Legal moves for the piece on `at`, or `None` if the square is empty.
    /// A piece that cannot move yields `Some` of an empty set.
    pub fn valid_moves(&self, at: Position) -> Option<HashSet<Move>> {
        let piece = self.board.get(at)?;
        let mut candidates = piece.pseudo_legal_moves(&self.board, at);
        self.add_castling_candidates(piece, at, &mut candidates);
        self.add_en_passant_candidate(piece, at, &mut candidates);

        // Keep only moves that leave the mover's king safe after full application
        candidates.retain(|mv| {
            let mut sim = self.clone();
            sim.apply_unchecked(mv);
            !sim.is_in_check(piece.color())
        });
        Some(candidates)
    }

    /// Every legal move of the side to move.
    pub fn legal_moves(&self) -> HashSet<Move> {
        self.legal_moves_for(self.turn)
    }

    fn legal_moves_for(&self, color: Color) -> HashSet<Move> {
        self.board
            .pieces()
            .filter(|(_, piece)| piece.color() == color)
            .filter_map(|(at, _)| self.valid_moves(at))
            .flatten()
            .collect()
    }

    fn has_any_legal_move(&self, color: Color) -> bool {
        self.board
            .pieces()
            .filter(|(_, piece)| piece.color() == color)
            .any(|(at, _)| self.valid_moves(at).map_or(false, |moves| !moves.is_empty()))
    }

    /// Validates `mv` completely, then applies it and passes the turn.
    /// On error the game is unchanged.
    pub fn make_move(&mut self, mv: &Move) -> Result<()> {
        if self.resigned.is_some() {
            return Err(InvalidMove::GameResigned.into());
        }
        let piece = self.board.get(mv.start()).ok_or(InvalidMove::NoPieceAt(mv.start()))?;
        if piece.color() != self.turn {
            return Err(InvalidMove::NotYourTurn.into());
        }
        let legal = self.valid_moves(mv.start()).unwrap_or_default();
        if !legal.contains(mv) {
            return Err(InvalidMove::IllegalMove(*mv).into());
        }

        self.apply_unchecked(mv);
        self.turn = self.turn.opponent();
        Ok(())
    }

    // --- Check / termination ---

    /// True if any enemy piece attacks `color`'s king. A board without that king is never in check.
    pub fn is_in_check(&self, color: Color) -> bool {
        match self.board.find_first(Piece::new(color, PieceType::King)) {
            Some(king_sq) => is_attacked(&self.board, king_sq, color.opponent()),
            None => false,
        }
    }

    pub fn is_in_checkmate(&self, color: Color) -> bool {
        self.is_in_check(color) && !self.has_any_legal_move(color)
    }

    /// Only the side to move can be stalemated.
    pub fn is_in_stalemate(&self, color: Color) -> bool {
        self.turn == color && !self.is_in_check(color) && !self.has_any_legal_move(color)
    }

    // --- Special move candidates ---

    fn add_castling_candidates(&self, piece: Piece, at: Position, out: &mut HashSet<Move>) {
        if piece.kind() != PieceType::King {
            return;
        }
        let color = piece.color();
        if at != home_square(color, KING_HOME_COL)
            || self.castling_rights.king_moved(color)
            || self.is_in_check(color)
        {
            return;
        }

        for side in [CastleSide::Kingside, CastleSide::Queenside] {
            let rook_present = self.board.get(home_square(color, side.rook_col()))
                == Some(Piece::new(color, PieceType::Rook));
            if !rook_present || self.castling_rights.rook_moved(color, side) {
                continue;
            }
            let path_clear = side.between_cols().iter()
                .all(|&col| self.board.get(home_square(color, col)).is_none());
            if !path_clear {
                continue;
            }
            let path_safe = side.crossed_cols().iter()
                .all(|&col| !self.king_attacked_on(color, at, home_square(color, col)));
            if path_safe {
                out.insert(Move::new(at, home_square(color, side.king_dest_col()), None));
            }
        }
    }

    /// Would the king standing on `to` (instead of `from`) be attacked?
    fn king_attacked_on(&self, color: Color, from: Position, to: Position) -> bool {
        let mut board = self.board.clone();
        let king = board.set(from, None);
        board.set(to, king);
        is_attacked(&board, to, color.opponent())
    }

    fn add_en_passant_candidate(&self, piece: Piece, at: Position, out: &mut HashSet<Move>) {
        if piece.kind() != PieceType::Pawn {
            return;
        }
        let target = match self.en_passant_target {
            Some(target) => target,
            None => return,
        };
        if target.row() != at.row() + piece.color().forward()
            || (target.col() - at.col()).abs() != 1
            || self.board.get(target).is_some()
        {
            return;
        }
        let victim = self.board.get(Position::at(at.row() as u8, target.col() as u8));
        if victim == Some(Piece::new(piece.color().opponent(), PieceType::Pawn)) {
            out.insert(Move::new(at, target, None));
        }
    }

    // --- Application ---

    /// Applies `mv` with every side effect (en passant removal, castling rook,
    /// promotion, rights, en passant target) but no legality checks and no turn change.
    fn apply_unchecked(&mut self, mv: &Move) {
        let moving = match self.board.get(mv.start()) {
            Some(piece) => piece,
            None => {
                eprintln!("WARN (apply): no piece at {} for move {}", mv.start(), mv);
                return;
            }
        };
        let color = moving.color();
        let captured_at_end = self.board.get(mv.end());
        let (dr, dc) = mv.delta();

        // 1. En passant: the victim sits beside the destination, on the mover's rank
        let is_en_passant = moving.kind() == PieceType::Pawn
            && self.en_passant_target == Some(mv.end())
            && captured_at_end.is_none()
            && dc.abs() == 1;
        if is_en_passant {
            let victim_sq = Position::at(mv.start().row() as u8, mv.end().col() as u8);
            if self.board.set(victim_sq, None).is_none() {
                eprintln!("WARN (apply): en passant {} found no pawn at {}", mv, victim_sq);
            }
        }

        // 2. Castling relocates the rook as well; 3. otherwise a plain relocation
        let castle_side = if moving.kind() == PieceType::King
            && dr == 0
            && dc.abs() == 2
            && mv.start().row() == color.home_row()
        {
            CastleSide::from_king_dest(mv.end().col())
        } else {
            None
        };
        match castle_side {
            Some(side) => {
                self.board.set(mv.start(), None);
                self.board.set(mv.end(), Some(moving));
                let rook = self.board.set(home_square(color, side.rook_col()), None);
                if rook.is_none() {
                    eprintln!("WARN (apply): castle {} found no rook on column {}", mv, side.rook_col());
                }
                self.board.set(home_square(color, side.rook_dest_col()), rook);
            }
            None => {
                self.board.apply_move(mv);
            }
        }

        // 4. Castling rights
        match moving.kind() {
            PieceType::King => {
                self.castling_rights.mark_king(color);
                if let Some(side) = castle_side {
                    self.castling_rights.mark_rook(color, side);
                }
            }
            PieceType::Rook => {
                if let Some(side) = CastleSide::of_rook_home(color, mv.start()) {
                    self.castling_rights.mark_rook(color, side);
                }
            }
            _ => {}
        }
        if let Some(captured) = captured_at_end.filter(|p| p.kind() == PieceType::Rook) {
            if let Some(side) = CastleSide::of_rook_home(captured.color(), mv.end()) {
                self.castling_rights.mark_rook(captured.color(), side);
            }
        }

        // 5. A double push leaves the skipped square as the next en passant target
        self.en_passant_target = if moving.kind() == PieceType::Pawn && dc == 0 && dr.abs() == 2 {
            mv.start().offset(dr / 2, 0)
        } else {
            None
        };
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

impl PartialEq for Game {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board && self.turn == other.turn
    }
}

impl Eq for Game {}

impl Hash for Game {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.board.hash(state);
        self.turn.hash(state);
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)?;
        match self.resigned {
            Some(color) => writeln!(f, "{} resigned", color),
            None => writeln!(f, "Turn: {}", self.turn),
        }
    }
}

/// True if any piece of `attacker` has a pseudo-legal move landing on `target`.
fn is_attacked(board: &Board, target: Position, attacker: Color) -> bool {
    board
        .pieces()
        .filter(|(_, piece)| piece.color() == attacker)
        .any(|(at, piece)| piece.pseudo_legal_moves(board, at).iter().any(|mv| mv.end() == target))
}
