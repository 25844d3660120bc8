// src/notation.rs
//! Coordinate notation: squares as `e4`, moves as `e2e4` / `e7e8q`,
//! boards as the 8-line diagram printed by `Board`'s `Display`.
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;

use crate::board::Board;
use crate::error::{ChessError, InvalidArgument};
use crate::moves::Move;
use crate::piece::{Piece, PieceType};
use crate::position::Position;

lazy_static! {
    static ref SQUARE_RE: Regex = Regex::new(r"^([a-hA-H])([1-8])$").expect("square pattern");
    static ref MOVE_RE: Regex = Regex::new(r"^([a-hA-H][1-8])([a-hA-H][1-8])([qrbnQRBN])?$").expect("move pattern");
    static ref DIAGRAM_ROW_RE: Regex = Regex::new(r"^[KQRBNPkqrbnp.]{8}$").expect("diagram row pattern");
}

fn notation_error(input: &str) -> ChessError {
    InvalidArgument::Notation(input.to_string()).into()
}

impl Position {
    /// `e4`-style text: column letter, then row digit.
    pub fn to_algebraic(&self) -> String {
        let file = (b'a' + (self.col() - 1) as u8) as char;
        format!("{}{}", file, self.row())
    }
}

impl FromStr for Position {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let caps = SQUARE_RE.captures(trimmed).ok_or_else(|| notation_error(trimmed))?;
        let file = caps[1].to_ascii_lowercase().as_bytes()[0];
        let col = (file - b'a') as i32 + 1;
        let row = caps[2].parse::<i32>().map_err(|_| notation_error(trimmed))?;
        Position::new(row, col)
    }
}

impl Move {
    /// Compact text such as `e2e4` or `a7a8q`.
    pub fn to_algebraic(&self) -> String {
        let promo = self.promotion().and_then(|kind| kind.promotion_symbol());
        format!(
            "{}{}{}",
            self.start().to_algebraic(),
            self.end().to_algebraic(),
            promo.map_or(String::new(), |c| c.to_string())
        )
    }
}

impl FromStr for Move {
    type Err = ChessError;

    /// Parses format only; legality is decided by `Game`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let caps = MOVE_RE.captures(trimmed).ok_or_else(|| notation_error(trimmed))?;
        let start: Position = caps[1].parse()?;
        let end: Position = caps[2].parse()?;
        let promotion = match caps.get(3) {
            Some(m) => {
                let c = m.as_str().chars().next().ok_or_else(|| notation_error(trimmed))?;
                Some(PieceType::from_promotion_symbol(c).ok_or_else(|| notation_error(trimmed))?)
            }
            None => None,
        };
        Ok(Move::new(start, end, promotion))
    }
}

impl Board {
    /// Parses eight rows of eight symbols, row 8 first, `.` for empty.
    /// Blank lines and surrounding whitespace are ignored.
    pub fn from_diagram(text: &str) -> Result<Self, ChessError> {
        let rows: Vec<&str> = text.lines().map(str::trim).filter(|line| !line.is_empty()).collect();
        if rows.len() != 8 {
            return Err(notation_error(text));
        }
        let mut board = Board::new();
        for (i, line) in rows.iter().enumerate() {
            if !DIAGRAM_ROW_RE.is_match(line) {
                return Err(notation_error(line));
            }
            let row = 8 - i as i32;
            for (j, c) in line.chars().enumerate() {
                if c == '.' {
                    continue;
                }
                let piece = Piece::from_symbol(c)?;
                board.set(Position::new(row, j as i32 + 1)?, Some(piece));
            }
        }
        Ok(board)
    }
}

impl FromStr for Board {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::from_diagram(s)
    }
}
