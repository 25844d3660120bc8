// src/lib.rs
//! Chess rules engine: legal move generation, move application with
//! castling / en passant / promotion, and check, checkmate and stalemate detection.
pub mod board;
pub mod error;
pub mod game;
pub mod moves;
pub mod notation;
pub mod piece;
pub mod position;

pub use board::Board;
pub use error::{ChessError, InvalidArgument, InvalidMove, Result};
pub use game::{CastlingRights, Game};
pub use moves::Move;
pub use piece::{Color, Piece, PieceType};
pub use position::Position;
