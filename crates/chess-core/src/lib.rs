//! Core types for chess.
//!
//! This crate provides the fundamental types used across the chess engine:
//! - [`Piece`] and [`Color`] for piece representation
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Move`] for move representation
//! - FEN parsing and serialization

mod castling_side;
mod color;
mod colored_piece;
mod fen;
mod mov;
mod piece;
mod square;

pub use castling_side::CastlingSide;
pub use color::Color;
pub use colored_piece::ColoredPiece;
pub use fen::{FenError, FenParser};
pub use mov::{Move, MoveFlag};
pub use piece::Piece;
pub use square::{File, Rank, Square};
