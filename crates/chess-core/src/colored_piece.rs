//! A piece paired with the color that owns it.

use crate::{Color, Piece};
use std::fmt;

/// A [`Piece`] paired with its [`Color`], or the absence of a piece.
///
/// Notation is the piece's lowercase FEN letter, uppercased for white.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColoredPiece {
    None,
    Some(Piece, Color),
}

impl ColoredPiece {
    /// Builds a present piece.
    #[inline]
    pub const fn new(piece: Piece, color: Color) -> Self {
        ColoredPiece::Some(piece, color)
    }

    /// True if a piece is present.
    #[inline]
    pub const fn is_some(self) -> bool {
        matches!(self, ColoredPiece::Some(_, _))
    }

    /// The piece type, if present.
    #[inline]
    pub const fn piece(self) -> Option<Piece> {
        match self {
            ColoredPiece::Some(p, _) => Some(p),
            ColoredPiece::None => None,
        }
    }

    /// The color, if a piece is present.
    #[inline]
    pub const fn color(self) -> Option<Color> {
        match self {
            ColoredPiece::Some(_, c) => Some(c),
            ColoredPiece::None => None,
        }
    }

    /// The FEN character: uppercase for white, lowercase for black, `.` for empty.
    pub const fn to_fen_char(self) -> char {
        match self {
            ColoredPiece::Some(p, c) => p.to_fen_char(c),
            ColoredPiece::None => '.',
        }
    }

    /// Parses a FEN piece letter into a `ColoredPiece`.
    pub const fn from_fen_char(c: char) -> Option<Self> {
        match Piece::from_fen_char(c) {
            Some((p, color)) => Some(ColoredPiece::Some(p, color)),
            None => None,
        }
    }

    /// The Unicode chess glyph: solid for white, outlined for black.
    pub const fn to_unicode(self) -> char {
        match self {
            ColoredPiece::Some(Piece::Pawn, Color::White) => '♙',
            ColoredPiece::Some(Piece::Knight, Color::White) => '♘',
            ColoredPiece::Some(Piece::Bishop, Color::White) => '♗',
            ColoredPiece::Some(Piece::Rook, Color::White) => '♖',
            ColoredPiece::Some(Piece::Queen, Color::White) => '♕',
            ColoredPiece::Some(Piece::King, Color::White) => '♔',
            ColoredPiece::Some(Piece::Pawn, Color::Black) => '♟',
            ColoredPiece::Some(Piece::Knight, Color::Black) => '♞',
            ColoredPiece::Some(Piece::Bishop, Color::Black) => '♝',
            ColoredPiece::Some(Piece::Rook, Color::Black) => '♜',
            ColoredPiece::Some(Piece::Queen, Color::Black) => '♛',
            ColoredPiece::Some(Piece::King, Color::Black) => '♚',
            ColoredPiece::None => '.',
        }
    }
}

impl fmt::Display for ColoredPiece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_fen_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fen_roundtrip() {
        for piece in Piece::ALL {
            for color in [Color::White, Color::Black] {
                let cp = ColoredPiece::new(piece, color);
                let c = cp.to_fen_char();
                assert_eq!(ColoredPiece::from_fen_char(c), Some(cp));
            }
        }
    }

    #[test]
    fn none_is_not_some() {
        assert!(!ColoredPiece::None.is_some());
        assert_eq!(ColoredPiece::None.piece(), None);
        assert_eq!(ColoredPiece::None.to_fen_char(), '.');
    }

    #[test]
    fn case_by_color() {
        let white_king = ColoredPiece::new(Piece::King, Color::White);
        let black_king = ColoredPiece::new(Piece::King, Color::Black);
        assert_eq!(white_king.to_fen_char(), 'K');
        assert_eq!(black_king.to_fen_char(), 'k');
    }
}
