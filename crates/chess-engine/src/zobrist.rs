//! Zobrist hashing for position identification.
//!
//! Zobrist hashing creates a unique hash for each chess position by XORing
//! random numbers associated with:
//! - Each piece on each square (12 pieces × 64 squares)
//! - Side to move
//! - The rook source square backing each color's castling rights
//! - En passant file
//!
//! This allows efficient incremental updates when making moves: [`crate::movegen::make_move`]
//! toggles exactly the keys touched by a move rather than recomputing the
//! whole hash.

use chess_core::{CastlingSide, Color, Piece, Square};

/// Sentinel index used by [`ZobristKeys::rook_source`] when a castling right
/// has been lost (`rookSource` is `None`).
const NO_ROOK_SOURCE: usize = 64;

/// Zobrist hash keys.
///
/// Generated using a fixed seed for reproducibility.
pub struct ZobristKeys {
    /// Keys for pieces: `[piece][color][square]`.
    pub pieces: [[[u64; 64]; 2]; 6],
    /// Key XORed in when the given color is to move.
    pub side_to_move: [u64; 2],
    /// Keys for the rook backing a color's castling right: `[color][side][square or NO_ROOK_SOURCE]`.
    pub rook_source: [[[u64; 65]; 2]; 2],
    /// Keys for en passant file.
    pub en_passant: [u64; 8],
}

impl ZobristKeys {
    /// Initializes Zobrist keys using a simple PRNG.
    ///
    /// Uses a fixed seed for reproducibility across runs.
    pub const fn new() -> Self {
        // Simple xorshift64 PRNG for const initialization
        const fn next_random(state: u64) -> (u64, u64) {
            let mut x = state;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            (x, x)
        }

        let mut state = 0x9E3779B97F4A7C15u64; // Golden ratio seed
        let mut pieces = [[[0u64; 64]; 2]; 6];
        let mut side_to_move = [0u64; 2];
        let mut rook_source = [[[0u64; 65]; 2]; 2];
        let mut en_passant = [0u64; 8];

        // Initialize piece keys
        let mut piece = 0;
        while piece < 6 {
            let mut color = 0;
            while color < 2 {
                let mut square = 0;
                while square < 64 {
                    let (new_state, value) = next_random(state);
                    state = new_state;
                    pieces[piece][color][square] = value;
                    square += 1;
                }
                color += 1;
            }
            piece += 1;
        }

        // Initialize side-to-move keys
        let mut color = 0;
        while color < 2 {
            let (new_state, value) = next_random(state);
            state = new_state;
            side_to_move[color] = value;
            color += 1;
        }

        // Initialize rook-source keys, including the "no rook" sentinel slot
        let mut color = 0;
        while color < 2 {
            let mut side = 0;
            while side < 2 {
                let mut square = 0;
                while square <= NO_ROOK_SOURCE {
                    let (new_state, value) = next_random(state);
                    state = new_state;
                    rook_source[color][side][square] = value;
                    square += 1;
                }
                side += 1;
            }
            color += 1;
        }

        // Initialize en passant keys
        let mut i = 0;
        while i < 8 {
            let (new_state, value) = next_random(state);
            state = new_state;
            en_passant[i] = value;
            i += 1;
        }

        ZobristKeys {
            pieces,
            side_to_move,
            rook_source,
            en_passant,
        }
    }

    /// Returns the key for a piece on a square.
    #[inline]
    pub const fn piece_key(&self, piece: Piece, color: Color, square: Square) -> u64 {
        self.pieces[piece.index()][color.index()][square.index() as usize]
    }

    /// Returns the key for the given color being to move.
    #[inline]
    pub const fn side_to_move_key(&self, color: Color) -> u64 {
        self.side_to_move[color.index()]
    }

    /// Returns the key for a castling right, given the rook's source square
    /// (or `None` if that right has been lost).
    #[inline]
    pub fn rook_source_key(&self, color: Color, side: CastlingSide, square: Option<Square>) -> u64 {
        let idx = square.map(|s| s.index() as usize).unwrap_or(NO_ROOK_SOURCE);
        self.rook_source[color.index()][side.index()][idx]
    }

    /// Returns the key for an en passant file (0-7).
    #[inline]
    pub const fn en_passant_key(&self, file: usize) -> u64 {
        self.en_passant[file]
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

/// Global Zobrist keys (initialized at compile time).
pub static ZOBRIST: ZobristKeys = ZobristKeys::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zobrist_keys_are_nonzero() {
        assert_ne!(ZOBRIST.side_to_move[0], 0);
        assert_ne!(ZOBRIST.pieces[0][0][0], 0);
        assert_ne!(ZOBRIST.rook_source[0][0][0], 0);
    }

    #[test]
    fn zobrist_keys_are_unique() {
        let key1 = ZOBRIST.piece_key(Piece::Pawn, Color::White, Square::A1);
        let key2 = ZOBRIST.piece_key(Piece::Pawn, Color::White, Square::B1);
        let key3 = ZOBRIST.piece_key(Piece::Pawn, Color::Black, Square::A1);
        let key4 = ZOBRIST.piece_key(Piece::Knight, Color::White, Square::A1);

        assert_ne!(key1, key2);
        assert_ne!(key1, key3);
        assert_ne!(key1, key4);
    }

    #[test]
    fn rook_source_none_differs_from_any_square() {
        let none_key = ZOBRIST.rook_source_key(Color::White, CastlingSide::Kingside, None);
        let h1_key = ZOBRIST.rook_source_key(Color::White, CastlingSide::Kingside, Some(Square::H1));
        assert_ne!(none_key, h1_key);
    }

    #[test]
    fn rook_source_keys_differ_by_side_and_color() {
        let wk = ZOBRIST.rook_source_key(Color::White, CastlingSide::Kingside, Some(Square::H1));
        let wq = ZOBRIST.rook_source_key(Color::White, CastlingSide::Queenside, Some(Square::H1));
        let bk = ZOBRIST.rook_source_key(Color::Black, CastlingSide::Kingside, Some(Square::H1));
        assert_ne!(wk, wq);
        assert_ne!(wk, bk);
    }
}
