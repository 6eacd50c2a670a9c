//! Chess position representation.

use chess_core::{CastlingSide, Color, FenError, FenParser, File, Piece, Rank, Square};

use crate::zobrist::ZOBRIST;
use crate::Bitboard;

/// The classical castling target square for the king, independent of where
/// the rook started: kingside always lands on g, queenside on c.
#[inline]
pub const fn castle_king_target(color: Color, side: CastlingSide) -> Square {
    let file = match side {
        CastlingSide::Kingside => File::G,
        CastlingSide::Queenside => File::C,
    };
    let rank = match Rank::from_index(color.back_rank()) {
        Some(r) => r,
        None => unreachable!(),
    };
    Square::new(file, rank)
}

/// The classical castling target square for the rook: kingside f, queenside d.
#[inline]
pub const fn castle_rook_target(color: Color, side: CastlingSide) -> Square {
    let file = match side {
        CastlingSide::Kingside => File::F,
        CastlingSide::Queenside => File::D,
    };
    let rank = match Rank::from_index(color.back_rank()) {
        Some(r) => r,
        None => unreachable!(),
    };
    Square::new(file, rank)
}

/// Complete chess position state.
///
/// Castling rights are tracked as `rookSource[color][side]`: the square the
/// castling rook currently occupies, or `None` if that right has been lost.
/// This is the Chess960/Shredder-FEN convention — the classical `KQkq`
/// letters are just the special case where the rook sits on the a/h file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Bitboards for each piece type, indexed by Piece enum.
    pub pieces: [Bitboard; 6],

    /// Bitboards for each color's pieces.
    pub colors: [Bitboard; 2],

    /// The side to move.
    pub side_to_move: Color,

    /// Rook source squares backing castling rights, indexed `[color][side]`.
    pub rook_source: [[Option<Square>; 2]; 2],

    /// En passant target square (if any).
    pub en_passant: Option<Square>,

    /// Halfmove clock for 50-move rule.
    pub halfmove_clock: u32,

    /// Fullmove number (starts at 1, increments after Black's move).
    pub fullmove_number: u32,

    /// Zobrist hash of this position, maintained incrementally by
    /// [`crate::movegen::make_move`].
    pub zobrist_key: u64,

    /// Hash of the pawn structure only (pawn placement and color to move),
    /// maintained incrementally by [`crate::movegen::make_move`]. Used by
    /// pawn-structure evaluation caches that would otherwise be invalidated
    /// by every piece move.
    pub pawn_key: u64,
}

impl Position {
    /// Creates an empty position.
    pub fn empty() -> Self {
        let mut position = Position {
            pieces: [Bitboard::EMPTY; 6],
            colors: [Bitboard::EMPTY; 2],
            side_to_move: Color::White,
            rook_source: [[None; 2]; 2],
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            zobrist_key: 0,
            pawn_key: 0,
        };
        position.zobrist_key = position.recompute_zobrist();
        position.pawn_key = position.recompute_pawn_key();
        position
    }

    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        Self::from_fen(FenParser::STARTPOS).expect("STARTPOS is valid")
    }

    /// Returns the rook source for a castling right.
    #[inline]
    pub fn rook_source(&self, color: Color, side: CastlingSide) -> Option<Square> {
        self.rook_source[color.index()][side.index()]
    }

    /// Returns true if the given color still has the given castling right.
    #[inline]
    pub fn can_castle(&self, color: Color, side: CastlingSide) -> bool {
        self.rook_source(color, side).is_some()
    }

    /// True if this position uses non-classical castling geometry: a king
    /// off the e-file with rights, or a rook source off the a/h file.
    pub fn is_chess960(&self) -> bool {
        for color in [Color::White, Color::Black] {
            let has_rights = CastlingSide::ALL
                .iter()
                .any(|&side| self.can_castle(color, side));
            if has_rights {
                if let Some(king_idx) = self.pieces_of(Piece::King, color).lsb() {
                    let king_sq = unsafe { Square::from_index_unchecked(king_idx) };
                    if king_sq.file() != File::E {
                        return true;
                    }
                }
            }
            for side in CastlingSide::ALL {
                if let Some(rook_sq) = self.rook_source(color, side) {
                    if rook_sq.file() != File::A && rook_sq.file() != File::H {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Creates a position from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parsed = FenParser::parse(fen)?;
        let mut position = Position {
            pieces: [Bitboard::EMPTY; 6],
            colors: [Bitboard::EMPTY; 2],
            side_to_move: Color::White,
            rook_source: [[None; 2]; 2],
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            zobrist_key: 0,
            pawn_key: 0,
        };

        // Parse piece placement
        let ranks: Vec<&str> = parsed.piece_placement.split('/').collect();
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx; // FEN starts from rank 8
            let mut file = 0usize;

            for c in rank_str.chars() {
                if let Some(digit) = c.to_digit(10) {
                    file += digit as usize;
                } else if let Some((piece, color)) = Piece::from_fen_char(c) {
                    let sq = unsafe { Square::from_index_unchecked((rank * 8 + file) as u8) };
                    position.pieces[piece.index()].set(sq);
                    position.colors[color.index()].set(sq);
                    file += 1;
                }
            }
        }

        // Active color
        position.side_to_move = match parsed.active_color {
            'w' => Color::White,
            'b' => Color::Black,
            _ => unreachable!("FEN parser validated this"),
        };

        // Castling rights: Shredder-FEN home-rank file letters, or the
        // classical KQkq shorthand for the outermost rook on each side.
        for c in parsed.castling.chars() {
            if c == '-' {
                continue;
            }
            let color = if c.is_ascii_uppercase() {
                Color::White
            } else {
                Color::Black
            };
            let king_sq = position
                .pieces_of(Piece::King, color)
                .lsb()
                .map(|i| unsafe { Square::from_index_unchecked(i) });
            let Some(king_sq) = king_sq else { continue };
            let rank = king_sq.rank();

            let rook_file = match c.to_ascii_uppercase() {
                'K' => Self::outermost_rook_file(&position, color, rank, true),
                'Q' => Self::outermost_rook_file(&position, color, rank, false),
                letter @ 'A'..='H' => File::from_char(letter),
                _ => None,
            };

            if let Some(rook_file) = rook_file {
                let rook_sq = Square::new(rook_file, rank);
                let side = CastlingSide::classify(king_sq.file().index(), rook_file.index());
                position.rook_source[color.index()][side.index()] = Some(rook_sq);
            }
        }

        // En passant
        position.en_passant = if parsed.en_passant == "-" {
            None
        } else {
            Square::from_algebraic(&parsed.en_passant)
        };

        position.halfmove_clock = parsed.halfmove_clock;
        position.fullmove_number = parsed.fullmove_number;
        position.zobrist_key = position.recompute_zobrist();
        position.pawn_key = position.recompute_pawn_key();

        Ok(position)
    }

    /// Finds the outermost rook on the given rank for classical `K`/`Q` FEN letters.
    fn outermost_rook_file(
        position: &Position,
        color: Color,
        rank: Rank,
        kingside: bool,
    ) -> Option<File> {
        let rooks = position.pieces_of(Piece::Rook, color) & Bitboard::rank_mask(rank);
        let files: Vec<File> = rooks.into_iter().map(|sq| sq.file()).collect();
        if kingside {
            files.into_iter().max_by_key(|f| f.index())
        } else {
            files.into_iter().min_by_key(|f| f.index())
        }
    }

    /// Converts the position to a FEN string, omitting the en passant
    /// square unless a legal en passant capture is currently available.
    ///
    /// Equivalent to `to_fen_with(false)`.
    pub fn to_fen(&self) -> String {
        self.to_fen_with(false)
    }

    /// Converts the position to a FEN string.
    ///
    /// Castling is emitted with classical `KQkq` letters when the position
    /// is not Chess960 (every rook source sits on the a/h file with the
    /// king on the e-file), and Shredder letters otherwise.
    ///
    /// The en passant field is `'-'` unless a legal en passant capture
    /// exists in this position, or `always_show_en_passant` is set and an
    /// en passant target is recorded. A FEN always *parses* the en passant
    /// field whether or not the capture is legal (see [`Position::from_fen`]);
    /// this asymmetry between parsing and emission is intentional.
    pub fn to_fen_with(&self, always_show_en_passant: bool) -> String {
        let mut fen = String::new();

        // Piece placement
        for rank in (0..8).rev() {
            let mut empty_count = 0;
            for file in 0..8 {
                let sq = unsafe { Square::from_index_unchecked(rank * 8 + file) };
                if let Some((piece, color)) = self.piece_at(sq) {
                    if empty_count > 0 {
                        fen.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    fen.push(piece.to_fen_char(color));
                } else {
                    empty_count += 1;
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        // Active color
        fen.push(' ');
        fen.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        // Castling
        fen.push(' ');
        let shredder = self.is_chess960();
        let mut castling = String::new();
        for color in [Color::White, Color::Black] {
            for side in CastlingSide::ALL {
                if let Some(rook_sq) = self.rook_source(color, side) {
                    let letter = if shredder {
                        rook_sq.file().to_char()
                    } else {
                        match side {
                            CastlingSide::Kingside => 'k',
                            CastlingSide::Queenside => 'q',
                        }
                    };
                    castling.push(if color == Color::White {
                        letter.to_ascii_uppercase()
                    } else {
                        letter
                    });
                }
            }
        }
        if castling.is_empty() {
            fen.push('-');
        } else {
            fen.push_str(&castling);
        }

        // En passant
        fen.push(' ');
        let show_en_passant = self.en_passant.is_some()
            && (always_show_en_passant || crate::movegen::en_passant_capture_exists(self));
        match self.en_passant {
            Some(sq) if show_en_passant => fen.push_str(&sq.to_algebraic()),
            _ => fen.push('-'),
        }

        // Halfmove clock and fullmove number
        fen.push(' ');
        fen.push_str(&self.halfmove_clock.to_string());
        fen.push(' ');
        fen.push_str(&self.fullmove_number.to_string());

        fen
    }

    /// Returns the piece and color at the given square, if any.
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        let bb = Bitboard::from_square(sq);

        // Check if any piece is on this square
        let color = if (self.colors[Color::White.index()] & bb).is_not_empty() {
            Color::White
        } else if (self.colors[Color::Black.index()] & bb).is_not_empty() {
            Color::Black
        } else {
            return None;
        };

        // Find which piece type
        for piece in Piece::ALL {
            if (self.pieces[piece.index()] & bb).is_not_empty() {
                return Some((piece, color));
            }
        }

        None
    }

    /// Returns a bitboard of all occupied squares.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.colors[0] | self.colors[1]
    }

    /// Returns a bitboard of all empty squares.
    #[inline]
    pub fn empty_squares(&self) -> Bitboard {
        !self.occupied()
    }

    /// Returns a bitboard of pieces of the given type and color.
    #[inline]
    pub fn pieces_of(&self, piece: Piece, color: Color) -> Bitboard {
        self.pieces[piece.index()] & self.colors[color.index()]
    }

    /// Returns the incrementally-maintained Zobrist hash of this position.
    #[inline]
    pub fn zobrist_hash(&self) -> u64 {
        self.zobrist_key
    }

    /// Returns the incrementally-maintained pawn-structure hash.
    ///
    /// Unlike [`Position::zobrist_hash`], this depends only on pawn
    /// placement and color: two positions with identical pawn bitboards
    /// share a pawn key regardless of side to move, castling rights, or en
    /// passant square.
    #[inline]
    pub fn pawn_hash(&self) -> u64 {
        self.pawn_key
    }

    /// Recomputes the pawn-structure hash from scratch.
    pub fn recompute_pawn_key(&self) -> u64 {
        let mut key = 0u64;
        for color in [Color::White, Color::Black] {
            for sq in self.pieces_of(Piece::Pawn, color) {
                key ^= ZOBRIST.piece_key(Piece::Pawn, color, sq);
            }
        }
        key
    }

    /// Recomputes the Zobrist hash from scratch. Used at construction time
    /// and to cross-check the incremental updates applied by `make_move`.
    pub fn recompute_zobrist(&self) -> u64 {
        let mut key = 0u64;

        for piece in Piece::ALL {
            for color in [Color::White, Color::Black] {
                for sq in self.pieces_of(piece, color) {
                    key ^= ZOBRIST.piece_key(piece, color, sq);
                }
            }
        }

        key ^= ZOBRIST.side_to_move_key(self.side_to_move);

        for color in [Color::White, Color::Black] {
            for side in CastlingSide::ALL {
                key ^= ZOBRIST.rook_source_key(color, side, self.rook_source(color, side));
            }
        }

        if let Some(ep) = self.en_passant {
            key ^= ZOBRIST.en_passant_key(ep.file().index() as usize);
        }

        key
    }

    /// Flips the position top-to-bottom and swaps colors: the position white
    /// stands in after `mirror_vertically` is the position black stood in
    /// before it, with side to move flipped.
    pub fn mirror_vertically(&self) -> Self {
        let mut mirrored = Position {
            pieces: [Bitboard::EMPTY; 6],
            colors: [Bitboard::EMPTY; 2],
            side_to_move: self.side_to_move.opposite(),
            rook_source: [[None; 2]; 2],
            en_passant: self.en_passant.map(Square::mirror_vertically),
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            zobrist_key: 0,
            pawn_key: 0,
        };

        for piece in Piece::ALL {
            mirrored.pieces[piece.index()] = self.pieces[piece.index()].mirror_vertically();
        }
        mirrored.colors[Color::White.index()] =
            self.colors[Color::Black.index()].mirror_vertically();
        mirrored.colors[Color::Black.index()] =
            self.colors[Color::White.index()].mirror_vertically();

        for color in [Color::White, Color::Black] {
            for side in CastlingSide::ALL {
                mirrored.rook_source[color.opposite().index()][side.index()] =
                    self.rook_source(color, side).map(Square::mirror_vertically);
            }
        }

        mirrored.zobrist_key = mirrored.recompute_zobrist();
        mirrored.pawn_key = mirrored.recompute_pawn_key();
        mirrored
    }

    /// Flips the position left-to-right. Queenside and kingside castling
    /// rights swap per color; colors are unaffected.
    pub fn mirror_horizontally(&self) -> Self {
        let mut mirrored = Position {
            pieces: [Bitboard::EMPTY; 6],
            colors: [Bitboard::EMPTY; 2],
            side_to_move: self.side_to_move,
            rook_source: [[None; 2]; 2],
            en_passant: self.en_passant.map(Square::mirror_horizontally),
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            zobrist_key: 0,
            pawn_key: 0,
        };

        for piece in Piece::ALL {
            mirrored.pieces[piece.index()] = self.pieces[piece.index()].mirror_horizontally();
        }
        for color in [Color::White, Color::Black] {
            mirrored.colors[color.index()] = self.colors[color.index()].mirror_horizontally();
        }

        for color in [Color::White, Color::Black] {
            for side in CastlingSide::ALL {
                let opposite_side = match side {
                    CastlingSide::Kingside => CastlingSide::Queenside,
                    CastlingSide::Queenside => CastlingSide::Kingside,
                };
                mirrored.rook_source[color.index()][opposite_side.index()] =
                    self.rook_source(color, side).map(Square::mirror_horizontally);
            }
        }

        mirrored.zobrist_key = mirrored.recompute_zobrist();
        mirrored.pawn_key = mirrored.recompute_pawn_key();
        mirrored
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}
