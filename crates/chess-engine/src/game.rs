//! Full game management with history tracking.
//!
//! The [`Game`] struct provides complete game state management including:
//! - Position history for repetition detection
//! - Move history with SAN notation
//! - All FIDE draw conditions
//! - Draw claiming

use crate::movegen::{generate_moves, is_king_attacked, make_move, make_null_move};
use crate::rules::{DrawReason, GameResult, RuleSet, StandardChess};
use crate::san::{move_to_san, san_to_move, SanError};
use crate::{MoveList, Position};
use chess_core::Move;
use std::fmt;

/// Two positions are repetition-equal iff their piece placement, castling
/// rights, side to move, and en passant target all match. Halfmove/fullmove
/// counters and the Zobrist keys themselves are ignored.
fn repetition_equal(a: &Position, b: &Position) -> bool {
    a.pieces == b.pieces
        && a.colors == b.colors
        && a.rook_source == b.rook_source
        && a.side_to_move == b.side_to_move
        && a.en_passant == b.en_passant
}

/// A recorded move in game history.
#[derive(Debug, Clone)]
pub struct GameMove {
    /// The move in internal format.
    pub mov: Move,
    /// SAN notation for the move.
    pub san: String,
    /// Zobrist hash of the position before the move.
    pub hash_before: u64,
}

/// Error type for game operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The move is not legal in the current position.
    IllegalMove(String),
    /// The SAN string could not be parsed.
    InvalidSan(SanError),
    /// The game has already ended.
    GameAlreadyOver,
    /// Cannot claim draw (conditions not met).
    CannotClaimDraw,
    /// A repetition/rule query used an index outside the recorded history.
    IndexOutOfRange(isize),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::IllegalMove(s) => write!(f, "illegal move: {}", s),
            GameError::InvalidSan(e) => write!(f, "invalid SAN: {}", e),
            GameError::GameAlreadyOver => write!(f, "game has already ended"),
            GameError::CannotClaimDraw => write!(f, "cannot claim draw: conditions not met"),
            GameError::IndexOutOfRange(i) => write!(f, "index out of range: {}", i),
        }
    }
}

impl std::error::Error for GameError {}

impl From<SanError> for GameError {
    fn from(e: SanError) -> Self {
        GameError::InvalidSan(e)
    }
}

/// A complete chess game with history tracking.
///
/// Unlike [`Position`], which represents a single board state, `Game` tracks
/// the full game history needed for repetition detection and provides
/// methods for all FIDE draw conditions.
#[derive(Debug, Clone)]
pub struct Game {
    /// Current position.
    position: Position,
    /// Every position in the game, starting with the start position.
    /// `positions[i]` is the position before `moves[i]` is played.
    positions: Vec<Position>,
    /// Move history with SAN notation.
    moves: Vec<GameMove>,
    /// Starting position.
    start_pos: Position,
    /// Game result if the game has ended.
    result: Option<GameResult>,
    /// Whether a draw has been claimed.
    draw_claimed: bool,
    /// PGN-style headers (Seven Tag Roster plus any extras), insertion order.
    headers: Vec<(String, String)>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a new game with the standard starting position.
    pub fn new() -> Self {
        Self::from_position(StandardChess.initial_position())
    }

    /// Returns the default Seven Tag Roster header values.
    fn default_headers() -> Vec<(String, String)> {
        vec![
            ("Event".to_string(), "?".to_string()),
            ("Site".to_string(), "?".to_string()),
            ("Date".to_string(), "????.??.??".to_string()),
            ("Round".to_string(), "?".to_string()),
            ("White".to_string(), "?".to_string()),
            ("Black".to_string(), "?".to_string()),
            ("Result".to_string(), "*".to_string()),
        ]
    }

    /// Creates a game from a custom starting position.
    ///
    /// If `position` differs from the classical start position, `SetUp` and
    /// `FEN` headers are added, matching the PGN convention for games that
    /// don't begin from the initial array.
    pub fn from_position(position: Position) -> Self {
        let mut headers = Self::default_headers();
        if position.to_fen() != Position::startpos().to_fen() {
            headers.push(("SetUp".to_string(), "1".to_string()));
            headers.push(("FEN".to_string(), position.to_fen()));
        }

        let mut game = Game {
            position: position.clone(),
            positions: vec![position.clone()],
            moves: Vec::new(),
            start_pos: position,
            result: None,
            draw_claimed: false,
            headers,
        };
        // Check if the game is already over
        game.check_game_end();
        game
    }

    /// Creates a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, chess_core::FenError> {
        let position = Position::from_fen(fen)?;
        Ok(Self::from_position(position))
    }

    /// Returns a reference to the current position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Returns the starting position.
    pub fn start_position(&self) -> &Position {
        &self.start_pos
    }

    /// Returns all legal moves in the current position.
    pub fn legal_moves(&self) -> MoveList {
        generate_moves(&self.position)
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        is_king_attacked(&self.position, self.position.side_to_move)
    }

    /// Returns the game result if the game is over.
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    /// Returns true if the game has ended.
    pub fn is_game_over(&self) -> bool {
        self.result.is_some()
    }

    /// Returns the move history.
    pub fn move_history(&self) -> &[GameMove] {
        &self.moves
    }

    /// Returns the number of half-moves (plies) played.
    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }

    /// Returns the current full move number.
    pub fn fullmove_number(&self) -> u32 {
        self.position.fullmove_number
    }

    /// Makes a move given in internal format.
    pub fn make_move(&mut self, m: Move) -> Result<(), GameError> {
        if self.result.is_some() {
            return Err(GameError::GameAlreadyOver);
        }

        // Check if move is legal
        let legal_moves = self.legal_moves();
        if !legal_moves.as_slice().contains(&m) {
            return Err(GameError::IllegalMove(m.to_uci()));
        }

        self.apply_move(m);
        Ok(())
    }

    /// Makes a move given in SAN notation.
    pub fn make_move_san(&mut self, san: &str) -> Result<(), GameError> {
        if self.result.is_some() {
            return Err(GameError::GameAlreadyOver);
        }

        let m = san_to_move(&self.position, san)?;
        self.apply_move(m);
        Ok(())
    }

    /// Makes a move given in UCI notation.
    pub fn make_move_uci(&mut self, uci: &str) -> Result<(), GameError> {
        if self.result.is_some() {
            return Err(GameError::GameAlreadyOver);
        }

        let m = Move::from_uci(uci)
            .ok_or_else(|| GameError::IllegalMove(format!("invalid UCI: {}", uci)))?;

        // Find the matching legal move (to get correct flags)
        let legal_moves = self.legal_moves();
        let matching = legal_moves.as_slice().iter().find(|lm| {
            lm.from() == m.from() && lm.to() == m.to() && {
                // For promotions, also match the promotion piece
                if m.flag().is_promotion() {
                    lm.flag() == m.flag()
                } else {
                    true
                }
            }
        });

        match matching {
            Some(&legal_move) => {
                self.apply_move(legal_move);
                Ok(())
            }
            None => Err(GameError::IllegalMove(uci.to_string())),
        }
    }

    /// Internal method to apply a legal move, or the null move (used only by
    /// SAN/PGN replay for the `"--"`/`"Z0"`/`"0000"` placeholder).
    fn apply_move(&mut self, m: Move) {
        let is_null = m == Move::NULL;
        let san = if is_null {
            "--".to_string()
        } else {
            move_to_san(&self.position, m)
        };
        let hash_before = self.position.zobrist_hash();

        // Record the move
        self.moves.push(GameMove {
            mov: m,
            san,
            hash_before,
        });

        // Apply the move
        self.position = if is_null {
            make_null_move(&self.position)
        } else {
            make_move(&self.position, m)
        };

        // Record the resulting position for repetition detection.
        self.positions.push(self.position.clone());

        // Check for game end
        self.check_game_end();
    }

    /// Plays the null move (`"--"`) in the current position, used by
    /// notation-layer replay where PGN/SAN may contain a placeholder ply.
    pub fn make_null_move(&mut self) -> Result<(), GameError> {
        if self.result.is_some() {
            return Err(GameError::GameAlreadyOver);
        }
        self.apply_move(Move::NULL);
        Ok(())
    }

    /// Checks if the game has ended and updates the result.
    fn check_game_end(&mut self) {
        // Check for fivefold repetition (automatic draw)
        if self.position_count() >= 5 {
            self.result = Some(GameResult::Draw(DrawReason::FivefoldRepetition));
            return;
        }

        // Check for 75-move rule (automatic draw)
        if self.position.halfmove_clock >= 150 {
            self.result = Some(GameResult::Draw(DrawReason::SeventyFiveMoveRule));
            return;
        }

        // Check for checkmate or stalemate
        let moves = self.legal_moves();
        if moves.is_empty() {
            if self.is_check() {
                // Checkmate
                self.result = Some(match self.position.side_to_move {
                    chess_core::Color::White => GameResult::BlackWins,
                    chess_core::Color::Black => GameResult::WhiteWins,
                });
            } else {
                // Stalemate
                self.result = Some(GameResult::Draw(DrawReason::Stalemate));
            }
        }
    }

    /// Counts how many times the current position has occurred.
    pub fn position_count(&self) -> usize {
        let current = self.positions.last().expect("start position always recorded");
        self.positions
            .iter()
            .filter(|p| repetition_equal(p, current))
            .count()
    }

    /// Returns every position in the game, starting with the start position:
    /// `positions()[0]` is the start position, `positions()[i]` for `i > 0`
    /// is the position after the `i`-th move.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Normalizes a possibly-negative index against `positions()`.
    ///
    /// Negative indices count from the end (`-1` is the last position);
    /// an index outside `[-len, len)` is an error.
    fn normalize_index(&self, index: isize) -> Result<usize, GameError> {
        let len = self.positions.len() as isize;
        let resolved = if index < 0 { len + index } else { index };
        if resolved < 0 || resolved >= len {
            return Err(GameError::IndexOutOfRange(index));
        }
        Ok(resolved as usize)
    }

    /// Counts how many entries in `positions()[0..=index]` are
    /// repetition-equal to `positions()[index]`.
    pub fn repetition_count(&self, index: isize) -> Result<usize, GameError> {
        let idx = self.normalize_index(index)?;
        let target = &self.positions[idx];
        Ok(self.positions[..=idx]
            .iter()
            .filter(|p| repetition_equal(p, target))
            .count())
    }

    /// True if the position at `index` has occurred at least three times
    /// (threefold repetition, claimable).
    pub fn has_repetition(&self, index: isize) -> Result<bool, GameError> {
        Ok(self.repetition_count(index)? >= 3)
    }

    /// True if the position at `index` has occurred at least five times
    /// (fivefold repetition, a mandatory draw).
    pub fn fivefold_repetition(&self, index: isize) -> Result<bool, GameError> {
        Ok(self.repetition_count(index)? >= 5)
    }

    /// True if the position at `index` has a halfmove clock of at least 100
    /// (fifty-move rule, claimable).
    pub fn fifty_move_rule(&self, index: isize) -> Result<bool, GameError> {
        let idx = self.normalize_index(index)?;
        Ok(self.positions[idx].halfmove_clock >= 100)
    }

    /// True if the position at `index` has a halfmove clock of at least 150
    /// (seventy-five-move rule, a mandatory draw).
    pub fn seventy_five_move_rule(&self, index: isize) -> Result<bool, GameError> {
        let idx = self.normalize_index(index)?;
        Ok(self.positions[idx].halfmove_clock >= 150)
    }

    /// Returns the PGN headers in insertion order (Seven Tag Roster first
    /// for a freshly created game, plus `SetUp`/`FEN` if the start position
    /// isn't the classical start).
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Looks up a header value by key.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Sets a header, overwriting it in place if already present, else
    /// appending it at the end.
    pub fn set_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.headers.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.headers.push((key, value)),
        }
    }

    /// Replaces the entire header list verbatim, in the given order. Used by
    /// the PGN reader to install a game's parsed tag pairs as-is rather than
    /// layering them over the Seven Tag Roster defaults.
    pub(crate) fn set_headers(&mut self, headers: Vec<(String, String)>) {
        self.headers = headers;
    }

    /// Forces the game's result, bypassing rule adjudication. Used by the
    /// PGN reader to install the authoritative result-token terminator,
    /// which may record a resignation or agreement the rules engine has no
    /// way to derive from the final position alone.
    pub(crate) fn force_result(&mut self, result: Option<GameResult>) {
        self.result = result;
    }

    /// Returns the PGN result token for the game's current state: one of
    /// `"1-0"`, `"0-1"`, `"1/2-1/2"`, or `"*"` if still in progress. This is
    /// the authoritative terminator; the `Result` header is not
    /// automatically kept in sync with it.
    pub fn result_tag(&self) -> &'static str {
        match self.result {
            None => "*",
            Some(GameResult::WhiteWins) => "1-0",
            Some(GameResult::BlackWins) => "0-1",
            Some(GameResult::Draw(_)) => "1/2-1/2",
        }
    }

    /// Returns true if a draw can be claimed (threefold repetition or 50-move rule).
    pub fn can_claim_draw(&self) -> bool {
        if self.result.is_some() {
            return false;
        }
        self.position_count() >= 3 || self.position.halfmove_clock >= 100
    }

    /// Claims a draw if conditions are met.
    pub fn claim_draw(&mut self) -> Result<(), GameError> {
        if self.result.is_some() {
            return Err(GameError::GameAlreadyOver);
        }

        if self.position_count() >= 3 {
            self.result = Some(GameResult::Draw(DrawReason::ThreefoldRepetition));
            self.draw_claimed = true;
            return Ok(());
        }

        if self.position.halfmove_clock >= 100 {
            self.result = Some(GameResult::Draw(DrawReason::FiftyMoveRule));
            self.draw_claimed = true;
            return Ok(());
        }

        Err(GameError::CannotClaimDraw)
    }

    /// Agrees to a draw (both players must agree in real chess).
    pub fn agree_draw(&mut self) -> Result<(), GameError> {
        if self.result.is_some() {
            return Err(GameError::GameAlreadyOver);
        }

        self.result = Some(GameResult::Draw(DrawReason::Agreement));
        self.draw_claimed = true;
        Ok(())
    }

    /// Resigns the game for the side to move.
    pub fn resign(&mut self) -> Result<(), GameError> {
        if self.result.is_some() {
            return Err(GameError::GameAlreadyOver);
        }

        self.result = Some(match self.position.side_to_move {
            chess_core::Color::White => GameResult::BlackWins,
            chess_core::Color::Black => GameResult::WhiteWins,
        });
        Ok(())
    }

    /// Returns the current position as a FEN string.
    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }

    /// Generates SAN for a move in the current position.
    pub fn move_to_san(&self, m: Move) -> String {
        move_to_san(&self.position, m)
    }

    /// Parses SAN and returns the corresponding move.
    pub fn san_to_move(&self, san: &str) -> Result<Move, SanError> {
        san_to_move(&self.position, san)
    }
}
