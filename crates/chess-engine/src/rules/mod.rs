//! Rule set abstraction for chess variants.
//!
//! This module provides the [`RuleSet`] trait which abstracts over different
//! chess variants. The engine is rule-agnostic - it delegates game-specific
//! logic to the active rule set.

mod standard;

pub use standard::StandardChess;

use crate::{MoveList, Position};
use chess_core::Move;

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    /// White wins (checkmate or resignation).
    WhiteWins,
    /// Black wins (checkmate or resignation).
    BlackWins,
    /// Draw, carrying the reason it was declared.
    Draw(DrawReason),
}

/// Why a game was adjudicated a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    /// Side to move has no legal moves and is not in check.
    Stalemate,
    /// The same position (including side to move, castling rights, and
    /// en passant target) has occurred three times.
    ThreefoldRepetition,
    /// The same position has occurred five times (automatic, no claim needed).
    FivefoldRepetition,
    /// 50 full moves have passed without a pawn move or capture.
    FiftyMoveRule,
    /// 75 full moves have passed without a pawn move or capture (automatic).
    SeventyFiveMoveRule,
    /// Neither side has enough material to deliver checkmate.
    InsufficientMaterial,
    /// Both players agreed to a draw.
    Agreement,
}

/// Trait for implementing chess variants.
///
/// The engine uses this trait to delegate all game-specific logic, making it
/// easy to support different chess variants (standard, Chess960, etc.) without
/// changing the core engine code.
///
/// # Example
///
/// ```
/// use chess_engine::{Position, StandardChess};
/// use chess_engine::rules::RuleSet;
///
/// let position = StandardChess.initial_position();
/// let moves = StandardChess.generate_moves(&position);
/// ```
pub trait RuleSet {
    /// Returns the initial position for this variant.
    fn initial_position(&self) -> Position;

    /// Generates all legal moves for the given position.
    fn generate_moves(&self, position: &Position) -> MoveList;

    /// Returns true if the given move is legal in the position.
    fn is_legal(&self, position: &Position, m: Move) -> bool;

    /// Makes a move on the position, returning the new position.
    ///
    /// # Panics
    ///
    /// May panic if the move is not legal. Use [`is_legal`](RuleSet::is_legal)
    /// to check first, or use [`try_make_move`](RuleSet::try_make_move).
    fn make_move(&self, position: &Position, m: Move) -> Position;

    /// Attempts to make a move, returning `None` if illegal.
    fn try_make_move(&self, position: &Position, m: Move) -> Option<Position> {
        if self.is_legal(position, m) {
            Some(self.make_move(position, m))
        } else {
            None
        }
    }

    /// Returns true if the side to move is in check.
    fn is_check(&self, position: &Position) -> bool;

    /// Returns true if neither side has enough material to force checkmate.
    fn is_insufficient_material(&self, position: &Position) -> bool;

    /// Returns the game result if the game is over, otherwise `None`.
    ///
    /// Implementations are responsible for stalemate, checkmate, insufficient
    /// material and the 75-move rule. Repetition and the 50-move rule require
    /// history beyond a single position and are adjudicated by the caller
    /// (see [`crate::game::Game`]).
    fn game_result(&self, position: &Position) -> Option<GameResult>;

    /// Returns true if the game is over.
    fn is_game_over(&self, position: &Position) -> bool {
        self.game_result(position).is_some()
    }
}
