//! Error types for game module
//!
//! Covers move validation, move normalization and position parsing. None of
//! these are fatal: callers turn them into "no change".

/// Errors that can occur in game logic
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    /// Move is not legal in the position it was tried against
    #[error("Illegal move: {message}")]
    IllegalMove { message: String },

    /// External move payload matched none of the known shapes
    #[error("Unrecognized move format ({shape}): {payload}")]
    UnrecognizedMoveFormat { shape: String, payload: String },

    /// Numeric square index outside 0..=63
    #[error("Invalid square index: {index}")]
    InvalidSquareIndex { index: i64 },

    /// FEN string could not be turned into a legal position
    #[error("Invalid FEN '{fen}': {message}")]
    InvalidFen { fen: String, message: String },
}

/// Result type alias for game operations
pub type GameResult<T> = Result<T, GameError>;
