//! Remote AI opponent
//!
//! No search happens locally. The suggestion backend is asked for a move when
//! an AI-controlled side is to move, and whatever it returns goes through the
//! [`normalizer`] before it may touch the position.
//!
//! # Architecture
//!
//! - `AIConfig`: player assignment and difficulty (search depth)
//! - `normalize`: payload of unknown shape to a legal `CanonicalMove`
//! - `PendingSuggestion`: the one request that may be in flight
//! - `Suggestion`: a raw answer from the backend

pub mod normalizer;
pub mod resource;

pub use normalizer::{normalize, ShapeMatch};
pub use resource::{AIConfig, AIDifficulty, PlayerAssignment, PlayerType};

use shared::protocol::MovePayload;
use uuid::Uuid;

use crate::game::types::PieceColor;

/// What the suggestion backend answered, before normalization
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub payload: MovePayload,
    /// Backend's evaluation of the position, if it sent one
    pub eval: Option<f64>,
}

/// A suggestion request the session has handed out and not yet resolved
///
/// The FEN is the position the request was issued for; a response is only
/// applied while the session is still at that position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSuggestion {
    pub id: Uuid,
    pub fen: String,
    pub depth: u8,
    pub side: PieceColor,
}

impl PendingSuggestion {
    pub fn new(fen: String, depth: u8, side: PieceColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            fen,
            depth,
            side,
        }
    }
}
