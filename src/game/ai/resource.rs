//! AI resource definitions for player assignment and difficulty settings
//!
//! Configures which side the suggestion backend plays and how deep it
//! searches. The session checks these before asking for a move.
//!
//! # Difficulty Levels
//!
//! Difficulty is the search depth sent with every move request:
//!
//! | Difficulty | Depth |
//! |------------|-------|
//! | Easy       | 2     |
//! | Medium     | 3     |
//! | Hard       | 4     |
//!
//! Any other depth is rejected by [`AIDifficulty::from_depth`].

use crate::game::types::PieceColor;
use serde::{Deserialize, Serialize};

/// Who moves a side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerType {
    #[default]
    Human,
    Ai,
}

impl PlayerType {
    pub fn toggled(self) -> Self {
        match self {
            PlayerType::Human => PlayerType::Ai,
            PlayerType::Ai => PlayerType::Human,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlayerType::Human => "human",
            PlayerType::Ai => "ai",
        }
    }
}

/// Player type for each color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerAssignment {
    pub white: PlayerType,
    pub black: PlayerType,
}

impl Default for PlayerAssignment {
    /// Human plays White, AI plays Black
    fn default() -> Self {
        Self {
            white: PlayerType::Human,
            black: PlayerType::Ai,
        }
    }
}

impl PlayerAssignment {
    pub fn for_color(&self, color: PieceColor) -> PlayerType {
        match color {
            PieceColor::White => self.white,
            PieceColor::Black => self.black,
        }
    }

    pub fn is_ai(&self, color: PieceColor) -> bool {
        self.for_color(color) == PlayerType::Ai
    }

    /// Flip `color` between human and AI, returning the new type
    pub fn toggle(&mut self, color: PieceColor) -> PlayerType {
        let slot = match color {
            PieceColor::White => &mut self.white,
            PieceColor::Black => &mut self.black,
        };
        *slot = slot.toggled();
        *slot
    }
}

/// AI difficulty levels, one per supported search depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AIDifficulty {
    /// Depth 2
    #[default]
    Easy,
    /// Depth 3
    Medium,
    /// Depth 4
    Hard,
}

impl AIDifficulty {
    pub const ALL: [AIDifficulty; 3] = [AIDifficulty::Easy, AIDifficulty::Medium, AIDifficulty::Hard];

    /// Search depth sent to the backend
    pub fn depth(self) -> u8 {
        match self {
            AIDifficulty::Easy => 2,
            AIDifficulty::Medium => 3,
            AIDifficulty::Hard => 4,
        }
    }

    /// Difficulty for a depth, `None` outside {2, 3, 4}
    pub fn from_depth(depth: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.depth() == depth)
    }
}

/// AI configuration held by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AIConfig {
    pub players: PlayerAssignment,
    pub difficulty: AIDifficulty,
}
