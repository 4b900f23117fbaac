//! Material tally of a position, used for capture diffing

use crate::game::rules::GamePosition;
use crate::game::types::{PieceColor, PieceType};
use std::collections::HashMap;

/// Count of pieces per `(color, type)` on the board
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardState {
    counts: HashMap<(PieceColor, PieceType), u32>,
}

impl BoardState {
    /// Tally every occupied square of `position`
    pub fn from_position(position: &GamePosition) -> Self {
        let mut counts = HashMap::new();
        for (_, piece) in position.pieces() {
            *counts.entry((piece.color, piece.piece_type)).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn count(&self, color: PieceColor, piece_type: PieceType) -> u32 {
        self.counts.get(&(color, piece_type)).copied().unwrap_or(0)
    }

    /// Total number of pieces of one color
    pub fn total(&self, color: PieceColor) -> u32 {
        PieceType::ALL
            .iter()
            .map(|piece_type| self.count(color, *piece_type))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_position_tally() {
        let state = BoardState::from_position(&GamePosition::new());
        assert_eq!(state.count(PieceColor::White, PieceType::Pawn), 8);
        assert_eq!(state.count(PieceColor::Black, PieceType::Knight), 2);
        assert_eq!(state.count(PieceColor::Black, PieceType::King), 1);
        assert_eq!(state.total(PieceColor::White), 16);
        assert_eq!(state.total(PieceColor::Black), 16);
    }
}
