//! Captured pieces tracking
//!
//! Tracks pieces captured by each player and calculates material advantage.
//! Captures are derived by diffing the piece tally of two successive positions,
//! not from the move itself, so en passant is attributed the same way as any
//! other capture.
//!
//! # Material Values
//!
//! Standard chess piece values in pawns:
//! - Pawn: 1
//! - Knight/Bishop: 3
//! - Rook: 5
//! - Queen: 9
//!
//! # Material Advantage
//!
//! Positive advantage means White is ahead, negative means Black is ahead.
//! Example: If White captured (Rook=5, Pawn=1) and Black captured (Knight=3),
//! White's advantage is (5+1) - 3 = +3 pawns.

use crate::game::rules::{BoardState, GamePosition};
use crate::game::types::{PieceColor, PieceType};
use serde::Serialize;

/// A piece removed from the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CapturedPiece {
    pub piece_type: PieceType,
    /// Color of the captured piece (not of the capturer)
    pub color: PieceColor,
    pub value: u32,
}

impl CapturedPiece {
    pub fn new(color: PieceColor, piece_type: PieceType) -> Self {
        Self {
            piece_type,
            color,
            value: piece_type.value(),
        }
    }
}

/// Captured pieces for both sides
///
/// # Fields
///
/// - `white_captured`: Black pieces that White has captured
/// - `black_captured`: White pieces that Black has captured
///
/// Lists only grow during a game; [`CapturedPieces::clear`] runs on new game.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct CapturedPieces {
    /// Pieces captured by white (black pieces taken)
    pub white_captured: Vec<CapturedPiece>,
    /// Pieces captured by black (white pieces taken)
    pub black_captured: Vec<CapturedPiece>,
}

impl CapturedPieces {
    /// Record a piece capture, credited to the opposite color
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// // White captures Black's queen
    /// captured.add_capture(CapturedPiece::new(PieceColor::Black, PieceType::Queen));
    /// assert_eq!(captured.white_captured.len(), 1);
    /// ```
    pub fn add_capture(&mut self, piece: CapturedPiece) {
        match piece.color {
            // If white piece was captured, black gets credit
            PieceColor::White => self.black_captured.push(piece),
            // If black piece was captured, white gets credit
            PieceColor::Black => self.white_captured.push(piece),
        }
    }

    pub fn extend(&mut self, pieces: impl IntoIterator<Item = CapturedPiece>) {
        for piece in pieces {
            self.add_capture(piece);
        }
    }

    /// Pieces captured by `capturer`
    pub fn captured_by(&self, capturer: PieceColor) -> &[CapturedPiece] {
        match capturer {
            PieceColor::White => &self.white_captured,
            PieceColor::Black => &self.black_captured,
        }
    }

    /// Get material advantage in pawns
    ///
    /// Returns positive if White is ahead, negative if Black is ahead, 0 if equal.
    pub fn material_advantage(&self) -> i32 {
        let score = |pieces: &[CapturedPiece]| pieces.iter().map(|p| p.value as i32).sum::<i32>();
        score(&self.white_captured) - score(&self.black_captured)
    }

    /// Side ahead in captured material and by how much, `None` when level
    pub fn material_difference(&self) -> Option<(PieceColor, u32)> {
        let advantage = self.material_advantage();
        match advantage.signum() {
            1 => Some((PieceColor::White, advantage.unsigned_abs())),
            -1 => Some((PieceColor::Black, advantage.unsigned_abs())),
            _ => None,
        }
    }

    /// Clear all captured pieces (for new game)
    pub fn clear(&mut self) {
        self.white_captured.clear();
        self.black_captured.clear();
    }
}

/// Pieces captured between two positions one legal move apart
///
/// For each `(color, type)` whose count dropped, one [`CapturedPiece`] per
/// missing unit is reported. A color whose total piece count did not drop lost
/// nothing: a promoting pawn turns into another piece rather than being taken.
pub fn diff_captures(before: &GamePosition, after: &GamePosition) -> Vec<CapturedPiece> {
    let before = BoardState::from_position(before);
    let after = BoardState::from_position(after);

    let mut captured = Vec::new();
    for color in PieceColor::ALL {
        if after.total(color) >= before.total(color) {
            continue;
        }
        for piece_type in PieceType::ALL {
            let lost = before
                .count(color, piece_type)
                .saturating_sub(after.count(color, piece_type));
            captured.extend((0..lost).map(|_| CapturedPiece::new(color, piece_type)));
        }
    }
    captured
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::CanonicalMove;
    use shakmaty::Square;

    fn capture(color: PieceColor, piece_type: PieceType) -> CapturedPiece {
        CapturedPiece::new(color, piece_type)
    }

    fn play(position: &GamePosition, from: Square, to: Square) -> GamePosition {
        position
            .apply(&CanonicalMove::new(from, to))
            .expect("move should be legal")
            .position
    }

    #[test]
    fn test_captured_pieces_default() {
        //! Verifies that captured pieces starts empty
        let captured = CapturedPieces::default();
        assert!(captured.white_captured.is_empty());
        assert!(captured.black_captured.is_empty());
        assert_eq!(captured.material_advantage(), 0);
        assert_eq!(captured.material_difference(), None);
    }

    #[test]
    fn test_add_capture_white_takes_black() {
        let mut captured = CapturedPieces::default();
        captured.add_capture(capture(PieceColor::Black, PieceType::Queen));

        assert_eq!(captured.white_captured.len(), 1);
        assert_eq!(captured.white_captured[0].piece_type, PieceType::Queen);
        assert_eq!(captured.white_captured[0].value, 9);
        assert!(captured.black_captured.is_empty());
    }

    #[test]
    fn test_add_capture_black_takes_white() {
        let mut captured = CapturedPieces::default();
        captured.add_capture(capture(PieceColor::White, PieceType::Rook));

        assert_eq!(captured.captured_by(PieceColor::Black).len(), 1);
        assert!(captured.captured_by(PieceColor::White).is_empty());
    }

    #[test]
    fn test_material_difference() {
        let mut captured = CapturedPieces::default();
        captured.add_capture(capture(PieceColor::Black, PieceType::Queen)); // White takes Queen (9)
        captured.add_capture(capture(PieceColor::White, PieceType::Pawn)); // Black takes Pawn (1)
        assert_eq!(captured.material_difference(), Some((PieceColor::White, 8)));

        captured.add_capture(capture(PieceColor::White, PieceType::Queen));
        captured.add_capture(capture(PieceColor::White, PieceType::Rook));
        assert_eq!(captured.material_advantage(), -6);
        assert_eq!(captured.material_difference(), Some((PieceColor::Black, 6)));
    }

    #[test]
    fn test_clear() {
        let mut captured = CapturedPieces::default();
        captured.extend([
            capture(PieceColor::Black, PieceType::Queen),
            capture(PieceColor::White, PieceType::Rook),
        ]);

        captured.clear();

        assert!(captured.white_captured.is_empty());
        assert!(captured.black_captured.is_empty());
    }

    #[test]
    fn test_diff_quiet_move_captures_nothing() {
        let before = GamePosition::new();
        let after = play(&before, Square::E2, Square::E4);
        assert!(diff_captures(&before, &after).is_empty());
    }

    #[test]
    fn test_diff_ordinary_capture() {
        // 1.e4 d5 2.exd5
        let start = GamePosition::new();
        let before = play(&play(&start, Square::E2, Square::E4), Square::D7, Square::D5);
        let after = play(&before, Square::E4, Square::D5);

        assert_eq!(
            diff_captures(&before, &after),
            vec![capture(PieceColor::Black, PieceType::Pawn)]
        );
    }

    #[test]
    fn test_diff_en_passant_capture() {
        //! Destination square is empty before the move, the pawn still counts
        let before = GamePosition::from_fen(
            "rnbqkbnr/1pp1pppp/p7/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3",
        )
        .unwrap();
        assert!(before.piece_at(Square::D6).is_none());

        let after = play(&before, Square::E5, Square::D6);
        assert_eq!(
            diff_captures(&before, &after),
            vec![capture(PieceColor::Black, PieceType::Pawn)]
        );
    }

    #[test]
    fn test_diff_promotion_is_not_a_capture() {
        let before = GamePosition::from_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap();
        let after = play(&before, Square::E7, Square::E8);
        assert!(diff_captures(&before, &after).is_empty());
    }

    #[test]
    fn test_diff_capturing_promotion() {
        let before = GamePosition::from_fen("3r4/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap();
        let after = play(&before, Square::E7, Square::D8);
        assert_eq!(
            diff_captures(&before, &after),
            vec![capture(PieceColor::Black, PieceType::Rook)]
        );
    }

    #[test]
    fn test_diff_every_legal_move_takes_at_most_one_enemy_piece() {
        let fens = [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            // castling both ways, many captures
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            // en passant available
            "rnbqkbnr/1pp1pppp/p7/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3",
            // promotions with and without capture, both colours
            "2r2n2/4P3/8/8/8/8/k5p1/3K1B2 w - - 0 1",
            "2r2n2/4P3/8/8/8/8/k5p1/3K1B2 b - - 0 1",
        ];

        let mut checked = 0;
        for fen in fens {
            let before = GamePosition::from_fen(fen).unwrap();
            let mover = before.side_to_move();
            for mv in before.legal_moves() {
                let after = before.apply(&mv).unwrap().position;
                let taken = diff_captures(&before, &after);
                assert!(taken.len() <= 1, "{mv} in {fen} took {taken:?}");
                if let Some(piece) = taken.first() {
                    assert_eq!(piece.color, mover.opposite(), "{mv} in {fen}");
                }
                checked += 1;
            }
        }
        assert!(checked > 100, "only {checked} moves checked");
    }
}
