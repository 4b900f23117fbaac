//! Move history ledger
//!
//! Append-only log of moves paired by move number, the way a scoresheet
//! reads: `1. e4 e5  2. Nf3 Nc6`. Only the most recent entry may still be
//! waiting for Black's reply.

use crate::game::types::PieceColor;
use serde::Serialize;

/// One numbered row of the scoresheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveHistoryEntry {
    pub move_number: u32,
    pub white: String,
    /// Empty until Black's move is recorded
    pub black: String,
}

impl MoveHistoryEntry {
    pub fn new(move_number: u32, white: impl Into<String>, black: impl Into<String>) -> Self {
        Self {
            move_number,
            white: white.into(),
            black: black.into(),
        }
    }
}

/// Move history for the current game
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct MoveHistory {
    entries: Vec<MoveHistoryEntry>,
}

impl MoveHistory {
    /// Record a move in SAN for `mover`
    ///
    /// White opens a new entry; Black fills in the latest one. Returns `false`
    /// and records nothing when Black moves with no open entry.
    pub fn record(&mut self, san: &str, mover: PieceColor) -> bool {
        match mover {
            PieceColor::White => {
                let move_number = self.entries.len() as u32 + 1;
                self.entries.push(MoveHistoryEntry::new(move_number, san, ""));
                true
            }
            PieceColor::Black => match self.entries.last_mut() {
                Some(entry) => {
                    entry.black = san.to_string();
                    true
                }
                None => false,
            },
        }
    }

    pub fn entries(&self) -> &[MoveHistoryEntry] {
        &self.entries
    }

    /// Get the most recent entry, if any
    pub fn last_entry(&self) -> Option<&MoveHistoryEntry> {
        self.entries.last()
    }

    /// Number of numbered entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of half-moves recorded
    pub fn plies(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| if entry.black.is_empty() { 1 } else { 2 })
            .sum()
    }

    /// Clear all move history (for starting a new game)
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_history_default() {
        //! Verifies MoveHistory starts empty
        let history = MoveHistory::default();

        assert!(history.is_empty());
        assert_eq!(history.len(), 0);
        assert_eq!(history.plies(), 0);
        assert!(history.last_entry().is_none());
    }

    #[test]
    fn test_white_opens_entry() {
        let mut history = MoveHistory::default();
        assert!(history.record("e4", PieceColor::White));

        assert_eq!(history.entries(), &[MoveHistoryEntry::new(1, "e4", "")]);
    }

    #[test]
    fn test_black_completes_entry() {
        let mut history = MoveHistory::default();
        history.record("e4", PieceColor::White);
        history.record("e5", PieceColor::Black);
        history.record("Nf3", PieceColor::White);

        assert_eq!(
            history.entries(),
            &[
                MoveHistoryEntry::new(1, "e4", "e5"),
                MoveHistoryEntry::new(2, "Nf3", ""),
            ]
        );
        assert_eq!(history.plies(), 3);
    }

    #[test]
    fn test_black_without_entry_is_ignored() {
        let mut history = MoveHistory::default();
        assert!(!history.record("e5", PieceColor::Black));
        assert!(history.is_empty());
    }

    #[test]
    fn test_entry_count_is_half_the_plies_rounded_up() {
        let sans = ["e4", "e5", "Nf3", "Nc6", "Bb5", "a6", "Ba4"];
        for n in 1..=sans.len() {
            let mut history = MoveHistory::default();
            for (ply, san) in sans.iter().take(n).enumerate() {
                let mover = if ply % 2 == 0 { PieceColor::White } else { PieceColor::Black };
                history.record(san, mover);
            }
            assert_eq!(history.len(), n.div_ceil(2));
            for (k, entry) in history.entries().iter().enumerate() {
                assert_eq!(entry.move_number as usize, k + 1);
                assert_eq!(entry.white, sans[2 * k]);
                let black = if 2 * k + 1 < n { sans[2 * k + 1] } else { "" };
                assert_eq!(entry.black, black);
            }
        }
    }

    #[test]
    fn test_clear() {
        let mut history = MoveHistory::default();
        history.record("d4", PieceColor::White);
        history.clear();
        assert!(history.is_empty());
    }
}
