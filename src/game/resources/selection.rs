//! Selection resource for tracking the selected square

use serde::Serialize;
use shakmaty::Square;
use std::collections::HashMap;

/// How a square should be highlighted by the view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SquareHighlight {
    /// The selected piece's own square
    Selected,
    /// A legal destination of the selected piece
    MoveTarget,
}

/// Currently selected square and its legal destinations
///
/// `selected_square == None` is the idle state.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Selection {
    pub selected_square: Option<Square>,
    pub possible_moves: Vec<Square>,
}

impl Selection {
    pub fn select(&mut self, square: Square, possible_moves: Vec<Square>) {
        self.selected_square = Some(square);
        self.possible_moves = possible_moves;
    }

    pub fn clear(&mut self) {
        self.selected_square = None;
        self.possible_moves.clear();
    }

    pub fn is_selected(&self) -> bool {
        self.selected_square.is_some()
    }

    /// Per-square highlight map
    ///
    /// Empty when nothing is selected or the selected piece cannot move.
    pub fn highlights(&self) -> HashMap<Square, SquareHighlight> {
        let mut highlights = HashMap::new();
        let Some(selected) = self.selected_square else {
            return highlights;
        };
        if self.possible_moves.is_empty() {
            return highlights;
        }
        for target in &self.possible_moves {
            highlights.insert(*target, SquareHighlight::MoveTarget);
        }
        highlights.insert(selected, SquareHighlight::Selected);
        highlights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_highlights() {
        let mut selection = Selection::default();
        assert!(selection.highlights().is_empty());

        selection.select(Square::B1, vec![Square::A3, Square::C3]);
        let highlights = selection.highlights();
        assert_eq!(highlights.len(), 3);
        assert_eq!(highlights[&Square::B1], SquareHighlight::Selected);
        assert_eq!(highlights[&Square::C3], SquareHighlight::MoveTarget);
    }

    #[test]
    fn test_selection_without_moves_has_no_highlights() {
        let mut selection = Selection::default();
        selection.select(Square::A1, Vec::new());
        assert!(selection.is_selected());
        assert!(selection.highlights().is_empty());
    }

    #[test]
    fn test_clear() {
        let mut selection = Selection::default();
        selection.select(Square::E2, vec![Square::E3, Square::E4]);
        selection.clear();
        assert!(!selection.is_selected());
        assert!(selection.possible_moves.is_empty());
    }
}
