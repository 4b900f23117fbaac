//! Session state owned by [`crate::game::session::GameSession`]
//!
//! # Resource Categories
//!
//! ## Player Interaction
//! - [`Selection`] - Currently selected square and its legal destinations
//!
//! ## Game History
//! - [`MoveHistory`] - Scoresheet of SAN moves paired by move number
//! - [`CapturedPieces`] - Material tracking and advantage calculation
//!
//! ## Analysis
//! - [`EvaluationSample`] - Latest evaluation from the analysis stream
//! - [`BestMoveArrow`] - Suggested move shown on the board

pub mod captured;
pub mod evaluation;
pub mod history;
pub mod selection;

pub use captured::{diff_captures, CapturedPiece, CapturedPieces};
pub use evaluation::{BestMoveArrow, EvalScore, EvaluationSample};
pub use history::{MoveHistory, MoveHistoryEntry};
pub use selection::{Selection, SquareHighlight};
