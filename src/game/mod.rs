//! Chess game logic
//!
//! # Module Organization
//!
//! - `types` - colours, piece kinds, canonical moves, board orientation
//! - `rules` - authoritative position wrapper over `shakmaty`
//! - `resources` - captured material, move history, selection, evaluation
//! - `ai` - player assignment, difficulty and the move normalizer
//! - `session` - board interaction controller, the only place moves are applied
//! - `driver` - async loop running a session against the remote backends
//!
//! # Flow
//!
//! A click, drop or backend suggestion becomes a `CanonicalMove`, is checked
//! against the current position, and on success advances position, history
//! and captured material together. If the side now to move is AI-controlled
//! the driver asks the suggestion backend for a move.

pub mod ai;
pub mod driver;
pub mod error;
pub mod resources;
pub mod rules;
pub mod session;
pub mod types;

pub use driver::{SessionCommand, SessionDriver};
pub use error::{GameError, GameResult};
pub use session::{GameSession, InteractionOutcome, SuggestionOutcome};
