//! Chess rules module - position state on top of the rules engine
//!
//! # Module Structure
//!
//! - `position` - [`GamePosition`], the immutable-per-ply authoritative position
//! - `board_state` - [`BoardState`], a per-`(color, type)` piece tally

pub mod board_state;
pub mod position;


pub use board_state::BoardState;
pub use position::{AppliedMove, GamePosition};
