pub mod cli;
pub mod core;
pub mod game;
pub mod networking;

pub use game::{GameSession, SessionCommand, SessionDriver};
