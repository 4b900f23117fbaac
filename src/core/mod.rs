//! Core module - configuration and shared error types
//!
//! - [`SessionSettings`] - user preferences persisted as JSON
//! - [`CoreError`] - settings I/O and (de)serialization failures

pub mod error;
pub mod settings;

pub use error::{CoreError, CoreResult};
pub use settings::{load_settings, save_settings, settings_path, SessionSettings};
