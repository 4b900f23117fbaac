//! Error types for core module
//!
//! Covers settings persistence. Callers fall back to defaults on any of these.

use thiserror::Error;

/// Errors that can occur in the core module
#[derive(Error, Debug)]
pub enum CoreError {
    /// Settings file I/O error
    #[error("Settings I/O error: {0}")]
    SettingsIo(#[from] std::io::Error),

    /// Settings serialization/deserialization error
    #[error("Settings serialization error: {0}")]
    SettingsSerialization(#[from] serde_json::Error),

    /// No platform configuration directory could be determined
    #[error("No configuration directory available")]
    ConfigDirUnavailable,
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;
