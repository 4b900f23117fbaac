//! Error types for networking module
//!
//! The session never sees these: the clients log them and report "no
//! suggestion" or reconnect.

use thiserror::Error;

/// Errors from the suggestion and analysis backends
#[derive(Error, Debug)]
pub enum NetworkError {
    /// Request could not be sent or the response not read
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Backend returned status {status}")]
    Status { status: u16 },

    /// Response body was not the expected JSON
    #[error("Malformed response body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    /// Response parsed but carried no `move`
    #[error("Response has no move")]
    MissingMove,

    /// Analysis stream could not be opened
    #[error("Analysis connection to {url} failed: {message}")]
    Connect { url: String, message: String },

    /// Analysis stream send failed
    #[error("Analysis send failed: {message}")]
    Send { message: String },
}

/// Result type alias for networking operations
pub type NetworkResult<T> = Result<T, NetworkError>;
