//! Clients for the two remote backends
//!
//! - [`client`]: one-shot move suggestions over HTTP
//! - [`eval_stream`]: long-lived analysis websocket

pub mod client;
pub mod error;
pub mod eval_stream;

pub use client::SuggestionClient;
pub use error::{NetworkError, NetworkResult};
pub use eval_stream::{EvalStream, EvalStreamConfig};
