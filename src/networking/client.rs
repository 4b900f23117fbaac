//! Move-suggestion client (`POST /api/move`)
//!
//! One request per AI turn, no retries. Every failure is logged and reported
//! to the caller as "no suggestion".

use std::time::Duration;

use shared::protocol::{MoveRequest, MoveResponse};
use tracing::{debug, warn};

use crate::game::ai::{PendingSuggestion, Suggestion};
use crate::networking::error::{NetworkError, NetworkResult};

const MOVE_PATH: &str = "/api/move";

/// HTTP client for the suggestion backend
#[derive(Debug, Clone)]
pub struct SuggestionClient {
    http: reqwest::Client,
    endpoint: String,
}

impl SuggestionClient {
    /// `base_url` is the backend root, e.g. `http://localhost:8000`
    pub fn new(base_url: &str, timeout: Duration) -> NetworkResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), MOVE_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Ask for a move; any failure is returned as an error
    pub async fn try_request_move(&self, request: &PendingSuggestion) -> NetworkResult<Suggestion> {
        let body = MoveRequest::new(request.fen.clone(), request.depth, request.side.is_white());
        let response = self.http.post(&self.endpoint).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::Status {
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        let parsed: MoveResponse = serde_json::from_str(&text)?;
        let payload = parsed.mv.ok_or(NetworkError::MissingMove)?;
        debug!("[AI] Backend answered {} with eval {:?}", payload.shape(), parsed.eval);

        Ok(Suggestion {
            payload,
            eval: parsed.eval,
        })
    }

    /// Ask for a move, turning every failure into `None`
    pub async fn request_move(&self, request: &PendingSuggestion) -> Option<Suggestion> {
        match self.try_request_move(request).await {
            Ok(suggestion) => Some(suggestion),
            Err(err) => {
                warn!("[AI] Suggestion request {} failed: {}", request.id, err);
                None
            }
        }
    }
}
