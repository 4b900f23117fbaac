//! Session settings and their persistence
//!
//! Settings live in `settings.json` in the user's configuration directory.
//! Missing keys take their defaults, so older files keep loading.
//!
//! # Error Handling
//!
//! [`load_settings`] never fails: read or parse errors are logged and the
//! defaults are used. [`save_settings`] reports errors to the caller.
//!
//! # Overrides
//!
//! After loading, `CHESS_SESSION_API_URL` and `CHESS_SESSION_EVAL_URL` replace
//! the backend URLs (an optional `.env` is read first by the binary).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::error::{CoreError, CoreResult};
use crate::game::ai::{AIConfig, AIDifficulty, PlayerAssignment, PlayerType};
use crate::networking::eval_stream::{EvalStreamConfig, DEFAULT_EVAL_URL};

/// Settings filename
const SETTINGS_FILENAME: &str = "settings.json";

pub const API_URL_ENV: &str = "CHESS_SESSION_API_URL";
pub const EVAL_URL_ENV: &str = "CHESS_SESSION_EVAL_URL";

/// User-configurable session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Root of the suggestion backend; `/api/move` is appended
    pub api_base_url: String,
    /// Analysis websocket URL
    pub eval_url: String,
    pub eval_depth: u32,
    pub eval_variants: u32,
    /// 2, 3 or 4; anything else falls back to 2
    pub ai_depth: u8,
    pub white_player: PlayerType,
    pub black_player: PlayerType,
    pub show_eval: bool,
    pub show_best_move: bool,
    pub request_timeout_secs: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            eval_url: DEFAULT_EVAL_URL.to_string(),
            eval_depth: 18,
            eval_variants: 1,
            ai_depth: 2,
            white_player: PlayerType::Human,
            black_player: PlayerType::Ai,
            show_eval: true,
            show_best_move: false,
            request_timeout_secs: 30,
        }
    }
}

impl SessionSettings {
    /// Replace backend URLs from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Replace backend URLs from `lookup`; empty values are ignored
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(url) = non_empty(API_URL_ENV) {
            info!("[SETTINGS] {} overrides API URL: {}", API_URL_ENV, url);
            self.api_base_url = url;
        }
        if let Some(url) = non_empty(EVAL_URL_ENV) {
            info!("[SETTINGS] {} overrides eval URL: {}", EVAL_URL_ENV, url);
            self.eval_url = url;
        }
    }

    pub fn ai_config(&self) -> AIConfig {
        let difficulty = AIDifficulty::from_depth(self.ai_depth).unwrap_or_else(|| {
            warn!("[SETTINGS] Unsupported ai_depth {}, using 2", self.ai_depth);
            AIDifficulty::Easy
        });
        AIConfig {
            players: PlayerAssignment {
                white: self.white_player,
                black: self.black_player,
            },
            difficulty,
        }
    }

    pub fn eval_stream_config(&self) -> EvalStreamConfig {
        EvalStreamConfig {
            url: self.eval_url.clone(),
            depth: self.eval_depth,
            variants: self.eval_variants,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Helper to resolve the settings file path
///
/// Returns `settings.json` in the user's configuration directory, or in the
/// current directory if none can be determined.
pub fn settings_path() -> PathBuf {
    match config_dir() {
        Ok(dir) => dir.join(SETTINGS_FILENAME),
        Err(_) => PathBuf::from(SETTINGS_FILENAME),
    }
}

fn config_dir() -> CoreResult<PathBuf> {
    ProjectDirs::from("com", "chess-session", "ChessSession")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(CoreError::ConfigDirUnavailable)
}

/// Read settings from `path`
pub fn read_settings(path: &Path) -> CoreResult<SessionSettings> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Load settings from `path`, falling back to defaults
pub fn load_settings(path: &Path) -> SessionSettings {
    if !path.exists() {
        info!("[SETTINGS] No settings file found at {:?}. Using defaults.", path);
        return SessionSettings::default();
    }
    match read_settings(path) {
        Ok(settings) => {
            info!("[SETTINGS] Loaded settings from {:?}", path);
            settings
        }
        Err(e) => {
            warn!("[SETTINGS] Failed to load settings at {:?}: {}. Using defaults.", path, e);
            SessionSettings::default()
        }
    }
}

/// Save settings to `path`, creating its directory if needed
pub fn save_settings(settings: &SessionSettings, path: &Path) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;
    info!("[SETTINGS] Saved settings to {:?}", path);
    Ok(())
}
