//! Configuration for the brewlab-game driver.

use serde::Deserialize;

/// Game configuration.
///
/// Loaded from the `brewlab.toml` `[game]` section or
/// `BREWLAB_GAME__` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    /// Directory holding the JSON-lines round and feedback logs.
    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    /// Completion code shown on the end screen.
    #[serde(default = "default_exit_code")]
    pub exit_code: String,
}

fn default_log_dir() -> String {
    "./brewlab-logs".to_string()
}

fn default_exit_code() -> String {
    "CAEU04L5".to_string()
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            exit_code: default_exit_code(),
        }
    }
}
