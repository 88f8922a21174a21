use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_STORAGE_KEY: &str = "techstore_history_v1";
pub const DEFAULT_ENDPOINT: &str = "/api/chat/";
pub const DEFAULT_UNDO_WINDOW_MS: u64 = 4_000;
pub const DEFAULT_TOAST_FADE_MS: u64 = 500;

/// Widget settings. Every field has a default, so partial JSON or TOML works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Key the history blob is stored under
    pub storage_key: String,
    /// Path (browser) or URL (terminal) the chat request is posted to
    pub endpoint: String,
    pub undo_window_ms: u64,
    pub toast_fade_ms: u64,
    /// Render bot replies as markdown where the surface supports it
    pub render_markdown: bool,
    pub labels: Labels,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            undo_window_ms: DEFAULT_UNDO_WINDOW_MS,
            toast_fade_ms: DEFAULT_TOAST_FADE_MS,
            render_markdown: true,
            labels: Labels::default(),
        }
    }
}

/// User-facing strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub online: String,
    pub typing: String,
    pub error_prefix: String,
    pub connection_error: String,
    pub empty_reply: String,
    pub undo_notice: String,
    pub undo_button: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            online: "Online now".to_string(),
            typing: "Typing...".to_string(),
            error_prefix: "Error: ".to_string(),
            connection_error: "Connection error.".to_string(),
            empty_reply: "Empty response from server.".to_string(),
            undo_notice: "Conversation deleted.".to_string(),
            undo_button: "UNDO".to_string(),
        }
    }
}

impl WidgetConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_key must not be empty".to_string()));
        }
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("endpoint must not be empty".to_string()));
        }
        if self.undo_window_ms == 0 {
            return Err(ConfigError::Invalid(
                "undo_window_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn undo_window(&self) -> Duration {
        Duration::from_millis(self.undo_window_ms)
    }

    pub fn toast_fade(&self) -> Duration {
        Duration::from_millis(self.toast_fade_ms)
    }
}
