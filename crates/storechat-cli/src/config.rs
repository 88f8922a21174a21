use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use storechat_core::WidgetConfig;

use crate::cli::Cli;

/// Build the widget config from defaults, the optional TOML file and CLI flags
pub fn load_config(cli: &Cli) -> Result<WidgetConfig> {
    let mut config = match &cli.config {
        Some(path) => read_config_file(path)?,
        None => WidgetConfig::default(),
    };

    if let Some(ms) = cli.undo_window_ms {
        config.undo_window_ms = ms;
    }

    config.validate()?;
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<WidgetConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&text)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Full URL of the chat endpoint. Absolute endpoints are used as they are.
pub fn endpoint_url(base_url: &str, endpoint: &str) -> String {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        return endpoint.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

/// Get or create the history directory (default ~/.storechat)
pub fn history_dir(cli: &Cli) -> Result<PathBuf> {
    let dir = match &cli.history_dir {
        Some(dir) => dir.clone(),
        None => {
            let home_dir = std::env::var("HOME")
                .or_else(|_| std::env::var("USERPROFILE"))
                .context("Failed to get home directory")?;
            PathBuf::from(home_dir).join(".storechat")
        }
    };

    if !dir.exists() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create history directory: {}", dir.display()))?;
    }

    Ok(dir)
}
