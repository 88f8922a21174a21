use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for storechat
#[derive(Parser, Debug)]
#[command(name = "storechat")]
#[command(about = "Terminal chat client with locally kept, undoable history")]
#[command(version)]
pub struct Cli {
    /// Base URL of the chat server; the configured endpoint path is appended
    #[arg(long, env = "STORECHAT_URL", default_value = "http://127.0.0.1:8000")]
    pub url: String,

    /// Directory holding the history file (default: ~/.storechat)
    #[arg(long, env = "STORECHAT_HISTORY_DIR", value_name = "DIR")]
    pub history_dir: Option<PathBuf>,

    /// TOML file overriding widget settings (endpoint, undo window, labels...)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Undo window in milliseconds, overrides the config file
    #[arg(long, value_name = "MS")]
    pub undo_window_ms: Option<u64>,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["storechat"]).unwrap();
        assert!(cli.config.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "storechat",
            "--url",
            "https://shop.example",
            "--undo-window-ms",
            "2000",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.url, "https://shop.example");
        assert_eq!(cli.undo_window_ms, Some(2000));
        assert!(cli.verbose);
    }
}
