use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::sync::mpsc as std_mpsc;
use storechat_core::{ChatController, ChatSession};
use tokio::sync::mpsc;

use crate::cli::Cli;
use crate::config::{endpoint_url, history_dir, load_config};
use crate::file_store::FileStore;
use crate::http_api::HttpChatApi;
use crate::terminal::TerminalSurface;
use crate::timer::TokioScheduler;

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(String),
    Clear,
    Undo,
    History,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "/clear" => Command::Clear,
            "/undo" => Command::Undo,
            "/history" => Command::History,
            "/help" => Command::Help,
            "/quit" | "exit" | "quit" => Command::Quit,
            _ => Command::Send(line.to_string()),
        }
    }
}

/// Run interactive REPL mode
pub async fn run_repl(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let dir = history_dir(cli)?;
    let url = endpoint_url(&cli.url, &config.endpoint);

    println!("{}", "🛒 storechat".bright_cyan().bold());
    println!("{}", format!("Endpoint: {}", url).bright_black());
    println!("{}", format!("History: {}", dir.display()).bright_black());
    print_help();

    let (expired_tx, mut expired_rx) = mpsc::unbounded_channel();
    let session = ChatSession::new(
        FileStore::new(&dir),
        TokioScheduler::new(expired_tx),
        &config,
    );
    let controller = ChatController::new(
        session,
        HttpChatApi::new(url),
        TerminalSurface::stdout(&config),
    );
    controller.load();

    let (line_tx, mut line_rx) = mpsc::unbounded_channel();
    let (ready_tx, ready_rx) = std_mpsc::channel();
    spawn_reader(line_tx, ready_rx);

    loop {
        tokio::select! {
            line = line_rx.recv() => {
                let Some(line) = line else {
                    break;
                };

                match Command::parse(&line) {
                    Command::Quit => break,
                    Command::Clear => controller.clear(),
                    Command::Undo => controller.undo(),
                    Command::History => controller.redraw(),
                    Command::Help => print_help(),
                    Command::Send(text) => {
                        let outcome = controller.send(&text).await;
                        log::debug!("Send finished: {:?}", outcome);
                    }
                }

                // Let the reader prompt again
                if ready_tx.send(()).is_err() {
                    break;
                }
            }
            Some(token) = expired_rx.recv() => controller.expire(token),
        }
    }

    println!("{}", "Bye!".bright_black());
    Ok(())
}

/// Read lines on a blocking thread. The next prompt waits until the previous
/// line has been handled.
fn spawn_reader(lines: mpsc::UnboundedSender<String>, ready: std_mpsc::Receiver<()>) {
    std::thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                log::error!("Failed to start line editor: {}", e);
                return;
            }
        };

        loop {
            match editor.readline("› ") {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = editor.add_history_entry(line.as_str());
                    }
                    if lines.send(line).is_err() || ready.recv().is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(e) => {
                    log::error!("Readline error: {}", e);
                    break;
                }
            }
        }
    });
}

fn print_help() {
    println!(
        "{}",
        "Type a message to chat. Commands: /clear, /undo, /history, /help, /quit\n".bright_black()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/clear"), Command::Clear);
        assert_eq!(Command::parse(" /undo "), Command::Undo);
        assert_eq!(Command::parse("/history"), Command::History);
        assert_eq!(Command::parse("exit"), Command::Quit);
        assert_eq!(Command::parse("/quit"), Command::Quit);
    }

    #[test]
    fn test_everything_else_is_sent() {
        assert_eq!(
            Command::parse("do you have a /clear plastic case?"),
            Command::Send("do you have a /clear plastic case?".to_string())
        );
        assert_eq!(Command::parse("  "), Command::Send("  ".to_string()));
    }
}
