use colored::Colorize;
use std::cell::RefCell;
use std::io::{self, Write};
use std::time::Duration;
use storechat_core::{BubbleKind, Labels, Status, Surface, ViewOp, WidgetConfig};

/// Prints view operations as chat lines
pub struct TerminalSurface<W: Write> {
    out: RefCell<W>,
    labels: Labels,
    undo_window: Duration,
}

impl TerminalSurface<io::Stdout> {
    pub fn stdout(config: &WidgetConfig) -> Self {
        Self::new(io::stdout(), config)
    }
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, config: &WidgetConfig) -> Self {
        Self {
            out: RefCell::new(out),
            labels: config.labels.clone(),
            undo_window: config.undo_window(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    /// Line printed for `op`, if it has a visible effect in a terminal
    fn format_op(&self, op: &ViewOp) -> Option<String> {
        match op {
            ViewOp::ClearMessages => Some(format!("{}", "────────────────────────".bright_black())),
            ViewOp::AppendBubble { kind, text } => Some(match kind {
                BubbleKind::User => format!("{} {}", "you ›".bright_cyan().bold(), text),
                BubbleKind::Bot => format!("{} {}", "bot ›".green().bold(), text),
                BubbleKind::Error => format!("{} {}", "bot ›".red().bold(), text.red()),
            }),
            ViewOp::ShowTyping => Some(format!("{}", self.labels.typing.bright_black())),
            ViewOp::SetStatus(Status::Online) | ViewOp::SetStatus(Status::Typing) => None,
            ViewOp::ShowUndoToast => Some(format!(
                "{} {}",
                self.labels.undo_notice.yellow(),
                format!(
                    "Type /undo within {}s to restore it.",
                    self.undo_window.as_secs_f64()
                )
                .bright_black()
            )),
            ViewOp::DismissUndoToast => {
                Some(format!("{}", "Undo is no longer available.".bright_black()))
            }
            ViewOp::HideTyping
            | ViewOp::ClearInput
            | ViewOp::RemoveUndoToast
            | ViewOp::ScrollToBottom => None,
        }
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn apply(&self, op: &ViewOp) {
        let Some(line) = self.format_op(op) else {
            return;
        };

        let mut out = self.out.borrow_mut();
        if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
            log::error!("Failed to write to terminal: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(ops: &[ViewOp]) -> String {
        colored::control::set_override(false);
        let surface = TerminalSurface::new(Vec::new(), &WidgetConfig::default());
        surface.apply_all(ops);
        String::from_utf8(surface.into_inner()).unwrap()
    }

    #[test]
    fn test_bubbles_are_prefixed_by_sender() {
        let output = render(&[
            ViewOp::AppendBubble { kind: BubbleKind::User, text: "hello".into() },
            ViewOp::AppendBubble { kind: BubbleKind::Bot, text: "hi there".into() },
            ViewOp::AppendBubble { kind: BubbleKind::Error, text: "Connection error.".into() },
        ]);
        assert_eq!(output, "you › hello\nbot › hi there\nbot › Connection error.\n");
    }

    #[test]
    fn test_undo_notice_mentions_window() {
        let output = render(&[ViewOp::ShowUndoToast]);
        assert_eq!(output, "Conversation deleted. Type /undo within 4s to restore it.\n");
    }

    #[test]
    fn test_invisible_ops_print_nothing() {
        let output = render(&[
            ViewOp::HideTyping,
            ViewOp::ClearInput,
            ViewOp::RemoveUndoToast,
            ViewOp::ScrollToBottom,
            ViewOp::SetStatus(Status::Typing),
        ]);
        assert!(output.is_empty());
    }
}
