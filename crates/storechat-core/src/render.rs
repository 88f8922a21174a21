//! Projection of history onto a display.
//!
//! The renderer never touches a display itself: it turns messages into
//! [`ViewOp`]s, and a [`Surface`] (DOM, terminal, or [`ViewState`] in tests)
//! applies them.

use crate::message::{Message, Sender};

/// Visual flavour of a chat bubble
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubbleKind {
    User,
    Bot,
    /// Bot-side notice that is shown but never stored
    Error,
}

impl BubbleKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            BubbleKind::User => "message user",
            BubbleKind::Bot => "message bot",
            BubbleKind::Error => "message bot error",
        }
    }
}

impl From<Sender> for BubbleKind {
    fn from(sender: Sender) -> Self {
        match sender {
            Sender::User => BubbleKind::User,
            Sender::Bot => BubbleKind::Bot,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Online,
    Typing,
}

/// One display instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewOp {
    ClearMessages,
    AppendBubble { kind: BubbleKind, text: String },
    ShowTyping,
    HideTyping,
    SetStatus(Status),
    ClearInput,
    /// Show the undo affordance, replacing any one already shown
    ShowUndoToast,
    /// Fade the undo affordance out, then remove it
    DismissUndoToast,
    /// Remove the undo affordance immediately
    RemoveUndoToast,
    ScrollToBottom,
}

pub fn render_message(message: &Message) -> ViewOp {
    ViewOp::AppendBubble {
        kind: message.sender().into(),
        text: message.text().to_string(),
    }
}

/// A bubble that is shown but never stored
pub fn render_error(text: impl Into<String>) -> ViewOp {
    ViewOp::AppendBubble {
        kind: BubbleKind::Error,
        text: text.into(),
    }
}

/// Full redraw: clear the display, then one bubble per message
pub fn render_history(messages: &[Message]) -> Vec<ViewOp> {
    let mut ops = Vec::with_capacity(messages.len() + 2);
    ops.push(ViewOp::ClearMessages);
    ops.extend(messages.iter().map(render_message));
    ops.push(ViewOp::ScrollToBottom);
    ops
}

/// Applies view operations to something the user can see
pub trait Surface {
    fn apply(&self, op: &ViewOp);

    fn apply_all(&self, ops: &[ViewOp]) {
        for op in ops {
            self.apply(op);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastState {
    #[default]
    Hidden,
    Visible,
    Fading,
}

/// In-memory display model built by folding [`ViewOp`]s.
///
/// Mirrors what a DOM surface would show; useful for checking that the
/// display matches the history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub bubbles: Vec<(BubbleKind, String)>,
    pub typing_indicators: usize,
    pub status: Status,
    pub toast: ToastState,
    pub input_cleared: usize,
}

impl ViewState {
    pub fn apply(&mut self, op: &ViewOp) {
        match op {
            ViewOp::ClearMessages => {
                self.bubbles.clear();
                self.typing_indicators = 0;
            }
            ViewOp::AppendBubble { kind, text } => self.bubbles.push((*kind, text.clone())),
            ViewOp::ShowTyping => self.typing_indicators += 1,
            ViewOp::HideTyping => self.typing_indicators = 0,
            ViewOp::SetStatus(status) => self.status = *status,
            ViewOp::ClearInput => self.input_cleared += 1,
            ViewOp::ShowUndoToast => self.toast = ToastState::Visible,
            ViewOp::DismissUndoToast => {
                if self.toast == ToastState::Visible {
                    self.toast = ToastState::Fading;
                }
            }
            ViewOp::RemoveUndoToast => self.toast = ToastState::Hidden,
            ViewOp::ScrollToBottom => {}
        }
    }

    /// Bubbles that stand for stored messages, error notices left out
    pub fn conversation(&self) -> Vec<Message> {
        self.bubbles
            .iter()
            .filter_map(|(kind, text)| match kind {
                BubbleKind::User => Some(Message::user(text.clone())),
                BubbleKind::Bot => Some(Message::bot(text.clone())),
                BubbleKind::Error => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_history_clears_first() {
        let ops = render_history(&[Message::user("hello"), Message::bot("hi there")]);
        assert_eq!(
            ops,
            vec![
                ViewOp::ClearMessages,
                ViewOp::AppendBubble { kind: BubbleKind::User, text: "hello".into() },
                ViewOp::AppendBubble { kind: BubbleKind::Bot, text: "hi there".into() },
                ViewOp::ScrollToBottom,
            ]
        );
    }

    #[test]
    fn test_rerender_does_not_duplicate() {
        let history = [Message::user("hello"), Message::bot("hi there")];
        let mut view = ViewState::default();
        for _ in 0..2 {
            for op in render_history(&history) {
                view.apply(&op);
            }
        }
        assert_eq!(view.conversation(), history);
    }

    #[test]
    fn test_conversation_skips_error_bubbles() {
        let mut view = ViewState::default();
        view.apply(&render_message(&Message::user("hello")));
        view.apply(&render_error("Error: down"));
        assert_eq!(view.bubbles.len(), 2);
        assert_eq!(view.conversation(), vec![Message::user("hello")]);
    }

    #[test]
    fn test_css_classes() {
        assert_eq!(BubbleKind::from(Sender::User).css_class(), "message user");
        assert_eq!(BubbleKind::Error.css_class(), "message bot error");
    }
}
