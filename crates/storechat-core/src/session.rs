use chrono::{DateTime, Utc};

use crate::config::{Labels, WidgetConfig};
use crate::error::ApiError;
use crate::history::History;
use crate::message::Sender;
use crate::protocol::{ChatOutcome, ChatResponse};
use crate::render::{render_error, render_history, render_message, Status, ViewOp};
use crate::store::KeyValueStore;
use crate::undo::{PendingDeletion, Scheduler, UndoController, UndoState, UndoToken};

/// How a send ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input, nothing happened
    Ignored,
    /// Reply received and stored
    Replied,
    /// Endpoint answered with an error payload
    Rejected(String),
    /// Endpoint answered with neither reply nor error
    EmptyReply,
    /// Request never completed
    ConnectionFailed,
}

/// A user message accepted for sending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub text: String,
    pub ops: Vec<ViewOp>,
}

/// All per-page state of the widget: history, pending undo and the number
/// of requests awaiting a reply.
///
/// Operations are synchronous and return the view operations that bring the
/// display in line with the new state.
pub struct ChatSession<S, T: Scheduler> {
    history: History<S>,
    undo: UndoController<T>,
    labels: Labels,
    in_flight: usize,
}

impl<S: KeyValueStore, T: Scheduler> ChatSession<S, T> {
    pub fn new(store: S, scheduler: T, config: &WidgetConfig) -> Self {
        Self {
            history: History::new(store, config.storage_key.clone()),
            undo: UndoController::new(scheduler, config.undo_window()),
            labels: config.labels.clone(),
            in_flight: 0,
        }
    }

    /// Restore stored history; renders it when something was found
    pub fn load(&mut self) -> Vec<ViewOp> {
        if self.history.load() {
            render_history(self.history.messages())
        } else {
            Vec::new()
        }
    }

    /// Full redraw of the current history
    pub fn render(&self) -> Vec<ViewOp> {
        let mut ops = render_history(self.history.messages());
        self.redraw_typing(&mut ops);
        ops
    }

    /// Delete the conversation, keeping it undoable for the undo window
    pub fn clear(&mut self, now: DateTime<Utc>) -> Vec<ViewOp> {
        let Some(snapshot) = self.history.clear() else {
            log::debug!("Nothing to clear");
            return Vec::new();
        };

        let count = snapshot.len();
        let token = self.undo.arm(snapshot, now);
        log::info!("Cleared {} messages (undo token {})", count, token.generation());

        let mut ops = vec![ViewOp::ClearMessages];
        self.redraw_typing(&mut ops);
        ops.push(ViewOp::ShowUndoToast);
        ops
    }

    /// Bring back the most recently cleared conversation if still allowed
    pub fn undo(&mut self, now: DateTime<Utc>) -> Vec<ViewOp> {
        if self.undo.state() == UndoState::Idle {
            return Vec::new();
        }

        match self.undo.take(now) {
            Some(snapshot) => {
                log::info!("Restoring {} messages", snapshot.len());
                self.history.restore(snapshot);
                let mut ops = self.render();
                ops.push(ViewOp::RemoveUndoToast);
                ops
            }
            None => vec![ViewOp::DismissUndoToast],
        }
    }

    /// Undo countdown elapsed
    pub fn expire(&mut self, token: UndoToken) -> Vec<ViewOp> {
        if self.undo.expire(token) {
            vec![ViewOp::DismissUndoToast]
        } else {
            Vec::new()
        }
    }

    /// Store the user's message and enter the awaiting-reply state.
    ///
    /// Returns `None` for blank input.
    pub fn begin_send(&mut self, input: &str) -> Option<OutgoingMessage> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }

        let message = self.history.append(text, Sender::User);
        let mut ops = vec![render_message(message), ViewOp::ClearInput];

        if self.in_flight == 0 {
            ops.push(ViewOp::ShowTyping);
            ops.push(ViewOp::SetStatus(Status::Typing));
        }
        ops.push(ViewOp::ScrollToBottom);
        self.in_flight += 1;

        log::debug!("Sending message ({} awaiting reply)", self.in_flight);
        Some(OutgoingMessage {
            text: text.to_string(),
            ops,
        })
    }

    /// Handle the endpoint's answer to one earlier [`Self::begin_send`]
    pub fn finish_send(
        &mut self,
        result: Result<ChatResponse, ApiError>,
    ) -> (SendOutcome, Vec<ViewOp>) {
        self.in_flight = self.in_flight.saturating_sub(1);

        let mut ops = Vec::new();
        if self.in_flight == 0 {
            ops.push(ViewOp::HideTyping);
            ops.push(ViewOp::SetStatus(Status::Online));
        }

        let outcome = match result.map(ChatResponse::into_outcome) {
            Ok(Some(ChatOutcome::Reply(reply))) => {
                let message = self.history.append(reply, Sender::Bot);
                ops.push(render_message(message));
                SendOutcome::Replied
            }
            Ok(Some(ChatOutcome::Error(error))) => {
                log::warn!("Chat endpoint returned an error: {}", error);
                ops.push(render_error(format!("{}{}", self.labels.error_prefix, error)));
                SendOutcome::Rejected(error)
            }
            Ok(None) => {
                log::warn!("Chat endpoint returned neither reply nor error");
                ops.push(render_error(self.labels.empty_reply.as_str()));
                SendOutcome::EmptyReply
            }
            Err(e) => {
                log::warn!("Chat request failed: {}", e);
                ops.push(render_error(self.labels.connection_error.as_str()));
                SendOutcome::ConnectionFailed
            }
        };

        ops.push(ViewOp::ScrollToBottom);
        (outcome, ops)
    }

    pub fn history(&self) -> &History<S> {
        &self.history
    }

    pub fn undo_state(&self) -> UndoState {
        self.undo.state()
    }

    pub fn pending_deletion(&self) -> Option<&PendingDeletion> {
        self.undo.pending()
    }

    pub fn scheduler(&self) -> &T {
        self.undo.scheduler()
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.in_flight > 0
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn into_store(self) -> S {
        self.history.into_store()
    }

    // Clearing the message list also wipes a typing indicator living in it
    fn redraw_typing(&self, ops: &mut Vec<ViewOp>) {
        if self.in_flight > 0 {
            ops.push(ViewOp::ShowTyping);
        }
    }
}
