use chrono::Utc;
use std::cell::{Ref, RefCell};

use crate::protocol::ChatApi;
use crate::render::{Surface, ViewOp};
use crate::session::{ChatSession, SendOutcome};
use crate::store::KeyValueStore;
use crate::undo::{Scheduler, UndoToken};

/// Wires a [`ChatSession`] to an endpoint and a display.
///
/// Meant to live behind an `Rc` on a single-threaded event loop. The session
/// borrow is never held across an await, so sends may overlap with each
/// other and with clear/undo.
pub struct ChatController<S, T: Scheduler, A, V> {
    session: RefCell<ChatSession<S, T>>,
    api: A,
    surface: V,
}

impl<S, T, A, V> ChatController<S, T, A, V>
where
    S: KeyValueStore,
    T: Scheduler,
    A: ChatApi,
    V: Surface,
{
    pub fn new(session: ChatSession<S, T>, api: A, surface: V) -> Self {
        Self {
            session: RefCell::new(session),
            api,
            surface,
        }
    }

    /// Load stored history and draw it
    pub fn load(&self) {
        let ops = self.session.borrow_mut().load();
        self.show(&ops);
    }

    /// Redraw the whole conversation
    pub fn redraw(&self) {
        let ops = self.session.borrow().render();
        self.show(&ops);
    }

    /// Send one user message and display the outcome
    pub async fn send(&self, input: &str) -> SendOutcome {
        let outgoing = self.session.borrow_mut().begin_send(input);
        let Some(outgoing) = outgoing else {
            return SendOutcome::Ignored;
        };
        self.show(&outgoing.ops);

        let result = self.api.send_chat_message(&outgoing.text).await;

        let (outcome, ops) = self.session.borrow_mut().finish_send(result);
        self.show(&ops);
        outcome
    }

    pub fn clear(&self) {
        let ops = self.session.borrow_mut().clear(Utc::now());
        self.show(&ops);
    }

    pub fn undo(&self) {
        let ops = self.session.borrow_mut().undo(Utc::now());
        self.show(&ops);
    }

    /// Called by the scheduler's owner when an undo countdown fires
    pub fn expire(&self, token: UndoToken) {
        let ops = self.session.borrow_mut().expire(token);
        self.show(&ops);
    }

    pub fn session(&self) -> Ref<'_, ChatSession<S, T>> {
        self.session.borrow()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn surface(&self) -> &V {
        &self.surface
    }

    fn show(&self, ops: &[ViewOp]) {
        if !ops.is_empty() {
            self.surface.apply_all(ops);
        }
    }
}
