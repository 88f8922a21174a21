use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::message::Message;

/// Identifies one armed undo countdown.
///
/// Tokens grow monotonically, so a timer callback carrying an older token
/// can be recognized and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UndoToken(u64);

impl UndoToken {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// A countdown started by a [`Scheduler`]. Cancelling twice, or after the
/// countdown already fired, does nothing.
pub trait ScheduledTask {
    fn cancel(&mut self);
}

/// Starts undo countdowns.
///
/// When `delay` elapses the implementation must hand `token` back to
/// [`UndoController::expire`] (usually through the owning controller).
pub trait Scheduler {
    type Task: ScheduledTask;

    fn schedule(&self, token: UndoToken, delay: Duration) -> Self::Task;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoState {
    Idle,
    PendingUndo,
}

/// Snapshot taken by a clear, restorable until `expires_at`
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDeletion {
    messages: Vec<Message>,
    expires_at: DateTime<Utc>,
    token: UndoToken,
}

impl PendingDeletion {
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn token(&self) -> UndoToken {
        self.token
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

struct Pending<T> {
    deletion: PendingDeletion,
    task: T,
}

/// Holds at most one pending deletion and the countdown that discards it.
pub struct UndoController<S: Scheduler> {
    scheduler: S,
    window: Duration,
    pending: Option<Pending<S::Task>>,
    next_generation: u64,
}

impl<S: Scheduler> UndoController<S> {
    pub fn new(scheduler: S, window: Duration) -> Self {
        Self {
            scheduler,
            window,
            pending: None,
            next_generation: 0,
        }
    }

    pub fn state(&self) -> UndoState {
        if self.pending.is_some() {
            UndoState::PendingUndo
        } else {
            UndoState::Idle
        }
    }

    pub fn pending(&self) -> Option<&PendingDeletion> {
        self.pending.as_ref().map(|p| &p.deletion)
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Hold `snapshot` for undo and start a fresh countdown.
    ///
    /// Any earlier pending deletion is dropped and its countdown cancelled
    /// before the new one is scheduled.
    pub fn arm(&mut self, snapshot: Vec<Message>, now: DateTime<Utc>) -> UndoToken {
        if let Some(mut previous) = self.pending.take() {
            log::debug!(
                "Replacing pending deletion {} ({} messages)",
                previous.deletion.token.0,
                previous.deletion.messages.len()
            );
            previous.task.cancel();
        }

        self.next_generation += 1;
        let token = UndoToken(self.next_generation);
        let expires_at = now + to_chrono(self.window);
        let task = self.scheduler.schedule(token, self.window);

        self.pending = Some(Pending {
            deletion: PendingDeletion {
                messages: snapshot,
                expires_at,
                token,
            },
            task,
        });

        token
    }

    /// Take the snapshot back for restoring.
    ///
    /// Returns `None` when nothing is pending or the window has already
    /// closed; in the latter case the snapshot is discarded.
    pub fn take(&mut self, now: DateTime<Utc>) -> Option<Vec<Message>> {
        let mut pending = self.pending.take()?;
        pending.task.cancel();

        if pending.deletion.is_expired(now) {
            log::info!("Undo requested after the window closed, deletion is permanent");
            return None;
        }

        Some(pending.deletion.messages)
    }

    /// Countdown callback. Returns `true` if `token` named the pending
    /// deletion, which is now discarded.
    pub fn expire(&mut self, token: UndoToken) -> bool {
        match &self.pending {
            Some(p) if p.deletion.token == token => {}
            _ => {
                log::debug!("Ignoring stale undo expiry {}", token.0);
                return false;
            }
        }

        if let Some(mut pending) = self.pending.take() {
            pending.task.cancel();
            log::info!(
                "Undo window closed, {} messages discarded",
                pending.deletion.messages.len()
            );
        }
        true
    }

    /// Drop any pending deletion without restoring it
    pub fn discard(&mut self) -> bool {
        match self.pending.take() {
            Some(mut pending) => {
                pending.task.cancel();
                true
            }
            None => false,
        }
    }
}

fn to_chrono(window: Duration) -> chrono::Duration {
    let millis = i64::try_from(window.as_millis()).unwrap_or(i64::MAX / 1_000);
    chrono::Duration::milliseconds(millis)
}
