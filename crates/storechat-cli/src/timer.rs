use std::time::Duration;
use storechat_core::{ScheduledTask, Scheduler, UndoToken};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Undo countdowns as sleeping tokio tasks. A countdown that runs out sends
/// its token to the REPL loop.
pub struct TokioScheduler {
    expired: UnboundedSender<UndoToken>,
}

impl TokioScheduler {
    pub fn new(expired: UnboundedSender<UndoToken>) -> Self {
        Self { expired }
    }
}

pub struct TokioTask(JoinHandle<()>);

impl ScheduledTask for TokioTask {
    fn cancel(&mut self) {
        // Aborting a finished or already aborted task is a no-op
        self.0.abort();
    }
}

impl Scheduler for TokioScheduler {
    type Task = TokioTask;

    fn schedule(&self, token: UndoToken, delay: Duration) -> TokioTask {
        let expired = self.expired.clone();
        TokioTask(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = expired.send(token);
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storechat_core::{ChatSession, MemoryStore, UndoState, WidgetConfig};
    use tokio::sync::mpsc;

    fn session(
        tx: UnboundedSender<UndoToken>,
    ) -> ChatSession<MemoryStore, TokioScheduler> {
        let mut session = ChatSession::new(
            MemoryStore::new(),
            TokioScheduler::new(tx),
            &WidgetConfig::default(),
        );
        session.begin_send("hello").unwrap();
        session
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_reports_expiry() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut session = session(tx);

        session.clear(chrono::Utc::now());
        let token = session.pending_deletion().unwrap().token();

        tokio::time::sleep(Duration::from_millis(3_999)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(rx.recv().await, Some(token));

        session.expire(token);
        assert_eq!(session.undo_state(), UndoState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_countdown_never_fires() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut session = session(tx);

        let now = chrono::Utc::now();
        session.clear(now);
        session.undo(now);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(session.history().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_clear_cancels_first_countdown() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut session = session(tx);

        let now = chrono::Utc::now();
        session.clear(now);
        session.begin_send("again").unwrap();
        session.clear(now);
        let second = session.pending_deletion().unwrap().token();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(rx.recv().await, Some(second));
        assert!(rx.try_recv().is_err());
    }
}
