use futures::channel::mpsc::UnboundedSender;
use gloo_timers::callback::Timeout;
use std::time::Duration;
use storechat_core::{ScheduledTask, Scheduler, UndoToken};

/// Undo countdowns on `setTimeout`. A fired countdown sends its token down
/// the channel; the widget's expiry task picks it up.
pub struct GlooScheduler {
    expired: UnboundedSender<UndoToken>,
}

impl GlooScheduler {
    pub fn new(expired: UnboundedSender<UndoToken>) -> Self {
        Self { expired }
    }
}

/// Dropping the inner `Timeout` clears the browser timer
pub struct GlooTask(Option<Timeout>);

impl ScheduledTask for GlooTask {
    fn cancel(&mut self) {
        if let Some(timeout) = self.0.take() {
            let _ = timeout.cancel();
        }
    }
}

impl Scheduler for GlooScheduler {
    type Task = GlooTask;

    fn schedule(&self, token: UndoToken, delay: Duration) -> GlooTask {
        let expired = self.expired.clone();
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);

        let timeout = Timeout::new(millis, move || {
            if expired.unbounded_send(token).is_err() {
                log::warn!("Undo expiry {} dropped, widget is gone", token.generation());
            }
        });
        GlooTask(Some(timeout))
    }
}
