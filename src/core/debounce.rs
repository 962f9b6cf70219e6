//! # Debouncer
//!
//! Trailing debounce on top of tokio timers. Each `schedule()` aborts the
//! timer still pending from the previous call, then starts a new one that
//! delivers its action over the channel once the delay has elapsed.
//!
//! Aborting only saves work. Correctness comes from the receiver: a search
//! ticket that lost the race is rejected by `SearchEngine::apply`.

use std::time::Duration;

use log::{debug, warn};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;

pub struct Debouncer {
    delay: Duration,
    pending: Option<AbortHandle>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Sends `action` on `tx` after the delay, unless rescheduled or cancelled first.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<A>(&mut self, tx: &UnboundedSender<A>, action: A)
    where
        A: Send + 'static,
    {
        if self.cancel() {
            debug!("Debounce timer restarted");
        }

        let tx = tx.clone();
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(action).is_err() {
                warn!("Debounced action dropped: receiver closed");
            }
        });
        self.pending = Some(handle.abort_handle());
    }

    /// Aborts the pending timer. Returns true if one was still running.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
