//! Cancellable fixed-cadence polling tasks.
//!
//! A poll loop runs one cycle, then sleeps for the configured period, then
//! runs the next cycle. The next cycle is scheduled only after the current
//! one completes, so a loop is never reentrant. Cancellation is cooperative:
//! the loop checks its token before every cycle and during the inter-cycle
//! sleep, and the cycle closure receives the token so it can discard results
//! that complete after a cancellation request.
//!
//! Each loop has a single owner: the [`PollHandle`] returned by
//! [`spawn_poll_loop`]. Dropping the handle cancels the loop at its next
//! checkpoint.

use std::ops::ControlFlow;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Cancellation signal observed by a poll loop.
#[derive(Clone, Debug)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// True once cancellation has been requested (or the source dropped).
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Wait until cancellation is requested.
    pub async fn cancelled(&mut self) {
        while !*self.rx.borrow() {
            // A dropped source counts as cancellation.
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}

/// Owning side of a cancellation signal.
#[derive(Debug)]
pub struct CancelSource {
    tx: watch::Sender<bool>,
}

impl CancelSource {
    /// Create a new, un-cancelled source.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Create a token tied to this source.
    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
        }
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }

    /// True if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for CancelSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Single owner of a running poll loop.
pub struct PollHandle {
    cancel: CancelSource,
    join: JoinHandle<()>,
}

impl PollHandle {
    /// Request the loop to stop. No state mutation from the loop is
    /// observable after this returns and the current cycle (if any) ends.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// True if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// True once the loop task has exited.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the loop task to exit.
    pub async fn join(self) {
        let _ = self.join.await;
    }
}

/// Spawn a fixed-cadence poll loop.
///
/// `cycle` is invoked once per period. Returning `ControlFlow::Break(())`
/// ends the loop (e.g. on source loss). The cycle runs to completion before
/// the next one is scheduled.
pub fn spawn_poll_loop<F>(name: &'static str, period: Duration, mut cycle: F) -> PollHandle
where
    F: FnMut(&CancelToken) -> ControlFlow<()> + Send + 'static,
{
    let cancel = CancelSource::new();
    let mut token = cancel.token();

    let join = tokio::spawn(async move {
        loop {
            if token.is_cancelled() {
                break;
            }
            if cycle(&token).is_break() {
                tracing::debug!(task = name, "poll loop ended by cycle");
                break;
            }
            tokio::select! {
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(period) => {}
            }
        }
        tracing::debug!(task = name, "poll loop stopped");
    });

    PollHandle { cancel, join }
}
