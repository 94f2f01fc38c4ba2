//! Run token: The cooperative cancellation signal for one `play` run.
//!
//! Every run gets its own token, shared by all of that run's interpreter
//! threads. Cancelling sets an atomic flag for the cheap per-instruction
//! check and disconnects a channel so that threads parked in a loop delay
//! wake at once instead of sleeping out the tick.

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Cancellation token shared by the threads of one run.
#[derive(Debug, Clone)]
pub struct RunToken {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    cancelled: AtomicBool,
    /// Dropped on cancel; never sent on.
    stop_tx: Mutex<Option<Sender<()>>>,
    stop_rx: Receiver<()>,
}

impl RunToken {
    /// Create a live token.
    pub fn new() -> Self {
        let (stop_tx, stop_rx) = bounded(0);
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                stop_tx: Mutex::new(Some(stop_tx)),
                stop_rx,
            }),
        }
    }

    /// Whether the run has been stopped.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Stop the run. Idempotent.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
        self.inner
            .stop_tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    /// Suspend for `delay` unless the run is stopped first.
    ///
    /// Returns `true` if the full delay elapsed with the run still live.
    pub fn wait(&self, delay: Duration) -> bool {
        if self.is_cancelled() {
            return false;
        }
        match self.inner.stop_rx.recv_timeout(delay) {
            Err(RecvTimeoutError::Timeout) => !self.is_cancelled(),
            Ok(()) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    /// Whether two tokens belong to the same run.
    pub fn same_run(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for RunToken {
    fn default() -> Self {
        Self::new()
    }
}
