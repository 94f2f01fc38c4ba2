//! Timer Actor: Dedicated thread for message and highlight expiry.
//!
//! This actor keeps a schedule of deadlines and fires each one through a
//! callback. Arming and cancelling are non-blocking channel sends, so they
//! are safe to issue while holding the engine's world lock.

use super::messages::{Expiry, TimerCommand, TimerHandle};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::debug;

/// Timer actor that fires expiries on a dedicated thread.
#[derive(Debug)]
pub struct TimerActor {
    /// Command sender.
    tx: Sender<TimerCommand>,
    /// Next token to hand out.
    next_handle: AtomicU64,
    /// Handle to the timer thread, once started.
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl TimerActor {
    /// Create the actor and the command receiver its thread will own.
    ///
    /// Nothing fires until [`TimerActor::start`] is called.
    pub fn new() -> (Self, Receiver<TimerCommand>) {
        let (tx, rx) = unbounded();
        let actor = Self {
            tx,
            next_handle: AtomicU64::new(1),
            handle: Mutex::new(None),
        };
        (actor, rx)
    }

    /// Spawn the timer thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS fails to spawn the thread.
    pub fn start<F>(&self, rx: Receiver<TimerCommand>, on_expire: F) -> io::Result<()>
    where
        F: FnMut(TimerHandle, Expiry) + Send + 'static,
    {
        let handle = thread::Builder::new()
            .name("stagecraft-timer".to_string())
            .spawn(move || {
                Self::run_loop(&rx, on_expire);
            })?;
        *self.handle.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
        Ok(())
    }

    /// Arm a timer that fires `expiry` after `delay`.
    pub fn arm(&self, delay: Duration, expiry: Expiry) -> TimerHandle {
        let handle = TimerHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        let deadline = Instant::now()
            .checked_add(delay)
            .unwrap_or_else(far_future);
        let _ = self.tx.send(TimerCommand::Arm {
            handle,
            deadline,
            expiry,
        });
        handle
    }

    /// Cancel a timer. Cancelling a fired or unknown timer is a no-op.
    pub fn cancel(&self, handle: TimerHandle) {
        let _ = self.tx.send(TimerCommand::Cancel(handle));
    }

    /// Signal the timer thread to shutdown.
    pub fn shutdown(&self) {
        let _ = self.tx.send(TimerCommand::Shutdown);
    }

    /// Main timer loop.
    fn run_loop<F>(rx: &Receiver<TimerCommand>, mut on_expire: F)
    where
        F: FnMut(TimerHandle, Expiry),
    {
        let mut schedule = Schedule::default();

        loop {
            let command = match schedule.next_deadline() {
                Some(deadline) => {
                    let wait = deadline.saturating_duration_since(Instant::now());
                    match rx.recv_timeout(wait) {
                        Ok(command) => Some(command),
                        Err(RecvTimeoutError::Timeout) => None,
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                None => match rx.recv() {
                    Ok(command) => Some(command),
                    Err(_) => break,
                },
            };

            match command {
                Some(TimerCommand::Arm {
                    handle,
                    deadline,
                    expiry,
                }) => schedule.insert(handle, deadline, expiry),
                Some(TimerCommand::Cancel(handle)) => schedule.remove(handle),
                Some(TimerCommand::Shutdown) => break,
                None => {}
            }

            for (handle, expiry) in schedule.take_due(Instant::now()) {
                debug!(timer = handle.0, sprite = %expiry.sprite(), "timer_fired");
                on_expire(handle, expiry);
            }
        }
    }
}

impl Drop for TimerActor {
    fn drop(&mut self) {
        self.shutdown();
        let handle = self
            .handle
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            // The last engine reference can be released from inside a
            // callback, i.e. on the timer thread itself.
            if handle.thread().id() != thread::current().id() {
                let _ = handle.join();
            }
        }
    }
}

fn far_future() -> Instant {
    // Roughly thirty years; Instant has no MAX.
    Instant::now() + Duration::from_secs(60 * 60 * 24 * 365 * 30)
}

/// Pending timers ordered by deadline.
#[derive(Debug, Default)]
struct Schedule {
    queue: BinaryHeap<Reverse<(Instant, TimerHandle)>>,
    live: HashMap<TimerHandle, Expiry>,
}

impl Schedule {
    fn insert(&mut self, handle: TimerHandle, deadline: Instant, expiry: Expiry) {
        self.live.insert(handle, expiry);
        self.queue.push(Reverse((deadline, handle)));
    }

    fn remove(&mut self, handle: TimerHandle) {
        // Heap entries of removed timers are skipped lazily.
        self.live.remove(&handle);
    }

    fn next_deadline(&mut self) -> Option<Instant> {
        while let Some(Reverse((deadline, handle))) = self.queue.peek() {
            if self.live.contains_key(handle) {
                return Some(*deadline);
            }
            self.queue.pop();
        }
        None
    }

    fn take_due(&mut self, now: Instant) -> Vec<(TimerHandle, Expiry)> {
        let mut due = Vec::new();
        while let Some(Reverse((deadline, handle))) = self.queue.peek() {
            if *deadline > now {
                break;
            }
            let handle = *handle;
            self.queue.pop();
            if let Some(expiry) = self.live.remove(&handle) {
                due.push((handle, expiry));
            }
        }
        due
    }
}
