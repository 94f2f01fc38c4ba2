//! Message types for actor communication.
//!
//! These define the protocol between the engine, its interpreter threads
//! and the timer thread.

use crate::sprite::SpriteId;
use std::time::Instant;

/// Opaque token identifying one armed timer.
///
/// Sprite state remembers the token of its live timer; a firing timer only
/// takes effect if its token is still the remembered one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub(crate) u64);

/// What happens when a timer fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expiry {
    /// Clear the sprite's speech/thought bubble.
    Message(SpriteId),
    /// Switch off the sprite's collision highlight.
    Highlight(SpriteId),
}

impl Expiry {
    /// The sprite this timer belongs to.
    pub const fn sprite(&self) -> &SpriteId {
        match self {
            Self::Message(id) | Self::Highlight(id) => id,
        }
    }
}

/// Commands sent to the timer thread.
#[derive(Debug)]
pub enum TimerCommand {
    /// Fire `expiry` at `deadline`.
    Arm {
        /// Token of the new timer.
        handle: TimerHandle,
        /// When to fire.
        deadline: Instant,
        /// What to do.
        expiry: Expiry,
    },
    /// Forget a timer that has not fired yet.
    Cancel(TimerHandle),
    /// Shutdown the timer thread.
    Shutdown,
}

/// How a `play` request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Another run was in progress; nothing was started.
    AlreadyRunning,
    /// Every script ran to its end.
    Completed,
    /// The run was stopped before every script finished.
    Stopped,
}

/// How one sprite's interpreter ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The script ran to its end.
    Completed,
    /// The run was stopped.
    Cancelled,
    /// The sprite was unregistered or reconfigured mid-run.
    Detached,
}
