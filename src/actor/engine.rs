//! Engine: Main coordinator that ties sprites, interpreters and timers together.
//!
//! The Engine is the entry point for hosts. It owns every sprite's runtime
//! state, starts one interpreter thread per sprite on `play`, and stops
//! them cooperatively on `stop`.

use super::interpreter::Interpreter;
use super::messages::{PlayOutcome, TaskOutcome};
use super::stage::Stage;
use super::timer::TimerActor;
use super::token::RunToken;
use crate::collision::CollisionDetector;
use crate::error::EngineError;
use crate::geometry::Position;
use crate::host::{NullHost, VisualHost};
use crate::script::Instruction;
use crate::sprite::{Registration, SpriteId, SpriteSnapshot};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, debug_span, info, warn};

/// Configuration for the Engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Distance (canvas percent) below which two sprites collide.
    pub collision_threshold: f64,
    /// Pause after every step inside a repeat loop.
    pub step_delay: Duration,
    /// How long a collision highlight stays lit.
    pub highlight_duration: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            collision_threshold: CollisionDetector::DEFAULT_THRESHOLD,
            step_delay: Duration::from_millis(300),
            highlight_duration: Duration::from_millis(300),
        }
    }
}

impl EngineConfig {
    /// Set the collision threshold (builder pattern).
    #[must_use]
    pub const fn with_collision_threshold(mut self, threshold: f64) -> Self {
        self.collision_threshold = threshold;
        self
    }

    /// Set the repeat-loop step delay (builder pattern).
    #[must_use]
    pub const fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }

    /// Set the highlight duration (builder pattern).
    #[must_use]
    pub const fn with_highlight_duration(mut self, duration: Duration) -> Self {
        self.highlight_duration = duration;
        self
    }
}

/// The sprite execution engine.
///
/// Cloning is cheap and yields another handle to the same engine, so
/// `stop_all` can be called from one thread while another blocks in
/// `play_all`.
pub struct Engine<H: VisualHost = NullHost> {
    stage: Arc<Stage<H>>,
}

impl<H: VisualHost> Clone for Engine<H> {
    fn clone(&self) -> Self {
        Self {
            stage: Arc::clone(&self.stage),
        }
    }
}

impl<H: VisualHost> std::fmt::Debug for Engine<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.stage.config)
            .field("sprites", &self.len())
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl Engine<NullHost> {
    /// Create an engine with default configuration and no host.
    ///
    /// # Errors
    ///
    /// Returns an error if the timer thread cannot be spawned.
    pub fn new() -> Result<Self, EngineError> {
        Self::with_host(NullHost)
    }
}

impl<H: VisualHost> Engine<H> {
    /// Create an engine with default configuration that draws through `host`.
    ///
    /// # Errors
    ///
    /// Returns an error if the timer thread cannot be spawned.
    pub fn with_host(host: H) -> Result<Self, EngineError> {
        Self::with_config(EngineConfig::default(), host)
    }

    /// Create an engine with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the timer thread cannot be spawned.
    pub fn with_config(config: EngineConfig, host: H) -> Result<Self, EngineError> {
        let (timers, timer_rx) = TimerActor::new();
        let stage = Arc::new(Stage::new(config, host, timers));

        // The timer thread must not keep the stage alive.
        let weak = Arc::downgrade(&stage);
        stage
            .timers
            .start(timer_rx, move |timer, expiry| {
                if let Some(stage) = weak.upgrade() {
                    stage.expire(timer, &expiry);
                }
            })
            .map_err(|source| EngineError::Spawn {
                role: "timer",
                source,
            })?;

        Ok(Self { stage })
    }

    /// Get the configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.stage.config
    }

    /// Get the host.
    pub fn host(&self) -> &H {
        &self.stage.host
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register a sprite, or reconfigure it if the id is already known.
    ///
    /// The position is clamped onto the canvas and the host is notified at
    /// once. Reconfiguring replaces target, position and instructions but
    /// keeps rotation, facing and any showing message; an interpreter still
    /// running the old script exits at its next check point.
    pub fn register_sprite(
        &self,
        id: impl Into<SpriteId>,
        target: H::Target,
        position: impl Into<Position>,
        instructions: impl Into<Vec<Instruction>>,
    ) -> Registration {
        self.stage
            .register(id.into(), target, position.into(), instructions.into())
    }

    /// Remove a sprite. Returns `false` if it was not registered.
    ///
    /// An interpreter running this sprite stops at its next check point.
    pub fn unregister_sprite(&self, id: &SpriteId) -> bool {
        self.stage.unregister(id)
    }

    /// Move a sprite directly, e.g. when the host drags it.
    pub fn set_position(&self, id: &SpriteId, position: impl Into<Position>) -> bool {
        self.stage.set_position(id, position.into())
    }

    /// Replace a sprite's instructions.
    pub fn set_instructions(&self, id: &SpriteId, instructions: impl Into<Vec<Instruction>>) -> bool {
        self.stage.set_instructions(id, instructions.into())
    }

    /// Push the sprite's current visual state to the host.
    pub fn update_visuals(&self, id: &SpriteId) -> bool {
        self.stage.refresh(id)
    }

    // ------------------------------------------------------------------
    // Host read access
    // ------------------------------------------------------------------

    /// Copy of one sprite's state.
    pub fn snapshot(&self, id: &SpriteId) -> Option<SpriteSnapshot> {
        self.stage.snapshot(id)
    }

    /// Copies of every sprite's state, ordered by id.
    pub fn snapshots(&self) -> Vec<(SpriteId, SpriteSnapshot)> {
        self.stage
            .lock_world()
            .sprites
            .iter()
            .map(|(id, entry)| (id.clone(), entry.state.snapshot()))
            .collect()
    }

    /// Ids of every registered sprite, ordered.
    pub fn sprite_ids(&self) -> Vec<SpriteId> {
        self.stage.lock_world().sprites.ids().cloned().collect()
    }

    /// Number of registered sprites.
    pub fn len(&self) -> usize {
        self.stage.lock_world().sprites.len()
    }

    /// Whether no sprites are registered.
    pub fn is_empty(&self) -> bool {
        self.stage.lock_world().sprites.is_empty()
    }

    /// Check if a run is in progress and has not been stopped.
    pub fn is_running(&self) -> bool {
        self.stage.is_running()
    }

    // ------------------------------------------------------------------
    // Collisions
    // ------------------------------------------------------------------

    /// Whether two registered sprites currently collide.
    ///
    /// `None` if either sprite is not registered.
    pub fn check_collision(&self, a: &SpriteId, b: &SpriteId) -> Option<bool> {
        self.stage.check_collision(a, b)
    }

    /// Scan every pair and resolve each collision. Returns the pair count.
    pub fn check_all_collisions(&self) -> usize {
        self.stage.check_all_collisions()
    }

    /// Queue a sprite for the next deferred collision check.
    ///
    /// Returns `false` if it is unknown or already queued.
    pub fn queue_collision_check(&self, id: &SpriteId) -> bool {
        self.stage.queue_collision_check(id)
    }

    /// Drain the deferred collision queue. Returns the collisions resolved.
    pub fn process_collision_queue(&self) -> usize {
        self.stage.process_collision_queue()
    }

    // ------------------------------------------------------------------
    // Play / stop
    // ------------------------------------------------------------------

    /// Run every sprite's script concurrently and wait for all of them.
    ///
    /// Does nothing if a run is already in progress.
    ///
    /// # Errors
    ///
    /// Returns an error if an interpreter thread cannot be spawned; the
    /// threads already started are stopped first.
    pub fn play_all(&self) -> Result<PlayOutcome, EngineError> {
        let Some(token) = self.stage.begin_run() else {
            debug!("play_ignored_already_running");
            return Ok(PlayOutcome::AlreadyRunning);
        };
        let result = run_scripts(&self.stage, &token);
        self.stage.end_run(&token);
        result
    }

    /// Start a run on a coordinator thread and return immediately.
    ///
    /// The engine reports running as soon as this returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinator thread cannot be spawned.
    pub fn spawn_play(&self) -> Result<PlayHandle, EngineError> {
        let Some(token) = self.stage.begin_run() else {
            debug!("play_ignored_already_running");
            return Ok(PlayHandle::ready(PlayOutcome::AlreadyRunning));
        };

        let stage = Arc::clone(&self.stage);
        let run_token = token.clone();
        let spawned = thread::Builder::new()
            .name("stagecraft-play".to_string())
            .spawn(move || {
                let result = run_scripts(&stage, &run_token);
                stage.end_run(&run_token);
                result
            });

        match spawned {
            Ok(handle) => Ok(PlayHandle {
                state: PlayState::Running(handle),
            }),
            Err(source) => {
                self.stage.end_run(&token);
                Err(EngineError::Spawn {
                    role: "play",
                    source,
                })
            }
        }
    }

    /// Stop the current run and clear every showing message.
    ///
    /// Interpreters finish their current instruction and exit at their next
    /// check point; messages are cleared before this returns.
    pub fn stop_all(&self) {
        let was_running = self.stage.cancel_run();
        let cleared = self.stage.clear_messages();
        info!(was_running, cleared, "play_stopped");
    }
}

/// Handle to a run started with [`Engine::spawn_play`].
#[derive(Debug)]
pub struct PlayHandle {
    state: PlayState,
}

#[derive(Debug)]
enum PlayState {
    Ready(PlayOutcome),
    Running(JoinHandle<Result<PlayOutcome, EngineError>>),
}

impl PlayHandle {
    const fn ready(outcome: PlayOutcome) -> Self {
        Self {
            state: PlayState::Ready(outcome),
        }
    }

    /// Whether the run has ended.
    pub fn is_finished(&self) -> bool {
        match &self.state {
            PlayState::Ready(_) => true,
            PlayState::Running(handle) => handle.is_finished(),
        }
    }

    /// Wait for the run to end.
    ///
    /// # Errors
    ///
    /// Returns the run's error, or [`EngineError::Panicked`] if the
    /// coordinator thread panicked.
    pub fn join(self) -> Result<PlayOutcome, EngineError> {
        match self.state {
            PlayState::Ready(outcome) => Ok(outcome),
            PlayState::Running(handle) => handle
                .join()
                .unwrap_or(Err(EngineError::Panicked { role: "play" })),
        }
    }
}

/// Spawn one interpreter per sprite and wait for all of them.
fn run_scripts<H: VisualHost>(
    stage: &Arc<Stage<H>>,
    token: &RunToken,
) -> Result<PlayOutcome, EngineError> {
    let scripts: Vec<_> = stage
        .lock_world()
        .sprites
        .iter()
        .map(|(id, entry)| (id.clone(), entry.generation, Arc::clone(&entry.instructions)))
        .collect();
    info!(sprites = scripts.len(), "play_started");

    let mut workers = Vec::with_capacity(scripts.len());
    for (id, generation, instructions) in scripts {
        let thread_name = format!("stagecraft-sprite-{}", id.as_str().replace('\0', ""));
        let span = debug_span!("sprite_script", sprite = %id);
        let interpreter =
            Interpreter::new(Arc::clone(stage), id, generation, instructions, token.clone());
        let spawned = thread::Builder::new().name(thread_name).spawn(move || {
            let _entered = span.enter();
            interpreter.run()
        });
        match spawned {
            Ok(handle) => workers.push(handle),
            Err(source) => {
                token.cancel();
                join_all(workers);
                return Err(EngineError::Spawn {
                    role: "interpreter",
                    source,
                });
            }
        }
    }

    let outcomes = join_all(workers);
    let outcome = if token.is_cancelled() {
        PlayOutcome::Stopped
    } else {
        PlayOutcome::Completed
    };
    let completed = outcomes
        .iter()
        .filter(|outcome| **outcome == TaskOutcome::Completed)
        .count();
    info!(?outcome, scripts = outcomes.len(), completed, "play_finished");
    Ok(outcome)
}

/// Join every worker; a panicked worker is logged and does not affect the rest.
fn join_all(workers: Vec<JoinHandle<TaskOutcome>>) -> Vec<TaskOutcome> {
    workers
        .into_iter()
        .filter_map(|handle| match handle.join() {
            Ok(outcome) => Some(outcome),
            Err(_) => {
                warn!("interpreter_panicked");
                None
            }
        })
        .collect()
}
