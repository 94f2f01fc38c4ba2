//! Stage: State shared by the engine facade, interpreters and the timer.
//!
//! All sprite mutation happens under the single world lock, one instruction
//! or one collision pass at a time. Visual updates are collected while the
//! lock is held and delivered to the host after it is released.

use super::messages::{Expiry, TimerHandle};
use super::timer::TimerActor;
use super::token::RunToken;
use super::EngineConfig;
use crate::collision::{CollisionDetector, CollisionQueue};
use crate::geometry::Position;
use crate::host::{SpriteView, VisualChanges, VisualHost};
use crate::script::{Command, Instruction};
use crate::sprite::{Registration, SpriteId, SpriteSnapshot, SpriteStore};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// The sprite registry and the deferred collision queue.
#[derive(Debug)]
pub(crate) struct World<T> {
    pub sprites: SpriteStore<T>,
    pub pending: CollisionQueue,
}

impl<T> Default for World<T> {
    fn default() -> Self {
        Self {
            sprites: SpriteStore::new(),
            pending: CollisionQueue::new(),
        }
    }
}

/// A visual update waiting to be delivered.
struct Notice<T> {
    target: Arc<T>,
    view: SpriteView,
}

/// Result of executing one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// The instruction ran.
    Executed,
    /// The run was stopped before the instruction could run.
    Cancelled,
    /// The sprite is gone or was reconfigured.
    Detached,
}

/// Everything one engine instance shares between threads.
pub(crate) struct Stage<H: VisualHost> {
    pub config: EngineConfig,
    pub detector: CollisionDetector,
    pub host: H,
    pub timers: TimerActor,
    world: Mutex<World<H::Target>>,
    /// Token of the run in progress, if any.
    run: Mutex<Option<RunToken>>,
}

impl<H: VisualHost> Stage<H> {
    pub fn new(config: EngineConfig, host: H, timers: TimerActor) -> Self {
        Self {
            detector: CollisionDetector::new(config.collision_threshold),
            config,
            host,
            timers,
            world: Mutex::new(World::default()),
            run: Mutex::new(None),
        }
    }

    pub fn lock_world(&self) -> MutexGuard<'_, World<H::Target>> {
        self.world.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_run(&self) -> MutexGuard<'_, Option<RunToken>> {
        self.run.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ------------------------------------------------------------------
    // Run bookkeeping
    // ------------------------------------------------------------------

    /// Start a run unless one is live.
    pub fn begin_run(&self) -> Option<RunToken> {
        let mut run = self.lock_run();
        if run.as_ref().is_some_and(|token| !token.is_cancelled()) {
            return None;
        }
        let token = RunToken::new();
        *run = Some(token.clone());
        Some(token)
    }

    /// Forget `token` if it is still the current run.
    pub fn end_run(&self, token: &RunToken) {
        let mut run = self.lock_run();
        if run.as_ref().is_some_and(|current| current.same_run(token)) {
            *run = None;
        }
    }

    /// Cancel the current run, if any.
    pub fn cancel_run(&self) -> bool {
        match self.lock_run().take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.lock_run()
            .as_ref()
            .is_some_and(|token| !token.is_cancelled())
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    pub fn register(
        &self,
        id: SpriteId,
        target: H::Target,
        position: Position,
        instructions: Vec<Instruction>,
    ) -> Registration {
        let (outcome, notice) = {
            let mut world = self.lock_world();
            let outcome = world
                .sprites
                .register(id.clone(), Arc::new(target), position, instructions);
            debug!(sprite = %id, ?outcome, "sprite_registered");
            let changes = VisualChanges::REGISTERED | VisualChanges::POSITION;
            let notice = self.notice(&world, &id, changes);
            (outcome, notice)
        };
        self.publish(notice.into_iter().collect());
        outcome
    }

    pub fn unregister(&self, id: &SpriteId) -> bool {
        let removed = {
            let mut world = self.lock_world();
            let removed = world.sprites.unregister(id);
            world.pending.remove(id);
            removed
        };
        let Some(mut entry) = removed else {
            return false;
        };
        for timer in entry.state.take_timers() {
            self.timers.cancel(timer);
        }
        debug!(sprite = %id, "sprite_unregistered");
        self.host.sprite_removed(&entry.target, id);
        true
    }

    pub fn set_position(&self, id: &SpriteId, position: Position) -> bool {
        let notice = {
            let mut world = self.lock_world();
            let Some(entry) = world.sprites.get_mut(id) else {
                return false;
            };
            entry.state.set_position(position);
            self.notice(&world, id, VisualChanges::POSITION)
        };
        self.publish(notice.into_iter().collect());
        true
    }

    pub fn set_instructions(&self, id: &SpriteId, instructions: Vec<Instruction>) -> bool {
        self.lock_world().sprites.set_instructions(id, instructions)
    }

    /// Re-deliver the full visual state of one sprite.
    pub fn refresh(&self, id: &SpriteId) -> bool {
        let notice = self.notice(&self.lock_world(), id, VisualChanges::empty());
        let found = notice.is_some();
        self.publish(notice.into_iter().collect());
        found
    }

    pub fn snapshot(&self, id: &SpriteId) -> Option<SpriteSnapshot> {
        self.lock_world()
            .sprites
            .get(id)
            .map(|entry| entry.state.snapshot())
    }

    // ------------------------------------------------------------------
    // Instruction effects
    // ------------------------------------------------------------------

    /// Flag the sprite as inside (or outside) a repeat loop.
    pub fn set_timed_loop(&self, id: &SpriteId, generation: u64, in_loop: bool) {
        if let Some(entry) = self.lock_world().sprites.current_mut(id, generation) {
            entry.state.set_in_timed_loop(in_loop);
        }
    }

    /// Apply one instruction to one sprite and notify the host.
    pub fn execute(
        &self,
        id: &SpriteId,
        generation: u64,
        instruction: &Instruction,
        token: &RunToken,
    ) -> Step {
        let mut notices = Vec::new();
        {
            let mut guard = self.lock_world();
            // Checked under the lock so nothing slips in after a stop.
            if token.is_cancelled() {
                return Step::Cancelled;
            }
            let world = &mut *guard;
            let Some(entry) = world.sprites.current_mut(id, generation) else {
                return Step::Detached;
            };

            let state = &mut entry.state;
            let mut changes = VisualChanges::empty();
            let mut eager_scan = false;
            match instruction.command() {
                Command::Move { steps } => {
                    state.walk(*steps);
                    changes |= VisualChanges::POSITION;
                    if state.in_timed_loop() {
                        world.pending.push(id.clone());
                    } else {
                        eager_scan = true;
                    }
                }
                Command::Turn { degrees } => {
                    state.turn(*degrees);
                    changes |= VisualChanges::ROTATION;
                }
                Command::GoTo { x, y } => {
                    state.go_to(*x, *y);
                    changes |= VisualChanges::POSITION;
                }
                Command::Say { text, secs } | Command::Think { text, secs } => {
                    let timer = self.timers.arm(
                        Command::message_duration(*secs),
                        Expiry::Message(id.clone()),
                    );
                    if let Some(previous) = state.show_message(text.clone(), timer) {
                        self.timers.cancel(previous);
                    }
                    changes |= VisualChanges::MESSAGE;
                }
                Command::Repeat { .. } => {
                    // Loops are unrolled by the interpreter, never executed here.
                }
                Command::Unknown { name, .. } => {
                    warn!(
                        sprite = %id,
                        instruction = instruction.id(),
                        name = %name,
                        "unknown_instruction"
                    );
                }
            }

            notices.extend(self.notice(world, id, changes));
            if eager_scan {
                let pairs = self.detector.colliding_pairs(&world.sprites.bodies());
                for (a, b) in pairs {
                    notices.extend(self.resolve_collision(world, &a, &b));
                }
            }
        }
        self.publish(notices);
        Step::Executed
    }

    // ------------------------------------------------------------------
    // Collisions
    // ------------------------------------------------------------------

    /// Full pairwise scan. Returns the number of colliding pairs resolved.
    pub fn check_all_collisions(&self) -> usize {
        let mut notices = Vec::new();
        let resolved = {
            let mut guard = self.lock_world();
            let world = &mut *guard;
            let pairs = self.detector.colliding_pairs(&world.sprites.bodies());
            for (a, b) in &pairs {
                notices.extend(self.resolve_collision(world, a, b));
            }
            pairs.len()
        };
        self.publish(notices);
        resolved
    }

    /// Whether two registered sprites currently collide.
    pub fn check_collision(&self, a: &SpriteId, b: &SpriteId) -> Option<bool> {
        let world = self.lock_world();
        let pos_a = world.sprites.get(a)?.state.position();
        let pos_b = world.sprites.get(b)?.state.position();
        Some(self.detector.is_colliding(pos_a, pos_b))
    }

    /// Drain the deferred queue in FIFO order, checking each queued sprite
    /// against every other one. Returns the number of collisions resolved.
    pub fn process_collision_queue(&self) -> usize {
        let mut notices = Vec::new();
        let mut resolved = 0;
        {
            let mut guard = self.lock_world();
            let world = &mut *guard;
            while let Some(id) = world.pending.pop() {
                let partners = self
                    .detector
                    .colliding_with(&id, &world.sprites.bodies());
                for other in partners {
                    notices.extend(self.resolve_collision(world, &id, &other));
                    resolved += 1;
                }
            }
        }
        self.publish(notices);
        resolved
    }

    /// Queue a sprite for the next deferred check.
    pub fn queue_collision_check(&self, id: &SpriteId) -> bool {
        let mut world = self.lock_world();
        if world.sprites.get(id).is_none() {
            return false;
        }
        world.pending.push(id.clone())
    }

    /// Flip both sprites and light their highlights.
    fn resolve_collision(
        &self,
        world: &mut World<H::Target>,
        a: &SpriteId,
        b: &SpriteId,
    ) -> Vec<Notice<H::Target>> {
        debug!(first = %a, second = %b, "collision_resolved");
        let mut notices = Vec::with_capacity(2);
        for id in [a, b] {
            let Some(entry) = world.sprites.get_mut(id) else {
                continue;
            };
            entry.state.flip_facing();
            let timer = self
                .timers
                .arm(self.config.highlight_duration, Expiry::Highlight(id.clone()));
            if let Some(previous) = entry.state.highlight(timer) {
                self.timers.cancel(previous);
            }
            let changes = VisualChanges::FACING | VisualChanges::HIGHLIGHT;
            notices.extend(self.notice(world, id, changes));
        }
        notices
    }

    // ------------------------------------------------------------------
    // Stop and timers
    // ------------------------------------------------------------------

    /// Clear every showing message and cancel its timer.
    pub fn clear_messages(&self) -> usize {
        let mut notices = Vec::new();
        {
            let mut guard = self.lock_world();
            let world = &mut *guard;
            let mut cleared = Vec::new();
            for (id, entry) in world.sprites.iter_mut() {
                if let Some(timer) = entry.state.clear_message() {
                    self.timers.cancel(timer);
                    cleared.push(id.clone());
                }
            }
            for id in &cleared {
                notices.extend(self.notice(world, id, VisualChanges::MESSAGE));
            }
        }
        let count = notices.len();
        self.publish(notices);
        count
    }

    /// Timer callback.
    pub fn expire(&self, timer: TimerHandle, expiry: &Expiry) {
        let notice = {
            let mut world = self.lock_world();
            let id = expiry.sprite();
            let Some(entry) = world.sprites.get_mut(id) else {
                return;
            };
            let changed = match expiry {
                Expiry::Message(_) => entry
                    .state
                    .expire_message(timer)
                    .then_some(VisualChanges::MESSAGE),
                Expiry::Highlight(_) => entry
                    .state
                    .expire_highlight(timer)
                    .then_some(VisualChanges::HIGHLIGHT),
            };
            changed.and_then(|changes| self.notice(&world, id, changes))
        };
        self.publish(notice.into_iter().collect());
    }

    // ------------------------------------------------------------------
    // Host delivery
    // ------------------------------------------------------------------

    fn notice(
        &self,
        world: &World<H::Target>,
        id: &SpriteId,
        changes: VisualChanges,
    ) -> Option<Notice<H::Target>> {
        world.sprites.get(id).map(|entry| Notice {
            target: Arc::clone(&entry.target),
            view: SpriteView {
                id: id.clone(),
                snapshot: entry.state.snapshot(),
                changes,
            },
        })
    }

    /// Deliver notices. Must be called with the world lock released.
    fn publish(&self, notices: Vec<Notice<H::Target>>) {
        for notice in notices {
            self.host.update_visuals(&notice.target, &notice.view);
        }
    }
}
