//! Interpreter: Runs one sprite's script front to back.
//!
//! Control flow lives here; instruction effects live in the stage. Before
//! every instruction the interpreter re-checks the run token and that its
//! sprite still has the generation it started with.
//!
//! A `repeat` unrolls everything after it: the body runs `times` times,
//! nested `repeat` instructions are skipped rather than executed, and each
//! body step is followed by the loop tick (a cancellable delay, then a drain
//! of the deferred collision queue). The script ends when the loop ends.

use super::messages::TaskOutcome;
use super::stage::{Stage, Step};
use super::token::RunToken;
use crate::host::VisualHost;
use crate::script::{Command, Instruction};
use crate::sprite::SpriteId;
use std::sync::Arc;
use tracing::debug;

/// One sprite's script execution for one run.
pub(crate) struct Interpreter<H: VisualHost> {
    stage: Arc<Stage<H>>,
    sprite: SpriteId,
    generation: u64,
    instructions: Arc<[Instruction]>,
    token: RunToken,
}

impl<H: VisualHost> Interpreter<H> {
    pub fn new(
        stage: Arc<Stage<H>>,
        sprite: SpriteId,
        generation: u64,
        instructions: Arc<[Instruction]>,
        token: RunToken,
    ) -> Self {
        Self {
            stage,
            sprite,
            generation,
            instructions,
            token,
        }
    }

    /// Execute the script to completion, cancellation or detachment.
    pub fn run(&self) -> TaskOutcome {
        debug!(instructions = self.instructions.len(), "script_started");
        let outcome = self.run_sequence();
        debug!(?outcome, "script_finished");
        outcome
    }

    fn run_sequence(&self) -> TaskOutcome {
        for (index, instruction) in self.instructions.iter().enumerate() {
            if let Command::Repeat { times } = instruction.command() {
                let body = &self.instructions[index + 1..];
                self.stage.set_timed_loop(&self.sprite, self.generation, true);
                let outcome = self.run_repeat(*times, body);
                self.stage.set_timed_loop(&self.sprite, self.generation, false);
                return outcome;
            }
            if let Some(stopped) = self.step(instruction) {
                return stopped;
            }
        }
        TaskOutcome::Completed
    }

    fn run_repeat(&self, times: u32, body: &[Instruction]) -> TaskOutcome {
        let steps: Vec<&Instruction> = body
            .iter()
            .filter(|instruction| !instruction.command().is_repeat())
            .collect();
        if steps.is_empty() {
            return self.liveness().unwrap_or(TaskOutcome::Completed);
        }

        for iteration in 0..times {
            debug!(iteration, times, "repeat_iteration");
            for instruction in &steps {
                if let Some(stopped) = self.step(instruction) {
                    return stopped;
                }
                if let Some(stopped) = self.tick() {
                    return stopped;
                }
            }
        }
        TaskOutcome::Completed
    }

    /// Execute one instruction; `Some` means the script must end.
    fn step(&self, instruction: &Instruction) -> Option<TaskOutcome> {
        if let Some(stopped) = self.liveness() {
            return Some(stopped);
        }
        match self
            .stage
            .execute(&self.sprite, self.generation, instruction, &self.token)
        {
            Step::Executed => None,
            Step::Cancelled => Some(TaskOutcome::Cancelled),
            Step::Detached => Some(TaskOutcome::Detached),
        }
    }

    /// The loop tick: cooperative delay, then the deferred collision drain.
    fn tick(&self) -> Option<TaskOutcome> {
        if self.token.is_cancelled() || !self.token.wait(self.stage.config.step_delay) {
            return Some(TaskOutcome::Cancelled);
        }
        self.stage.process_collision_queue();
        None
    }

    fn liveness(&self) -> Option<TaskOutcome> {
        if self.token.is_cancelled() {
            return Some(TaskOutcome::Cancelled);
        }
        if !self
            .stage
            .lock_world()
            .sprites
            .is_current(&self.sprite, self.generation)
        {
            return Some(TaskOutcome::Detached);
        }
        None
    }
}
