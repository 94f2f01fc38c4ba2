//! # Stagecraft
//!
//! A sprite execution engine for block-style visual programming.
//!
//! Each sprite carries a short script of instructions (move, turn, go to,
//! say, think, repeat). On `play` every script runs on its own thread; the
//! engine keeps positions on the canvas, detects collisions between sprites
//! and tells the host what to redraw.
//!
//! ## Core Concepts
//!
//! - **Cooperative runs**: `stop` cancels a run token that every script
//!   checks between instructions and while waiting out a loop tick
//! - **Two collision paths**: moves outside a loop are checked against every
//!   pair at once, moves inside a loop are queued and checked on the tick
//! - **Timed visuals**: messages and collision highlights expire on a
//!   dedicated timer thread
//! - **Host boundary**: rendering goes through the [`VisualHost`] trait and
//!   is never called while engine state is locked
//!
//! ## Example
//!
//! ```rust
//! use stagecraft::{Engine, Instruction, PlayOutcome, Position, SpriteId};
//!
//! let engine = Engine::new()?;
//! engine.register_sprite(
//!     "cat",
//!     (),
//!     Position::CENTER,
//!     vec![Instruction::move_steps("step", 10.0)],
//! );
//!
//! assert_eq!(engine.play_all()?, PlayOutcome::Completed);
//! let cat = engine.snapshot(&SpriteId::from("cat")).unwrap();
//! assert_eq!(cat.position, Position::new(60.0, 50.0));
//! # Ok::<(), stagecraft::EngineError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod collision;
pub mod error;
pub mod geometry;
pub mod host;
pub mod script;
pub mod sprite;

// Re-exports for convenience
pub use actor::{Engine, EngineConfig, Expiry, PlayHandle, PlayOutcome, TaskOutcome, TimerHandle};
pub use collision::{CollisionDetector, CollisionQueue};
pub use error::{EngineError, ScriptError};
pub use geometry::{Facing, Position, Rotation, CANVAS_MAX, CANVAS_MIN};
pub use host::{ChannelHost, NullHost, SpriteView, VisualChanges, VisualHost};
pub use script::{Command, Instruction, InstructionKind, Script};
pub use sprite::{Registration, SpriteId, SpriteSnapshot, SpriteState};
