//! Actor Model: Thread-per-sprite execution for the sprite engine.
//!
//! This module implements the runtime using OS threads and crossbeam channels:
//! - **Interpreter threads**: One per sprite per run, executing its script
//! - **Timer Actor**: Fires message and highlight expiries
//! - **Engine**: Coordinates runs, owns the shared stage, answers host calls
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   execute / tick   ┌──────────────┐   SpriteView   ┌──────┐
//! │ Interpreter  │ ─────────────────▶ │              │ ─────────────▶ │ Host │
//! │ (per sprite) │                    │    Stage     │                └──────┘
//! └──────────────┘                    │ (world lock) │
//!        ▲ RunToken                   │              │
//!        │                            └──────────────┘
//! ┌──────────────┐                        │      ▲
//! │    Engine    │      TimerCommand      │      │ expire
//! │ play / stop  │                        ▼      │
//! └──────────────┘                    ┌──────────────┐
//!                                     │ Timer Thread │
//!                                     └──────────────┘
//! ```

mod engine;
mod interpreter;
mod messages;
mod stage;
mod timer;
mod token;

pub use engine::{Engine, EngineConfig, PlayHandle};
pub use messages::{Expiry, PlayOutcome, TaskOutcome, TimerHandle};
