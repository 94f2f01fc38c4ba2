//! Collision: Proximity detection between sprites.
//!
//! Two sprites collide when their positions are closer than a threshold
//! (in canvas percent). Detection runs on one of two paths:
//!
//! - **Eager**: a `move` outside a repeat loop scans every pair at once.
//! - **Deferred**: a `move` inside a repeat loop queues the sprite in a
//!   [`CollisionQueue`], which is drained once per loop tick and checks each
//!   queued sprite against all others.

mod detector;
mod queue;

pub use detector::CollisionDetector;
pub use queue::CollisionQueue;
