//! Geometry: Canvas coordinates, headings and facing for sprites.
//!
//! All positions are expressed as percentages of the canvas, so both axes
//! live in `[0, 100]`. Rotations are degrees held in `[0, 360)`.

mod position;
mod rotation;

pub use position::{Position, CANVAS_MAX, CANVAS_MIN};
pub use rotation::{Facing, Rotation};
