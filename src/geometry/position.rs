//! Position: A point on the percentage canvas.

use super::Rotation;
use serde::{Deserialize, Serialize};

/// Lower bound of both canvas axes.
pub const CANVAS_MIN: f64 = 0.0;

/// Upper bound of both canvas axes.
pub const CANVAS_MAX: f64 = 100.0;

/// A point on the canvas, always clamped to `[0, 100]` on both axes.
///
/// The fields are private so the clamp cannot be bypassed; every
/// constructor and every mutation goes through [`Position::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPosition")]
pub struct Position {
    x: f64,
    y: f64,
}

#[derive(Deserialize)]
struct RawPosition {
    x: f64,
    y: f64,
}

impl From<RawPosition> for Position {
    fn from(raw: RawPosition) -> Self {
        Self::new(raw.x, raw.y)
    }
}

impl Position {
    /// The middle of the canvas.
    pub const CENTER: Self = Self { x: 50.0, y: 50.0 };

    /// Top-left corner of the canvas.
    pub const ORIGIN: Self = Self { x: CANVAS_MIN, y: CANVAS_MIN };

    /// Create a new position, clamping both axes onto the canvas.
    ///
    /// NaN collapses to the lower bound.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: clamp_axis(x),
            y: clamp_axis(y),
        }
    }

    /// Horizontal coordinate in percent.
    #[inline]
    pub const fn x(&self) -> f64 {
        self.x
    }

    /// Vertical coordinate in percent.
    #[inline]
    pub const fn y(&self) -> f64 {
        self.y
    }

    /// Euclidean distance to another position.
    #[inline]
    pub fn distance_to(&self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Step `distance` units along `rotation` and clamp the result.
    ///
    /// A negative distance walks backwards.
    #[must_use]
    pub fn advanced(self, distance: f64, rotation: Rotation) -> Self {
        let radians = rotation.radians();
        Self::new(
            self.x + distance * radians.cos(),
            self.y + distance * radians.sin(),
        )
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::CENTER
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

fn clamp_axis(value: f64) -> f64 {
    if value.is_nan() {
        CANVAS_MIN
    } else {
        value.clamp(CANVAS_MIN, CANVAS_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_new_clamps_both_axes() {
        let pos = Position::new(-20.0, 140.0);
        assert_eq!(pos.x(), 0.0);
        assert_eq!(pos.y(), 100.0);
    }

    #[test]
    fn test_nan_collapses_to_min() {
        let pos = Position::new(f64::NAN, 30.0);
        assert_eq!(pos.x(), CANVAS_MIN);
        assert_eq!(pos.y(), 30.0);
    }

    #[test]
    fn test_advance_along_zero_rotation() {
        let pos = Position::new(50.0, 50.0).advanced(10.0, Rotation::ZERO);
        assert_close(pos.x(), 60.0);
        assert_close(pos.y(), 50.0);
    }

    #[test]
    fn test_advance_clamps_at_edge() {
        let pos = Position::new(95.0, 50.0).advanced(10.0, Rotation::ZERO);
        assert_eq!(pos.x(), 100.0);
        assert_close(pos.y(), 50.0);
    }

    #[test]
    fn test_advance_quarter_turn_moves_down() {
        let pos = Position::new(50.0, 50.0).advanced(10.0, Rotation::from_degrees(90.0));
        assert_close(pos.x(), 50.0);
        assert_close(pos.y(), 60.0);
    }

    #[test]
    fn test_advance_backwards() {
        let pos = Position::new(50.0, 50.0).advanced(-10.0, Rotation::ZERO);
        assert_close(pos.x(), 40.0);
    }

    #[test]
    fn test_distance() {
        let a = Position::new(50.0, 50.0);
        let b = Position::new(53.0, 54.0);
        assert_close(a.distance_to(b), 5.0);
        assert_close(b.distance_to(a), 5.0);
    }

    #[test]
    fn test_deserialize_clamps() {
        let pos: Position = serde_json::from_str(r#"{"x": 120, "y": -3}"#).unwrap();
        assert_eq!(pos, Position::new(100.0, 0.0));
    }
}
