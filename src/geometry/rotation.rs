//! Rotation and facing: Which way a sprite points and which way it walks.

use serde::{Deserialize, Serialize};

/// A heading in degrees, always held in `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Rotation(f64);

impl Rotation {
    /// Pointing along the positive x axis.
    pub const ZERO: Self = Self(0.0);

    /// Create a rotation from any angle in degrees.
    ///
    /// Negative and oversized angles wrap; non-finite angles become zero.
    pub fn from_degrees(degrees: f64) -> Self {
        if !degrees.is_finite() {
            return Self::ZERO;
        }
        let wrapped = degrees.rem_euclid(360.0);
        // rem_euclid can round a tiny negative angle up to exactly 360.
        if wrapped >= 360.0 {
            Self::ZERO
        } else {
            Self(wrapped)
        }
    }

    /// Angle in degrees.
    #[inline]
    pub const fn degrees(self) -> f64 {
        self.0
    }

    /// Angle in radians.
    #[inline]
    pub fn radians(self) -> f64 {
        self.0.to_radians()
    }

    /// Turn by `delta` degrees (clockwise on screen for positive values).
    #[must_use]
    pub fn turned(self, delta: f64) -> Self {
        if !delta.is_finite() {
            return self;
        }
        Self::from_degrees(self.0 + delta)
    }
}

impl From<f64> for Rotation {
    fn from(degrees: f64) -> Self {
        Self::from_degrees(degrees)
    }
}

impl From<Rotation> for f64 {
    fn from(rotation: Rotation) -> Self {
        rotation.0
    }
}

/// Walking direction multiplier applied to `move` instructions.
///
/// Collisions flip it; rotation is unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    /// Walk along the heading (+1).
    #[default]
    Forward,
    /// Walk against the heading (-1).
    Reverse,
}

impl Facing {
    /// The signed multiplier, `1.0` or `-1.0`.
    #[inline]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Forward => 1.0,
            Self::Reverse => -1.0,
        }
    }

    /// The opposite facing.
    #[inline]
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }
}
