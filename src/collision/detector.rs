//! Detector: Point-distance collision tests.

use crate::geometry::Position;
use crate::sprite::SpriteId;

/// Distance-threshold collision detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionDetector {
    threshold: f64,
}

impl Default for CollisionDetector {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}

impl CollisionDetector {
    /// Default threshold in canvas percent.
    pub const DEFAULT_THRESHOLD: f64 = 10.0;

    /// Create a detector with the given threshold.
    pub const fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// The collision threshold.
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Whether two positions are closer than the threshold. Symmetric.
    #[inline]
    pub fn is_colliding(&self, a: Position, b: Position) -> bool {
        a.distance_to(b) < self.threshold
    }

    /// Every unordered colliding pair among `bodies`.
    pub fn colliding_pairs(&self, bodies: &[(&SpriteId, Position)]) -> Vec<(SpriteId, SpriteId)> {
        let mut pairs = Vec::new();
        for (i, (a, pos_a)) in bodies.iter().enumerate() {
            for (b, pos_b) in &bodies[i + 1..] {
                if self.is_colliding(*pos_a, *pos_b) {
                    pairs.push(((*a).clone(), (*b).clone()));
                }
            }
        }
        pairs
    }

    /// Every body colliding with `subject`, excluding the subject itself.
    ///
    /// Returns nothing if `subject` is not among `bodies`.
    pub fn colliding_with(&self, subject: &SpriteId, bodies: &[(&SpriteId, Position)]) -> Vec<SpriteId> {
        let Some(origin) = bodies
            .iter()
            .find(|(id, _)| *id == subject)
            .map(|(_, pos)| *pos)
        else {
            return Vec::new();
        };
        bodies
            .iter()
            .filter(|(id, pos)| *id != subject && self.is_colliding(origin, *pos))
            .map(|(id, _)| (*id).clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<SpriteId> {
        names.iter().map(|n| SpriteId::from(*n)).collect()
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let detector = CollisionDetector::default();
        let a = Position::new(50.0, 50.0);
        assert!(detector.is_colliding(a, Position::new(55.0, 50.0)));
        assert!(!detector.is_colliding(a, Position::new(60.0, 50.0)));
    }

    #[test]
    fn test_symmetric() {
        let detector = CollisionDetector::new(7.5);
        let points = [
            Position::new(0.0, 0.0),
            Position::new(5.0, 5.0),
            Position::new(90.0, 10.0),
            Position::new(95.0, 12.0),
        ];
        for a in points {
            for b in points {
                assert_eq!(detector.is_colliding(a, b), detector.is_colliding(b, a));
            }
        }
    }

    #[test]
    fn test_colliding_pairs() {
        let detector = CollisionDetector::default();
        let names = ids(&["a", "b", "c"]);
        let bodies = vec![
            (&names[0], Position::new(50.0, 50.0)),
            (&names[1], Position::new(55.0, 50.0)),
            (&names[2], Position::new(90.0, 90.0)),
        ];
        let pairs = detector.colliding_pairs(&bodies);
        assert_eq!(pairs, vec![(names[0].clone(), names[1].clone())]);
    }

    #[test]
    fn test_colliding_with() {
        let detector = CollisionDetector::default();
        let names = ids(&["a", "b", "c", "ghost"]);
        let bodies = vec![
            (&names[0], Position::new(50.0, 50.0)),
            (&names[1], Position::new(52.0, 50.0)),
            (&names[2], Position::new(48.0, 51.0)),
        ];
        assert_eq!(
            detector.colliding_with(&names[0], &bodies),
            vec![names[1].clone(), names[2].clone()]
        );
        assert!(detector.colliding_with(&names[3], &bodies).is_empty());
    }
}
