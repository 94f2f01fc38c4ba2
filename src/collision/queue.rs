//! Queue: Deferred collision checks for sprites inside repeat loops.

use crate::sprite::SpriteId;
use std::collections::VecDeque;

/// FIFO of sprites awaiting a collision check. An id is queued at most once.
#[derive(Debug, Clone, Default)]
pub struct CollisionQueue {
    pending: VecDeque<SpriteId>,
}

impl CollisionQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `id` unless it is already waiting. Returns whether it was added.
    pub fn push(&mut self, id: SpriteId) -> bool {
        if self.pending.contains(&id) {
            return false;
        }
        self.pending.push_back(id);
        true
    }

    /// Take the oldest queued id.
    pub fn pop(&mut self) -> Option<SpriteId> {
        self.pending.pop_front()
    }

    /// Drop a sprite that no longer exists.
    pub fn remove(&mut self, id: &SpriteId) {
        self.pending.retain(|queued| queued != id);
    }

    /// Number of queued ids.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut queue = CollisionQueue::new();
        queue.push(SpriteId::from("a"));
        queue.push(SpriteId::from("b"));
        assert_eq!(queue.pop(), Some(SpriteId::from("a")));
        assert_eq!(queue.pop(), Some(SpriteId::from("b")));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_deduplicates() {
        let mut queue = CollisionQueue::new();
        assert!(queue.push(SpriteId::from("a")));
        assert!(!queue.push(SpriteId::from("a")));
        assert_eq!(queue.len(), 1);

        // Once popped, the id may be queued again.
        queue.pop();
        assert!(queue.push(SpriteId::from("a")));
    }

    #[test]
    fn test_remove() {
        let mut queue = CollisionQueue::new();
        queue.push(SpriteId::from("a"));
        queue.push(SpriteId::from("b"));
        queue.remove(&SpriteId::from("a"));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop(), Some(SpriteId::from("b")));
        assert!(queue.is_empty());
    }
}
