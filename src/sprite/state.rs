//! Sprite state: Position, heading, facing and the message slot.

use crate::actor::TimerHandle;
use crate::geometry::{Facing, Position, Rotation};
use serde::{Deserialize, Serialize};

/// Mutable runtime state of one sprite.
///
/// Invariants held by every method:
/// - the position is clamped to the canvas,
/// - the rotation is in `[0, 360)`,
/// - `message` is set only while `message_timer` is armed.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteState {
    position: Position,
    rotation: Rotation,
    facing: Facing,
    message: Option<String>,
    message_timer: Option<TimerHandle>,
    highlight_timer: Option<TimerHandle>,
    in_timed_loop: bool,
}

impl SpriteState {
    /// Fresh state at `position`: heading 0, facing forward, no message.
    pub const fn new(position: Position) -> Self {
        Self {
            position,
            rotation: Rotation::ZERO,
            facing: Facing::Forward,
            message: None,
            message_timer: None,
            highlight_timer: None,
            in_timed_loop: false,
        }
    }

    /// Current position.
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Current heading.
    pub const fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Current walking direction.
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// Text of the bubble currently shown, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Whether a collision highlight is showing.
    pub const fn is_highlighted(&self) -> bool {
        self.highlight_timer.is_some()
    }

    /// Whether the sprite is inside a repeat loop.
    pub const fn in_timed_loop(&self) -> bool {
        self.in_timed_loop
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub(crate) fn set_in_timed_loop(&mut self, in_loop: bool) {
        self.in_timed_loop = in_loop;
    }

    /// Walk `steps` along the heading, scaled by the facing.
    ///
    /// A non-finite distance leaves the sprite where it is.
    pub(crate) fn walk(&mut self, steps: f64) {
        if !steps.is_finite() {
            return;
        }
        self.position = self
            .position
            .advanced(steps * self.facing.sign(), self.rotation);
    }

    pub(crate) fn turn(&mut self, degrees: f64) {
        self.rotation = self.rotation.turned(degrees);
    }

    /// Jump to `(x, y)`. An axis with a non-finite target keeps its value.
    pub(crate) fn go_to(&mut self, x: f64, y: f64) {
        let x = if x.is_finite() { x } else { self.position.x() };
        let y = if y.is_finite() { y } else { self.position.y() };
        self.position = Position::new(x, y);
    }

    pub(crate) fn flip_facing(&mut self) {
        self.facing = self.facing.flipped();
    }

    /// Show `text` until `timer` fires. Returns the timer it replaced.
    pub(crate) fn show_message(
        &mut self,
        text: String,
        timer: TimerHandle,
    ) -> Option<TimerHandle> {
        self.message = Some(text);
        self.message_timer.replace(timer)
    }

    /// Clear the message if `timer` is still the armed one.
    pub(crate) fn expire_message(&mut self, timer: TimerHandle) -> bool {
        if self.message_timer != Some(timer) {
            return false;
        }
        self.message_timer = None;
        self.message = None;
        true
    }

    /// Clear the message unconditionally. Returns the timer that was armed.
    pub(crate) fn clear_message(&mut self) -> Option<TimerHandle> {
        self.message = None;
        self.message_timer.take()
    }

    /// Light the highlight until `timer` fires. Returns the timer it replaced.
    pub(crate) fn highlight(&mut self, timer: TimerHandle) -> Option<TimerHandle> {
        self.highlight_timer.replace(timer)
    }

    pub(crate) fn expire_highlight(&mut self, timer: TimerHandle) -> bool {
        if self.highlight_timer != Some(timer) {
            return false;
        }
        self.highlight_timer = None;
        true
    }

    /// Both armed timers, for cancellation when the sprite goes away.
    pub(crate) fn take_timers(&mut self) -> impl Iterator<Item = TimerHandle> {
        self.message = None;
        [self.message_timer.take(), self.highlight_timer.take()]
            .into_iter()
            .flatten()
    }

    /// Copy the host-visible part of the state.
    pub fn snapshot(&self) -> SpriteSnapshot {
        SpriteSnapshot {
            position: self.position,
            rotation: self.rotation,
            facing: self.facing,
            message: self.message.clone(),
            highlighted: self.is_highlighted(),
            in_timed_loop: self.in_timed_loop,
        }
    }
}

/// Read-only copy of a sprite's state, handed to hosts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteSnapshot {
    /// Position on the canvas.
    pub position: Position,
    /// Heading in degrees.
    pub rotation: Rotation,
    /// Walking direction.
    pub facing: Facing,
    /// Bubble text, if one is showing.
    pub message: Option<String>,
    /// Whether a collision highlight is showing.
    pub highlighted: bool,
    /// Whether the sprite is inside a repeat loop.
    pub in_timed_loop: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = SpriteState::new(Position::new(10.0, 20.0));
        assert_eq!(state.rotation(), Rotation::ZERO);
        assert_eq!(state.facing(), Facing::Forward);
        assert_eq!(state.message(), None);
        assert!(!state.in_timed_loop());
        assert!(!state.is_highlighted());
    }

    #[test]
    fn test_walk_respects_facing() {
        let mut state = SpriteState::new(Position::CENTER);
        state.flip_facing();
        state.walk(10.0);
        assert!((state.position().x() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_new_message_replaces_timer() {
        let mut state = SpriteState::new(Position::CENTER);
        assert_eq!(state.show_message("one".into(), TimerHandle(1)), None);
        assert_eq!(
            state.show_message("two".into(), TimerHandle(2)),
            Some(TimerHandle(1))
        );
        assert_eq!(state.message(), Some("two"));

        // The replaced timer must not clear the newer message.
        assert!(!state.expire_message(TimerHandle(1)));
        assert_eq!(state.message(), Some("two"));

        assert!(state.expire_message(TimerHandle(2)));
        assert_eq!(state.message(), None);
    }

    #[test]
    fn test_clear_message_returns_armed_timer() {
        let mut state = SpriteState::new(Position::CENTER);
        state.show_message("hi".into(), TimerHandle(7));
        assert_eq!(state.clear_message(), Some(TimerHandle(7)));
        assert_eq!(state.message(), None);
        assert_eq!(state.clear_message(), None);
    }

    #[test]
    fn test_highlight_expiry() {
        let mut state = SpriteState::new(Position::CENTER);
        state.highlight(TimerHandle(3));
        assert!(state.is_highlighted());
        assert!(state.snapshot().highlighted);
        assert!(state.expire_highlight(TimerHandle(3)));
        assert!(!state.is_highlighted());
    }

    #[test]
    fn test_take_timers() {
        let mut state = SpriteState::new(Position::CENTER);
        state.show_message("hi".into(), TimerHandle(1));
        state.highlight(TimerHandle(2));
        let timers: Vec<_> = state.take_timers().collect();
        assert_eq!(timers, vec![TimerHandle(1), TimerHandle(2)]);
        assert_eq!(state.message(), None);
        assert!(!state.is_highlighted());
    }
}
