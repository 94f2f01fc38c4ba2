//! Host: The boundary between the engine and whatever draws the sprites.
//!
//! The engine never touches a rendering API. It resolves each sprite to a
//! host-supplied visual target and calls [`VisualHost::update_visuals`]
//! whenever that sprite's visible state changes. Hooks are always called
//! with no engine lock held, but they run on engine worker threads and
//! must not block for long.

use crate::sprite::{SpriteId, SpriteSnapshot};
use bitflags::bitflags;
use crossbeam_channel::{unbounded, Receiver, Sender};

bitflags! {
    /// Which parts of a sprite changed since the host last heard about it.
    ///
    /// # Example
    /// ```
    /// use stagecraft::VisualChanges;
    /// let changes = VisualChanges::POSITION | VisualChanges::ROTATION;
    /// assert!(changes.contains(VisualChanges::POSITION));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct VisualChanges: u8 {
        /// The sprite was just registered or reconfigured.
        const REGISTERED = 0b0000_0001;
        /// Position changed.
        const POSITION = 0b0000_0010;
        /// Rotation changed.
        const ROTATION = 0b0000_0100;
        /// Message appeared, changed or cleared.
        const MESSAGE = 0b0000_1000;
        /// Collision highlight switched on or off.
        const HIGHLIGHT = 0b0001_0000;
        /// Walking direction flipped.
        const FACING = 0b0010_0000;
    }
}

/// A visual update for one sprite.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteView {
    /// Which sprite.
    pub id: SpriteId,
    /// Its state right after the change.
    pub snapshot: SpriteSnapshot,
    /// What changed. Empty when an instruction had no visible effect.
    pub changes: VisualChanges,
}

/// Host-side rendering capability.
///
/// `Target` is whatever the host uses to find a sprite's on-screen
/// representation: an element handle, an entity id, a label.
pub trait VisualHost: Send + Sync + 'static {
    /// Renderable handle supplied at registration.
    type Target: Send + Sync + 'static;

    /// Reflect `view` onto `target`.
    fn update_visuals(&self, target: &Self::Target, view: &SpriteView);

    /// The sprite was unregistered; release whatever `target` holds.
    fn sprite_removed(&self, target: &Self::Target, id: &SpriteId) {
        let _ = (target, id);
    }
}

/// A host that draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl VisualHost for NullHost {
    type Target = ();

    fn update_visuals(&self, _target: &(), _view: &SpriteView) {}
}

/// A host that forwards every update into a channel.
///
/// Useful when rendering happens on another thread, or in tests.
#[derive(Debug, Clone)]
pub struct ChannelHost {
    tx: Sender<SpriteView>,
}

impl ChannelHost {
    /// Create a host and the receiver its updates arrive on.
    pub fn unbounded() -> (Self, Receiver<SpriteView>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }
}

impl VisualHost for ChannelHost {
    type Target = ();

    fn update_visuals(&self, _target: &(), view: &SpriteView) {
        // A dropped receiver just means nobody is watching.
        let _ = self.tx.send(view.clone());
    }
}
