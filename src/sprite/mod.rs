//! Sprites: Runtime state for every actor on the canvas.
//!
//! The engine owns all sprite state. Hosts read it through
//! [`SpriteSnapshot`] copies and never mutate it directly.

mod state;
mod store;

pub use state::{SpriteSnapshot, SpriteState};
pub use store::Registration;
pub(crate) use store::SpriteStore;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Host-generated identifier of a sprite.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpriteId(String);

impl SpriteId {
    /// Create an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SpriteId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SpriteId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&SpriteId> for SpriteId {
    fn from(id: &SpriteId) -> Self {
        id.clone()
    }
}

impl AsRef<str> for SpriteId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
