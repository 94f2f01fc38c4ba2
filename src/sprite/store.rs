//! Sprite store: The registry of sprites and their generations.
//!
//! Every registration hands out a fresh generation number. An interpreter
//! remembers the generation it started with and treats any mismatch as
//! "this sprite was removed or reconfigured under me" and exits.

use super::{SpriteId, SpriteState};
use crate::geometry::Position;
use crate::script::Instruction;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Result of [`SpriteStore::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// A new sprite was created.
    Created,
    /// An existing sprite was reconfigured in place.
    Reconfigured,
}

/// One registered sprite.
#[derive(Debug)]
pub(crate) struct SpriteEntry<T> {
    pub target: Arc<T>,
    pub state: SpriteState,
    pub instructions: Arc<[Instruction]>,
    pub generation: u64,
}

/// All sprites known to an engine, keyed by id.
#[derive(Debug)]
pub(crate) struct SpriteStore<T> {
    sprites: BTreeMap<SpriteId, SpriteEntry<T>>,
    next_generation: u64,
}

impl<T> Default for SpriteStore<T> {
    fn default() -> Self {
        Self {
            sprites: BTreeMap::new(),
            next_generation: 1,
        }
    }
}

impl<T> SpriteStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn bump_generation(&mut self) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        generation
    }

    /// Create a sprite, or reconfigure the existing one with the same id.
    ///
    /// Reconfiguring keeps rotation, facing and any showing message.
    pub fn register(
        &mut self,
        id: SpriteId,
        target: Arc<T>,
        position: Position,
        instructions: Vec<Instruction>,
    ) -> Registration {
        let generation = self.bump_generation();
        let instructions: Arc<[Instruction]> = instructions.into();
        if let Some(entry) = self.sprites.get_mut(&id) {
            entry.target = target;
            entry.state.set_position(position);
            entry.state.set_in_timed_loop(false);
            entry.instructions = instructions;
            entry.generation = generation;
            return Registration::Reconfigured;
        }
        self.sprites.insert(
            id,
            SpriteEntry {
                target,
                state: SpriteState::new(position),
                instructions,
                generation,
            },
        );
        Registration::Created
    }

    /// Replace a sprite's instructions. Returns `false` if it is not registered.
    pub fn set_instructions(&mut self, id: &SpriteId, instructions: Vec<Instruction>) -> bool {
        let generation = self.bump_generation();
        let Some(entry) = self.sprites.get_mut(id) else {
            return false;
        };
        entry.instructions = instructions.into();
        entry.state.set_in_timed_loop(false);
        entry.generation = generation;
        true
    }

    pub fn unregister(&mut self, id: &SpriteId) -> Option<SpriteEntry<T>> {
        self.sprites.remove(id)
    }

    pub fn get(&self, id: &SpriteId) -> Option<&SpriteEntry<T>> {
        self.sprites.get(id)
    }

    pub fn get_mut(&mut self, id: &SpriteId) -> Option<&mut SpriteEntry<T>> {
        self.sprites.get_mut(id)
    }

    /// The sprite, but only if it still has `generation`.
    pub fn current_mut(&mut self, id: &SpriteId, generation: u64) -> Option<&mut SpriteEntry<T>> {
        self.sprites
            .get_mut(id)
            .filter(|entry| entry.generation == generation)
    }

    pub fn is_current(&self, id: &SpriteId, generation: u64) -> bool {
        self.sprites
            .get(id)
            .is_some_and(|entry| entry.generation == generation)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SpriteId, &SpriteEntry<T>)> {
        self.sprites.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&SpriteId, &mut SpriteEntry<T>)> {
        self.sprites.iter_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = &SpriteId> {
        self.sprites.keys()
    }

    /// Id and position of every sprite, for collision scans.
    pub fn bodies(&self) -> Vec<(&SpriteId, Position)> {
        self.sprites
            .iter()
            .map(|(id, entry)| (id, entry.state.position()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}
