//! Scripts: The fixed instruction vocabulary and its authoring format.
//!
//! A script is an ordered list of [`Instruction`]s. Instructions arrive in
//! the JSON shape produced by the block editor:
//!
//! ```text
//! {"id": "steps-1712", "name": "steps", "value": {"steps": 10}}
//! {"id": "say-1713",   "name": "say",   "value": {"say": {"text": "hi", "sec": 2}}}
//! ```
//!
//! Parsing is lenient. Unknown names are kept as [`Command::Unknown`] and
//! numeric fields that do not hold a number read as zero.

mod instruction;
mod params;

pub use instruction::{Command, Instruction, InstructionKind};

use crate::error::ScriptError;
use serde::{Deserialize, Serialize};

/// An ordered instruction sequence for one sprite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Script {
    instructions: Vec<Instruction>,
}

impl Script {
    /// Create a script from instructions.
    pub const fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    /// Parse a JSON array of instructions.
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render the script back to the authoring format.
    pub fn to_json(&self) -> Result<String, ScriptError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Borrow the instructions.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the script has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Take the instructions out of the script.
    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }
}

impl From<Vec<Instruction>> for Script {
    fn from(instructions: Vec<Instruction>) -> Self {
        Self::new(instructions)
    }
}

impl From<Script> for Vec<Instruction> {
    fn from(script: Script) -> Self {
        script.instructions
    }
}

impl FromIterator<Instruction> for Script {
    fn from_iter<I: IntoIterator<Item = Instruction>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
