//! Error types.
//!
//! Runtime trouble inside a script (unknown instructions, sprites removed
//! mid-run, unparseable numbers) is never an error; it is logged and
//! skipped. Only setup failures surface here.

use std::io;
use thiserror::Error;

/// Failure to read a script in the authoring format.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The input is not a JSON array of instructions.
    #[error("invalid script json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure reported by the engine facade.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The OS refused to start a worker thread.
    #[error("failed to spawn {role} thread: {source}")]
    Spawn {
        /// What the thread was for.
        role: &'static str,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
    /// A coordinator thread panicked before reporting its outcome.
    #[error("{role} thread panicked")]
    Panicked {
        /// What the thread was for.
        role: &'static str,
    },
    /// A script could not be parsed.
    #[error(transparent)]
    Script(#[from] ScriptError),
}
