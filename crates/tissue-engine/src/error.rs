//! Engine error types.

use std::error::Error;
use std::fmt;

use crate::config::ConfigError;

/// Errors returned by engine passes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// The pass configuration is invalid.
    Config(ConfigError),
    /// A worker panicked; the pass is incomplete.
    WorkerPanicked {
        /// Index of the failed worker.
        worker: usize,
        /// The panic payload, if it was a string.
        message: String,
    },
    /// A worker thread could not be spawned; the pass is incomplete.
    ThreadSpawnFailed {
        /// Index of the worker that could not be started.
        worker: usize,
        /// The OS error.
        reason: String,
    },
    /// An earlier pass failed part-way; the store must be rebuilt.
    StorePoisoned,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid engine config: {e}"),
            Self::WorkerPanicked { worker, message } => {
                write!(f, "worker {worker} panicked: {message}")
            }
            Self::ThreadSpawnFailed { worker, reason } => {
                write!(f, "could not spawn worker {worker}: {reason}")
            }
            Self::StorePoisoned => {
                write!(f, "store was left partially updated by a failed pass")
            }
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
