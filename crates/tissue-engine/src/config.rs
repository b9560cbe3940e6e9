//! Engine configuration and validation.

use std::error::Error;
use std::fmt;

/// Upper bound on worker threads per pass.
pub const MAX_THREADS: usize = 256;

/// Which store view neighbourhood lookups read during a pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ReadMode {
    /// Read the store in place. Cheap, but a neighbour owned by another
    /// worker may or may not already hold this pass's value.
    #[default]
    Live,
    /// Read a snapshot taken when the pass starts.
    Frozen,
}

/// Configuration of a transition pass.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct EngineConfig {
    /// Worker threads. `None` = auto-detect from available parallelism.
    pub thread_count: Option<usize>,
    /// View read by neighbourhood lookups. Default: [`ReadMode::Live`].
    pub read_mode: ReadMode,
}

impl EngineConfig {
    /// In-place reads with exactly `thread_count` workers.
    pub fn with_threads(thread_count: usize) -> Self {
        Self {
            thread_count: Some(thread_count),
            read_mode: ReadMode::Live,
        }
    }

    /// Same configuration with `read_mode`.
    pub fn read_mode(mut self, read_mode: ReadMode) -> Self {
        self.read_mode = read_mode;
        self
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thread_count == Some(0) {
            return Err(ConfigError::ZeroThreads);
        }
        Ok(())
    }

    /// Resolve the actual worker count, applying auto-detection if `None`.
    ///
    /// Explicit values are clamped to `[1, MAX_THREADS]`.
    pub fn resolved_thread_count(&self) -> usize {
        match self.thread_count {
            Some(n) => n.clamp(1, MAX_THREADS),
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
                .clamp(1, MAX_THREADS),
        }
    }
}

/// Errors detected by [`EngineConfig::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A pass was requested with zero worker threads.
    ZeroThreads,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroThreads => write!(f, "thread count must be at least 1"),
        }
    }
}

impl Error for ConfigError {}
