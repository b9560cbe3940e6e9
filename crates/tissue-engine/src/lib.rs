//! Parallel transition engine for packed tissue state.
//!
//! Every pass forks a fresh set of scoped worker threads, hands worker `i`
//! of `N` the interleaved partition starting at linear index `i`, and joins
//! all of them before returning.
//!
//! # Passes
//!
//! - [`apply_transition`] / [`apply_transition_with`]: one
//!   [`TransitionFunction`](tissue_transition::TransitionFunction) call per
//!   position (or per territory slot for synapse passes).
//! - [`apply_transition_of_synapses_to_muscles`]: one call per synapse to a
//!   muscle, with the state of its source cell.
//!
//! # Read modes
//!
//! Workers only ever write their own positions. Neighbourhood reads may
//! target positions owned by other workers; with [`ReadMode::Live`] there is
//! no ordering between such a read and the other worker's write in the same
//! pass. [`ReadMode::Frozen`] reads a snapshot taken at pass start, which
//! makes neighbour-reading passes independent of the worker count.
//!
//! # Failure
//!
//! A panicking worker fails the pass with
//! [`EngineError::WorkerPanicked`]. The store is then marked poisoned and
//! every later pass against it returns [`EngineError::StorePoisoned`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod apply;
pub mod config;
pub mod error;
pub mod fork_join;
pub mod metrics;

pub use apply::{apply_transition, apply_transition_of_synapses_to_muscles, apply_transition_with};
pub use config::{ConfigError, EngineConfig, ReadMode, MAX_THREADS};
pub use error::EngineError;
pub use fork_join::{fork_join, worker_count_for};
pub use metrics::PassMetrics;
