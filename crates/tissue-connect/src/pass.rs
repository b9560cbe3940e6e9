//! Prologue and epilogue shared by the connectivity passes.

use std::time::Instant;

use tissue_arena::TissueState;
use tissue_engine::{EngineConfig, EngineError, PassMetrics};

use crate::error::ConnectError;

/// Resolve the thread count and reject a poisoned store.
pub(crate) fn begin(store: &TissueState, thread_count: usize) -> Result<usize, ConnectError> {
    let config = EngineConfig::with_threads(thread_count);
    config.validate().map_err(EngineError::from)?;
    if store.is_poisoned() {
        return Err(EngineError::StorePoisoned.into());
    }
    Ok(config.resolved_thread_count())
}

/// Turn per-worker outcomes into metrics, poisoning the store on failure.
///
/// A worker that returned an error stopped part-way through its share, so
/// the store is poisoned for worker errors as well as for panics.
pub(crate) fn finish(
    store: &TissueState,
    name: &str,
    workers: usize,
    start: Instant,
    outcome: Result<Vec<Result<u64, ConnectError>>, EngineError>,
) -> Result<PassMetrics, ConnectError> {
    let per_worker = outcome.inspect_err(|_| store.mark_poisoned())?;
    let mut items_visited = 0;
    for result in per_worker {
        items_visited += result.inspect_err(|e| {
            tracing::warn!(error = %e, "connectivity pass failed");
            store.mark_poisoned();
        })?;
    }
    let metrics = PassMetrics {
        name: name.to_string(),
        workers,
        items_visited,
        elapsed_us: start.elapsed().as_micros() as u64,
    };
    tracing::debug!(
        items = metrics.items_visited,
        elapsed_us = metrics.elapsed_us,
        "pass complete"
    );
    Ok(metrics)
}
