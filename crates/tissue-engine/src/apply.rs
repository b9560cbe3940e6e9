//! Transition passes over the whole store.

use std::time::Instant;

use tissue_arena::TissueState;
use tissue_space::{SpatialNeighbourhood, StridedPositions, StridedRange};
use tissue_transition::{
    MuscleTransition, Neighbourhood, PositionMeta, TransitionFunction, TransitionTarget,
};

use crate::config::{EngineConfig, ReadMode};
use crate::error::EngineError;
use crate::fork_join::{fork_join, worker_count_for};
use crate::metrics::PassMetrics;

/// Apply `transition` to every position with `thread_count` workers,
/// reading neighbours in place.
pub fn apply_transition<T>(
    store: &TissueState,
    transition: &T,
    thread_count: usize,
) -> Result<PassMetrics, EngineError>
where
    T: TransitionFunction + ?Sized,
{
    apply_transition_with(store, transition, &EngineConfig::with_threads(thread_count))
}

/// Apply `transition` to every position as configured by `config`.
///
/// Each position is visited exactly once (once per territory slot for
/// [`TransitionTarget::Synapse`]). Its neighbourhood is the radius of its
/// kind, clipped per axis. Neighbour, territory and source-cell lookups
/// all read the view selected by [`EngineConfig::read_mode`].
pub fn apply_transition_with<T>(
    store: &TissueState,
    transition: &T,
    config: &EngineConfig,
) -> Result<PassMetrics, EngineError>
where
    T: TransitionFunction + ?Sized,
{
    config.validate()?;
    if store.is_poisoned() {
        return Err(EngineError::StorePoisoned);
    }
    let shape = store.shape();
    let extents = shape.extents();
    let torus = shape.torus_axes();
    let workers = worker_count_for(config.resolved_thread_count(), extents.num_positions());
    let target = transition.target();
    let category = transition.neighbour_category();

    let span = tracing::debug_span!(
        "apply_transition",
        name = transition.name(),
        workers,
        read_mode = ?config.read_mode,
    );
    let _enter = span.enter();
    let start = Instant::now();

    let frozen;
    let view = match config.read_mode {
        ReadMode::Live => store,
        ReadMode::Frozen => {
            frozen = store.snapshot();
            &frozen
        }
    };

    let outcome = fork_join(workers, |worker| {
        let mut visited = 0u64;
        for at in StridedPositions::new(worker, workers, extents) {
            let kind = shape.kind_at_columnar(at.c);
            let spatial =
                SpatialNeighbourhood::around(at, shape.neighbourhood_radius(kind), extents, torus);
            let neighbours = Neighbourhood::new(view, spatial, category);
            match target {
                TransitionTarget::Cell => {
                    let meta = PositionMeta::new(shape, at, None);
                    transition.transition(store.cell(at), &meta, &neighbours);
                    visited += 1;
                }
                TransitionTarget::Signalling => {
                    let meta = PositionMeta::new(shape, at, None);
                    transition.transition(store.signalling(at), &meta, &neighbours);
                    visited += 1;
                }
                TransitionTarget::Synapse => {
                    for slot in 0..shape.territory_size(kind) {
                        let meta = PositionMeta::new(shape, at, Some(slot));
                        let neighbours = neighbours.for_slot(slot);
                        transition.transition(store.synapse(at, slot), &meta, &neighbours);
                        visited += 1;
                    }
                }
            }
        }
        tracing::trace!(worker, visited, "worker finished");
        visited
    });

    finish(store, transition.name(), workers, start, outcome)
}

/// Apply `transition` to every synapse to a muscle with `thread_count`
/// workers.
///
/// The source of each synapse is resolved from its stored coordinates: a
/// tissue cell when the columnar coordinate lies inside the tissue, the
/// sensory cell `c - C` otherwise.
pub fn apply_transition_of_synapses_to_muscles<M>(
    store: &TissueState,
    transition: &M,
    thread_count: usize,
) -> Result<PassMetrics, EngineError>
where
    M: MuscleTransition + ?Sized,
{
    let config = EngineConfig::with_threads(thread_count);
    config.validate()?;
    if store.is_poisoned() {
        return Err(EngineError::StorePoisoned);
    }
    let shape = store.shape();
    let items = shape.num_muscle_synapses() as u64;
    let workers = worker_count_for(config.resolved_thread_count(), items);

    let span = tracing::debug_span!(
        "apply_transition_of_synapses_to_muscles",
        name = transition.name(),
        workers,
    );
    let _enter = span.enter();
    let start = Instant::now();

    let outcome = fork_join(workers, |worker| {
        let mut visited = 0u64;
        for index in StridedRange::new(worker, workers, items) {
            let index = index as u32;
            let source_at = store.source_of_muscle_synapse(index);
            let source_kind = shape.kind_at_columnar(source_at.c);
            let source = if shape.is_tissue_kind(source_kind) {
                store.cell(source_at)
            } else {
                store.sensory_cell(source_at.c - shape.columnar_extent())
            };
            transition.transition(
                store.muscle_synapse(index),
                index,
                source.as_ref(),
                source_kind,
            );
            visited += 1;
        }
        visited
    });

    finish(store, transition.name(), workers, start, outcome)
}

fn finish(
    store: &TissueState,
    name: &str,
    workers: usize,
    start: Instant,
    outcome: Result<Vec<u64>, EngineError>,
) -> Result<PassMetrics, EngineError> {
    let per_worker = outcome.inspect_err(|_| store.mark_poisoned())?;
    let metrics = PassMetrics {
        name: name.to_string(),
        workers,
        items_visited: per_worker.iter().sum(),
        elapsed_us: start.elapsed().as_micros() as u64,
    };
    tracing::debug!(
        items = metrics.items_visited,
        elapsed_us = metrics.elapsed_us,
        "pass complete"
    );
    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tissue_core::{write_tissue_coordinates_to_bits, TerritorialState, TissueCoordinates};
    use tissue_test_utils::{
        randomize_store, store_for, two_kind_shape, CopySourceToMuscle, CopySourceToSynapse,
        CountingTransition, DeliveringSynapseSum, IncrementCell, NeighbourSum,
        PanickingTransition,
    };
    use tissue_transition::FnTransition;

    #[test]
    fn every_position_is_visited_once() {
        let store = store_for(two_kind_shape());
        for threads in [1, 3, 8] {
            let counter = CountingTransition::new(TransitionTarget::Cell);
            let m = apply_transition(&store, &counter, threads).unwrap();
            assert_eq!(counter.calls(), 4 * 3 * 4);
            assert_eq!(m.items_visited, 48);
            assert_eq!(m.workers, threads);
        }
    }

    #[test]
    fn synapse_passes_visit_every_slot() {
        let store = store_for(two_kind_shape());
        let counter = CountingTransition::new(TransitionTarget::Synapse);
        apply_transition(&store, &counter, 4).unwrap();
        // 12 columns × (2 cells × 3 slots + 2 cells × 2 slots)
        assert_eq!(counter.calls(), 12 * (6 + 4));
    }

    #[test]
    fn increment_touches_only_cells() {
        let store = store_for(two_kind_shape());
        apply_transition(&store, &IncrementCell, 2).unwrap();
        let at = TissueCoordinates::new(3, 2, 3);
        assert_eq!(store.cell(at).value(), 1);
        assert_eq!(store.signalling(at).value(), 0);
    }

    #[test]
    fn signalling_target_writes_signalling() {
        let store = store_for(two_kind_shape());
        let t = FnTransition::new("set", TransitionTarget::Signalling, |own, _m, _n| {
            own.set_value(1)
        });
        apply_transition(&store, &t, 3).unwrap();
        assert_eq!(store.signalling(TissueCoordinates::new(1, 1, 1)).value(), 1);
        assert_eq!(store.cell(TissueCoordinates::new(1, 1, 1)).value(), 0);
    }

    #[test]
    fn frozen_reads_ignore_same_pass_writes() {
        let store = store_for(two_kind_shape());
        store.cell(TissueCoordinates::new(0, 0, 0)).set_value(1);
        let config = EngineConfig::with_threads(1).read_mode(ReadMode::Frozen);
        apply_transition_with(&store, &NeighbourSum, &config).unwrap();
        // (1, 0, 0) sees the original 1 at (0, 0, 0), not its updated value.
        assert_eq!(store.cell(TissueCoordinates::new(1, 0, 0)).value(), 1);
        assert_eq!(store.cell(TissueCoordinates::new(3, 2, 1)).value(), 1);
        assert_eq!(store.cell(TissueCoordinates::new(2, 0, 0)).value(), 0);
    }

    #[test]
    fn panic_poisons_the_store() {
        let store = store_for(two_kind_shape());
        let bad = PanickingTransition {
            trigger: TissueCoordinates::new(2, 1, 2),
        };
        let err = apply_transition(&store, &bad, 4).unwrap_err();
        assert!(matches!(err, EngineError::WorkerPanicked { .. }));
        assert!(store.is_poisoned());
        assert_eq!(
            apply_transition(&store, &IncrementCell, 1),
            Err(EngineError::StorePoisoned)
        );
    }

    #[test]
    fn zero_threads_is_rejected() {
        let store = store_for(two_kind_shape());
        assert!(matches!(
            apply_transition(&store, &IncrementCell, 0),
            Err(EngineError::Config(_))
        ));
        assert!(!store.is_poisoned());
    }

    #[test]
    fn muscles_read_tissue_and_sensory_sources() {
        let store = store_for(two_kind_shape());
        randomize_store(&store, 3);
        let shape = store.shape();
        let tissue_source = TissueCoordinates::new(1, 2, 2);
        let sensory_source = TissueCoordinates::new(0, 0, shape.columnar_coord_of_sensory_cell(4));
        for i in 0..4 {
            let src = if i % 2 == 0 { tissue_source } else { sensory_source };
            write_tissue_coordinates_to_bits(src, &store.muscle_source_coordinates(i));
        }
        let m = apply_transition_of_synapses_to_muscles(&store, &CopySourceToMuscle, 3).unwrap();
        assert_eq!(m.items_visited, 4);
        assert_eq!(m.workers, 3);
        // Kind 1 cells are 6 bits wide, as are muscle synapses.
        assert_eq!(store.muscle_synapse(0).value(), store.cell(tissue_source).value());
        // Sensory cells are 4 bits wide.
        assert_eq!(store.muscle_synapse(1).value(), store.sensory_cell(4).value());
    }

    #[test]
    fn synapses_read_tissue_and_sensory_sources() {
        let store = store_for(two_kind_shape());
        let shape = store.shape();
        let owner = TissueCoordinates::new(1, 2, 0);
        let tissue_source = TissueCoordinates::new(3, 0, 3);
        let sensory = shape.columnar_coord_of_sensory_cell(1);
        store.cell(tissue_source).set_value(0b10_1101);
        store.sensory_cell(1).set_value(0b0110);
        write_tissue_coordinates_to_bits(tissue_source, &store.source_coordinates(owner, 0));
        write_tissue_coordinates_to_bits(
            TissueCoordinates::new(0, 0, sensory),
            &store.source_coordinates(owner, 1),
        );
        write_tissue_coordinates_to_bits(
            TissueCoordinates::new(0, 0, shape.columnar_extent() + shape.num_sensory_cells()),
            &store.source_coordinates(owner, 2),
        );
        store.synapse(owner, 2).set_value(3);

        let config = EngineConfig::with_threads(3).read_mode(ReadMode::Frozen);
        apply_transition_with(&store, &CopySourceToSynapse, &config).unwrap();
        // Kind 0 synapses are 5 bits wide.
        assert_eq!(store.synapse(owner, 0).value(), 0b0_1101);
        assert_eq!(store.synapse(owner, 1).value(), 0b0110);
        assert_eq!(store.synapse(owner, 2).value(), 0);
    }

    #[test]
    fn territory_lookups_follow_the_read_mode() {
        // Each slot takes the value of the next slot of its territory.
        let rotate = FnTransition::new("rotate", TransitionTarget::Synapse, |own, meta, n| {
            let size = n.territory_size();
            let next = meta.slot().map_or(0, |s| (s + 1) % size);
            own.set_value(n.territory_synapse(next).value());
        });
        let at = TissueCoordinates::new(2, 2, 1);
        let fill = |store: &TissueState| {
            for slot in 0..3 {
                store.synapse(at, slot).set_value(slot as u64 + 1);
            }
        };

        let frozen = store_for(two_kind_shape());
        fill(&frozen);
        let config = EngineConfig::with_threads(1).read_mode(ReadMode::Frozen);
        apply_transition_with(&frozen, &rotate, &config).unwrap();
        let values: Vec<u64> = (0..3).map(|s| frozen.synapse(at, s).value()).collect();
        assert_eq!(values, vec![2, 3, 1]);

        let live = store_for(two_kind_shape());
        fill(&live);
        apply_transition(&live, &rotate, 1).unwrap();
        let values: Vec<u64> = (0..3).map(|s| live.synapse(at, s).value()).collect();
        assert_eq!(values, vec![2, 3, 2]);
    }

    #[test]
    fn cells_read_territorial_states_and_delimiters() {
        let store = store_for(two_kind_shape());
        let at = TissueCoordinates::new(0, 1, 1);
        for (slot, value) in [(0, 4), (1, 8), (2, 16)] {
            store.synapse(at, slot).set_value(value);
        }
        store
            .territorial_state(at, 1)
            .set_value(TerritorialState::MigrationAlongPositiveXAxis.to_bits());
        store.delimiter(at, 0).set_value(1);
        store.delimiter(at, 5).set_value(3);

        let config = EngineConfig::with_threads(4).read_mode(ReadMode::Frozen);
        apply_transition_with(&store, &DeliveringSynapseSum, &config).unwrap();
        assert_eq!(store.cell(at).value(), 1 + 4 + 16);
        // The pass reads territorial data without writing it.
        assert_eq!(
            TerritorialState::from_bits(store.territorial_state(at, 1).value()),
            Some(TerritorialState::MigrationAlongPositiveXAxis)
        );
        assert_eq!(store.delimiter(at, 5).value(), 3);
        assert_eq!(store.cell(TissueCoordinates::new(3, 2, 2)).value(), 0);
    }
}
