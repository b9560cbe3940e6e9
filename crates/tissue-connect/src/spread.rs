//! Spreading synapses into column neighbourhoods by cyclic permutation.
//!
//! A spread picks one territory slot per unit of the distribution matrix
//! (an *ordinal*) and rotates the source columns stored in that slot along
//! the cycles of `column ↦ shift(column) + offset`. Every slot keeps its
//! columnar source coordinate, so the number of synapses each column
//! receives from each source kind never changes.

use std::time::Instant;

use tissue_arena::TissueState;
use tissue_core::{
    read_columnar_coord_from_bits, read_x_coord_from_bits, read_y_coord_from_bits,
    write_column_to_bits, KindOfCell, TissueCoordinates, TissueShape,
};
use tissue_engine::{fork_join, worker_count_for, PassMetrics};
use tissue_space::{shift_coordinate, StridedRange};

use crate::error::ConnectError;
use crate::matrix::DistributionMatrix;
use crate::pass;
use crate::shift_fn::{ColumnShift, IdentityShift};

/// One territory slot of the target kind, identified the same way in every
/// column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ordinal {
    /// Columnar coordinate of the cell owning the territory.
    pub cell: u32,
    /// Slot within the territory.
    pub slot: u32,
}

/// Move synapses of `target` sourcing from `source` towards the column
/// offsets counted in `matrix`, following `shift`.
///
/// Each nonzero matrix entry claims as many ordinals as it counts. The
/// ordinals are the target slots of column `(0, 0)` that source from
/// `source`, taken slot by slot with the cell index fastest. Every ordinal
/// is an independent task; tasks are shared round-robin between
/// `thread_count` workers.
///
/// A task rotates its slot along `current → shift(current) + Δ` for every
/// column that still holds its own column. The walk stops when it falls off
/// a non-torus axis, hits a fixed point, meets a slot that already holds the
/// current column, or comes back to where it started.
///
/// # Errors
///
/// Structural problems with the arguments are reported before any write.
/// Inconsistent tissue found during the walk fails the pass and poisons
/// the store.
pub fn spread_synapses_into_neighbourhoods<S>(
    store: &TissueState,
    target: KindOfCell,
    source: KindOfCell,
    matrix: &DistributionMatrix,
    shift: &S,
    thread_count: usize,
) -> Result<PassMetrics, ConnectError>
where
    S: ColumnShift + ?Sized,
{
    let shape = store.shape();
    check_kinds(shape, target, source)?;
    check_diameters(shape, matrix)?;
    let threads = pass::begin(store, thread_count)?;

    let ordinals = ordinals_of_source_kind(store, target, source);
    let required = matrix.sum();
    if required > ordinals.len() as u64 {
        return Err(ConnectError::NotEnoughSourceSynapses {
            required,
            available: ordinals.len() as u64,
        });
    }
    let mut tasks = Vec::with_capacity(required as usize);
    let mut unclaimed = ordinals.into_iter();
    for (row, col, count) in matrix.nonzero() {
        let offset = matrix.offset_of(row, col);
        tasks.extend(unclaimed.by_ref().take(count as usize).map(|o| (o, offset)));
    }

    let workers = worker_count_for(threads, tasks.len() as u64);
    let span = tracing::debug_span!(
        "spread_synapses_into_neighbourhoods",
        target_kind = target.0,
        source_kind = source.0,
        tasks = tasks.len(),
        workers,
    );
    let _enter = span.enter();
    let start = Instant::now();

    let outcome = fork_join(workers, |worker| -> Result<u64, ConnectError> {
        let mut written = 0u64;
        for t in StridedRange::new(worker, workers, tasks.len() as u64) {
            let (ordinal, offset) = tasks[t as usize];
            written += rotate_ordinal(store, source, ordinal, offset, shift)?;
        }
        tracing::trace!(worker, written, "worker finished");
        Ok(written)
    });

    pass::finish(
        store,
        "spread_synapses_into_neighbourhoods",
        workers,
        start,
        outcome,
    )
}

/// [`spread_synapses_into_neighbourhoods`] with the identity column shift.
pub fn spread_synapses_into_local_neighbourhoods(
    store: &TissueState,
    target: KindOfCell,
    source: KindOfCell,
    matrix: &DistributionMatrix,
    thread_count: usize,
) -> Result<PassMetrics, ConnectError> {
    spread_synapses_into_neighbourhoods(store, target, source, matrix, &IdentityShift, thread_count)
}

/// Slots of column `(0, 0)` whose synapse sources from `source`, slot by
/// slot with the cell index fastest.
pub fn ordinals_of_source_kind(
    store: &TissueState,
    target: KindOfCell,
    source: KindOfCell,
) -> Vec<Ordinal> {
    let shape = store.shape();
    let c0 = shape.first_columnar_coord_of_kind(target);
    let cells = shape.cells_per_column(target);
    let mut ordinals = Vec::new();
    for slot in 0..shape.territory_size(target) {
        for cell in c0..c0 + cells {
            let bits = store.source_coordinates(TissueCoordinates::new(0, 0, cell), slot);
            let c = read_columnar_coord_from_bits(bits.as_ref());
            if shape.try_kind_at_columnar(c) == Some(source) {
                ordinals.push(Ordinal { cell, slot });
            }
        }
    }
    ordinals
}

pub(crate) fn check_kinds(
    shape: &TissueShape,
    target: KindOfCell,
    source: KindOfCell,
) -> Result<(), ConnectError> {
    if !shape.is_tissue_kind(target) {
        return Err(ConnectError::NotTissueKind { kind: target });
    }
    if source.0 >= shape.num_kinds() {
        return Err(ConnectError::UnknownKind { kind: source });
    }
    Ok(())
}

pub(crate) fn check_diameters(
    shape: &TissueShape,
    matrix: &DistributionMatrix,
) -> Result<(), ConnectError> {
    let axes = [
        ("x", matrix.diameter_x(), shape.x_extent()),
        ("y", matrix.diameter_y(), shape.y_extent()),
    ];
    for (axis, diameter, extent) in axes {
        if diameter >= extent {
            return Err(ConnectError::InvalidDiameter {
                axis,
                diameter,
                extent,
            });
        }
    }
    Ok(())
}

/// Rotate the cycles of one ordinal; returns the slots written.
fn rotate_ordinal<S>(
    store: &TissueState,
    source: KindOfCell,
    ordinal: Ordinal,
    (dx, dy): (i32, i32),
    shift: &S,
) -> Result<u64, ConnectError>
where
    S: ColumnShift + ?Sized,
{
    let shape = store.shape();
    let extents = shape.extents();
    let torus = shape.torus_axes();
    let slot_at = |x: u32, y: u32| {
        let at = TissueCoordinates::new(x, y, ordinal.cell);
        let bits = store.source_coordinates(at, ordinal.slot);
        let c = read_columnar_coord_from_bits(bits.as_ref());
        if shape.try_kind_at_columnar(c) != Some(source) {
            return Err(ConnectError::SourceKindMismatch {
                column: (x, y),
                cell: ordinal.cell,
                slot: ordinal.slot,
            });
        }
        let column = (
            read_x_coord_from_bits(bits.as_ref()),
            read_y_coord_from_bits(bits.as_ref()),
        );
        Ok((bits, column))
    };

    let mut written = 0;
    for x in 0..extents.x {
        for y in 0..extents.y {
            let (_, stored) = slot_at(x, y)?;
            if stored != (x, y) {
                continue;
            }
            let mut current = (x, y);
            loop {
                let (sx, sy) = shift.shift(current.0, current.1);
                if sx >= extents.x || sy >= extents.y {
                    return Err(ConnectError::ShiftOutOfRange {
                        from: current,
                        to: (sx, sy),
                    });
                }
                let next = match (
                    shift_coordinate(sx, dx, extents.x, torus.x),
                    shift_coordinate(sy, dy, extents.y, torus.y),
                ) {
                    (Some(nx), Some(ny)) => (nx, ny),
                    _ => break,
                };
                if next == current {
                    break;
                }
                let (bits, found) = slot_at(next.0, next.1)?;
                if found == current {
                    break;
                }
                if found != next {
                    return Err(ConnectError::BrokenCycle {
                        column: next,
                        found,
                    });
                }
                write_column_to_bits(current.0, current.1, &bits);
                written += 1;
                current = next;
                if current == (x, y) {
                    break;
                }
            }
        }
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fill::fill_territories;
    use crate::matrix::FillMatrix;
    use tissue_core::TorusAxes;
    use tissue_test_utils::{connect_shape, single_kind_shape, store_for};

    fn filled_connect_store() -> TissueState {
        let shape = connect_shape();
        let store = store_for(shape.clone());
        // Kind 0: 10 slots from itself, 8 from kind 1. Kind 1: all from sensory.
        // Slots 0..5 of cell 0 source from cell 0, the rest of the run from cell 1.
        let m = FillMatrix::new(&shape, vec![10, 8, 0, 0, 0, 12]).unwrap();
        fill_territories(&store, &m, 2).unwrap();
        store
    }

    #[test]
    fn ordinals_scan_cells_fastest() {
        let store = filled_connect_store();
        let own = ordinals_of_source_kind(&store, KindOfCell(0), KindOfCell(0));
        // Cell 0 holds slots 0..9 from kind 0; cell 1 holds slot 0 from kind 0.
        assert_eq!(own.len(), 10);
        assert_eq!(own[0], Ordinal { cell: 0, slot: 0 });
        assert_eq!(own[1], Ordinal { cell: 1, slot: 0 });
        assert_eq!(own[2], Ordinal { cell: 0, slot: 1 });
        let other = ordinals_of_source_kind(&store, KindOfCell(0), KindOfCell(1));
        assert_eq!(other.len(), 8);
        assert!(other.iter().all(|o| o.cell == 1));
    }

    #[test]
    fn translation_moves_whole_rows() {
        let store = filled_connect_store();
        let m = DistributionMatrix::new(3, 1, vec![0, 0, 1]).unwrap();
        let metrics =
            spread_synapses_into_local_neighbourhoods(&store, KindOfCell(0), KindOfCell(0), &m, 1)
                .unwrap();
        assert_eq!(metrics.items_visited, 35);
        for x in 0..7 {
            for y in 0..5 {
                let at = TissueCoordinates::new(x, y, 0);
                assert_eq!(
                    store.source_of_synapse(at, 0),
                    TissueCoordinates::new((x + 6) % 7, y, 0)
                );
                // Other ordinals are untouched.
                assert_eq!(store.source_of_synapse(at, 1), TissueCoordinates::new(x, y, 0));
                assert_eq!(store.source_of_synapse(at, 6), TissueCoordinates::new(x, y, 1));
            }
        }
    }

    #[test]
    fn flat_axis_stops_the_walk() {
        let shape = single_kind_shape(4, 3, 1, 1, TorusAxes::NONE);
        let store = store_for(shape.clone());
        fill_territories(&store, &FillMatrix::new(&shape, vec![1]).unwrap(), 1).unwrap();
        let m = DistributionMatrix::new(3, 1, vec![0, 0, 1]).unwrap();
        spread_synapses_into_local_neighbourhoods(&store, KindOfCell(0), KindOfCell(0), &m, 2)
            .unwrap();
        for y in 0..3 {
            let row: Vec<u32> = (0..4)
                .map(|x| store.source_of_synapse(TissueCoordinates::new(x, y, 0), 0).x)
                .collect();
            assert_eq!(row, vec![0, 0, 1, 2]);
        }
    }

    #[test]
    fn argument_errors_leave_store_untouched() {
        let store = filled_connect_store();
        let before = store.snapshot();
        let wide = DistributionMatrix::zeros(7, 3).unwrap();
        assert!(matches!(
            spread_synapses_into_local_neighbourhoods(&store, KindOfCell(0), KindOfCell(0), &wide, 1),
            Err(ConnectError::InvalidDiameter { axis: "x", diameter: 7, extent: 7 })
        ));
        let m = DistributionMatrix::new(3, 3, vec![2; 9]).unwrap();
        assert!(matches!(
            spread_synapses_into_local_neighbourhoods(&store, KindOfCell(0), KindOfCell(0), &m, 1),
            Err(ConnectError::NotEnoughSourceSynapses { required: 18, available: 10 })
        ));
        assert!(matches!(
            spread_synapses_into_local_neighbourhoods(&store, KindOfCell(2), KindOfCell(0), &m, 1),
            Err(ConnectError::NotTissueKind { .. })
        ));
        assert!(matches!(
            spread_synapses_into_local_neighbourhoods(&store, KindOfCell(0), KindOfCell(3), &m, 1),
            Err(ConnectError::UnknownKind { .. })
        ));
        assert_eq!(store, before);
        assert!(!store.is_poisoned());
    }

    #[test]
    fn escaping_shift_poisons_the_store() {
        let store = filled_connect_store();
        let m = DistributionMatrix::new(1, 1, vec![1]).unwrap();
        let escape = |x: u32, y: u32| (x + 7, y);
        let err =
            spread_synapses_into_neighbourhoods(&store, KindOfCell(0), KindOfCell(0), &m, &escape, 1)
                .unwrap_err();
        assert_eq!(
            err,
            ConnectError::ShiftOutOfRange {
                from: (0, 0),
                to: (7, 0)
            }
        );
        assert!(store.is_poisoned());
    }
}
