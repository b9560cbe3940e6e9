//! Checks of tissue connectivity against distribution matrices.

use tissue_arena::TissueState;
use tissue_core::{read_columnar_coord_from_bits, KindOfCell, TissueCoordinates};
use tissue_engine::{fork_join, worker_count_for, EngineConfig, EngineError};
use tissue_space::StridedColumns;

use crate::error::ConnectError;
use crate::matrix::DistributionMatrix;
use crate::spread::{check_diameters, check_kinds};

/// Whether every column's territories of `target` hold exactly
/// `matrix.sum()` synapses sourcing from `source`.
///
/// Columns are shared round-robin between `thread_count` workers; each
/// worker stops at its first mismatch. The store is only read.
pub fn check_consistency_of_matrix_and_tissue(
    store: &TissueState,
    target: KindOfCell,
    source: KindOfCell,
    matrix: &DistributionMatrix,
    thread_count: usize,
) -> Result<bool, ConnectError> {
    let shape = store.shape();
    check_kinds(shape, target, source)?;
    check_diameters(shape, matrix)?;
    let config = EngineConfig::with_threads(thread_count);
    config.validate().map_err(EngineError::from)?;

    let extents = shape.extents();
    let expected = matrix.sum();
    let workers = worker_count_for(config.resolved_thread_count(), extents.num_columns());
    let span = tracing::debug_span!("check_consistency_of_matrix_and_tissue", workers);
    let _enter = span.enter();

    let per_worker = fork_join(workers, |worker| {
        StridedColumns::new(worker, workers, extents.x, extents.y)
            .all(|(x, y)| count_from_kind(store, target, source, x, y) == expected)
    })?;
    let consistent = per_worker.iter().all(|&ok| ok);
    if !consistent {
        tracing::debug!(expected, "tissue disagrees with matrix");
    }
    Ok(consistent)
}

/// Synapses in column `(x, y)`'s territories of `target` that source from
/// `source`.
pub fn count_from_kind(
    store: &TissueState,
    target: KindOfCell,
    source: KindOfCell,
    x: u32,
    y: u32,
) -> u64 {
    let shape = store.shape();
    let c0 = shape.first_columnar_coord_of_kind(target);
    let mut count = 0;
    for c in c0..c0 + shape.cells_per_column(target) {
        for slot in 0..shape.territory_size(target) {
            let bits = store.source_coordinates(TissueCoordinates::new(x, y, c), slot);
            let source_c = read_columnar_coord_from_bits(bits.as_ref());
            if shape.try_kind_at_columnar(source_c) == Some(source) {
                count += 1;
            }
        }
    }
    count
}

/// Histogram of the offsets from source column to `column` over the
/// synapses of `target` in `column` that source from `source`.
///
/// Entry `(row, col)` counts synapses whose source lies `offset_of(row,
/// col)` columns behind `column`. On torus axes offsets are taken modulo
/// the extent, as the signed value of least magnitude. Offsets outside the
/// `diameter_x × diameter_y` window are not counted.
pub fn count_synapses_by_source_offset(
    store: &TissueState,
    target: KindOfCell,
    source: KindOfCell,
    column: (u32, u32),
    diameter_x: u32,
    diameter_y: u32,
) -> Result<DistributionMatrix, ConnectError> {
    let shape = store.shape();
    check_kinds(shape, target, source)?;
    let mut histogram = DistributionMatrix::zeros(diameter_x, diameter_y)?;
    check_diameters(shape, &histogram)?;

    let extents = shape.extents();
    let torus = shape.torus_axes();
    let (x, y) = column;
    let c0 = shape.first_columnar_coord_of_kind(target);
    for c in c0..c0 + shape.cells_per_column(target) {
        for slot in 0..shape.territory_size(target) {
            let stored = store.source_of_synapse(TissueCoordinates::new(x, y, c), slot);
            if shape.try_kind_at_columnar(stored.c) != Some(source) {
                continue;
            }
            let dx = axis_offset(stored.x, x, extents.x, torus.x);
            let dy = axis_offset(stored.y, y, extents.y, torus.y);
            if let Some((row, col)) = histogram.cell_of_offset(dx, dy) {
                let count = histogram.get(row, col);
                histogram.set(row, col, count + 1);
            }
        }
    }
    Ok(histogram)
}

fn axis_offset(from: u32, to: u32, len: u32, torus: bool) -> i32 {
    let d = to as i64 - from as i64;
    if !torus {
        return d as i32;
    }
    let len = len as i64;
    let d = d.rem_euclid(len);
    (if d > len / 2 { d - len } else { d }) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn torus_offsets_take_the_short_way() {
        assert_eq!(axis_offset(6, 0, 7, true), 1);
        assert_eq!(axis_offset(0, 6, 7, true), -1);
        assert_eq!(axis_offset(2, 4, 7, true), 2);
        assert_eq!(axis_offset(0, 6, 7, false), 6);
        assert_eq!(axis_offset(4, 1, 10, false), -3);
    }
}
