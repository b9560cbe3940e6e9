//! Initial assignment of synapse sources to territories.

use std::time::Instant;

use tissue_arena::TissueState;
use tissue_core::{write_tissue_coordinates_to_bits, KindOfCell, TissueCoordinates, TissueShape};
use tissue_engine::{fork_join, worker_count_for, PassMetrics};
use tissue_space::StridedColumns;

use crate::error::ConnectError;
use crate::matrix::FillMatrix;
use crate::pass;

/// Point every synapse of every tissue territory at a source cell in its
/// own column, as counted by `matrix`.
///
/// For target kind `i`, slots are walked cell by cell and, within a cell,
/// slot by slot. Consecutive runs of `matrix[i][j]` slots go to source kind
/// `j` in increasing `j`. A run of `count` slots is split into contiguous
/// blocks, one per cell of kind `j` in increasing order: its `n`-th slot
/// sources from cell `n * cells_of_kind(j) / count`. Every column receives
/// the same assignment.
///
/// The matrix is checked before anything is written: each row must sum to
/// the synapse count of one column's territories of its kind, and no
/// source kind without cells may be asked for.
pub fn fill_territories(
    store: &TissueState,
    matrix: &FillMatrix,
    thread_count: usize,
) -> Result<PassMetrics, ConnectError> {
    let shape = store.shape();
    check_matrix(shape, matrix)?;
    let threads = pass::begin(store, thread_count)?;
    let assignments: Vec<Vec<u32>> = shape
        .tissue_kinds()
        .map(|target| source_columnars(shape, matrix, target))
        .collect();

    let extents = shape.extents();
    let workers = worker_count_for(threads, extents.num_columns());
    let span = tracing::debug_span!("fill_territories", workers);
    let _enter = span.enter();
    let start = Instant::now();

    let outcome = fork_join(workers, |worker| -> Result<u64, ConnectError> {
        let mut written = 0u64;
        for (x, y) in StridedColumns::new(worker, workers, extents.x, extents.y) {
            for (target, sources) in shape.tissue_kinds().zip(&assignments) {
                let c0 = shape.first_columnar_coord_of_kind(target);
                let territory = shape.territory_size(target);
                for (n, &source_c) in sources.iter().enumerate() {
                    let n = n as u32;
                    let owner = TissueCoordinates::new(x, y, c0 + n / territory);
                    write_tissue_coordinates_to_bits(
                        TissueCoordinates::new(x, y, source_c),
                        &store.source_coordinates(owner, n % territory),
                    );
                }
                written += sources.len() as u64;
            }
        }
        tracing::trace!(worker, written, "worker finished");
        Ok(written)
    });

    pass::finish(store, "fill_territories", workers, start, outcome)
}

fn check_matrix(shape: &TissueShape, matrix: &FillMatrix) -> Result<(), ConnectError> {
    if matrix.num_targets() != shape.num_tissue_kinds() as usize
        || matrix.num_sources() != shape.num_kinds() as usize
    {
        return Err(ConnectError::MatrixShape {
            expected: shape.num_tissue_kinds() as usize * shape.num_kinds() as usize,
            actual: matrix.num_targets() * matrix.num_sources(),
        });
    }
    for target in shape.tissue_kinds() {
        for source in (0..shape.num_kinds()).map(KindOfCell) {
            if matrix.get(target, source) > 0 && shape.cells_of_kind(source) == 0 {
                return Err(ConnectError::EmptySourceKind { target, source });
            }
        }
        let expected =
            shape.cells_per_column(target) as u64 * shape.territory_size(target) as u64;
        let actual = matrix.row_sum(target);
        if actual != expected {
            return Err(ConnectError::RowSumMismatch {
                target,
                expected,
                actual,
            });
        }
    }
    Ok(())
}

/// Columnar source coordinate of every slot of one column's territories of
/// `target`, in cell-then-slot order.
fn source_columnars(shape: &TissueShape, matrix: &FillMatrix, target: KindOfCell) -> Vec<u32> {
    let mut sources = Vec::with_capacity(matrix.row_sum(target) as usize);
    for source in (0..shape.num_kinds()).map(KindOfCell) {
        let cells = shape.cells_of_kind(source);
        let first = if shape.is_tissue_kind(source) {
            shape.first_columnar_coord_of_kind(source)
        } else {
            shape.columnar_extent() + shape.first_sensory_index_of_kind(source)
        };
        let count = matrix.get(target, source);
        for n in 0..count {
            let cell = n as u64 * cells as u64 / count as u64;
            sources.push(first + cell as u32);
        }
    }
    sources
}
