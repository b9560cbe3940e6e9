//! Test utilities for tissue development.
//!
//! Provides standard shapes, a seeded store randomiser and a handful of
//! transition fixtures shared by the unit, integration and benchmark
//! suites.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::Arc;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tissue_arena::TissueState;
use tissue_core::{Radius, TissueCellKind, TissueShape, TorusAxes};

pub use fixtures::{
    CopySourceToMuscle, CopySourceToSynapse, CountingTransition, DeliveringSynapseSum,
    IncrementCell, NeighbourSum, PanickingTransition, SlotStamp,
};

/// A tissue kind with the given cell count and territory, and small widths.
pub fn tissue_kind(cells_per_column: u32, synapses_in_territory: u32) -> TissueCellKind {
    TissueCellKind {
        cells_per_column,
        synapses_in_territory,
        bits_per_cell: 8,
        bits_per_synapse: 5,
        bits_per_signalling: 3,
        neighbourhood_radius: Radius::new(1, 1, 1),
    }
}

/// 4×3 columns, torus in x and y, two tissue kinds and two sensory kinds.
///
/// | kind | cells | territory | columnar range |
/// |------|-------|-----------|----------------|
/// | 0    | 2     | 3         | 0..2           |
/// | 1    | 2     | 2         | 2..4           |
/// | 2    | 3 sensory |       | 4..7 (sources) |
/// | 3    | 2 sensory |       | 7..9 (sources) |
///
/// Kind 1 uses a columnar radius of zero and different widths; four
/// synapses to muscles of six bits each.
pub fn two_kind_shape() -> TissueShape {
    let mut second = tissue_kind(2, 2);
    second.bits_per_cell = 6;
    second.bits_per_synapse = 4;
    second.bits_per_signalling = 2;
    second.neighbourhood_radius = Radius::new(1, 1, 0);
    TissueShape::builder(4, 3)
        .torus(TorusAxes::XY)
        .tissue_kind(tissue_kind(2, 3))
        .tissue_kind(second)
        .sensory_kind(3)
        .sensory_kind(2)
        .bits_per_sensory_cell(4)
        .synapses_to_muscles(4, 6)
        .build()
        .expect("fixture shape is valid")
}

/// A single tissue kind on an `x × y` grid.
pub fn single_kind_shape(
    x: u32,
    y: u32,
    cells_per_column: u32,
    territory: u32,
    torus: TorusAxes,
) -> TissueShape {
    TissueShape::builder(x, y)
        .torus(torus)
        .tissue_kind(tissue_kind(cells_per_column, territory))
        .build()
        .expect("fixture shape is valid")
}

/// A larger torus for connectivity tests: 7×5 columns, a target kind with
/// 2 cells and territory 9, a second tissue kind with 3 cells and
/// territory 4, and one sensory kind of 4 cells.
pub fn connect_shape() -> TissueShape {
    TissueShape::builder(7, 5)
        .torus(TorusAxes::XY)
        .tissue_kind(tissue_kind(2, 9))
        .tissue_kind(tissue_kind(3, 4))
        .sensory_kind(4)
        .build()
        .expect("fixture shape is valid")
}

/// Allocate a zeroed store for `shape`.
pub fn store_for(shape: TissueShape) -> TissueState {
    TissueState::new(Arc::new(shape)).expect("fixture store fits in memory")
}

/// Fill every element of `store` with values drawn from a ChaCha8 stream
/// seeded with `seed`.
pub fn randomize_store(store: &TissueState, seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for slice in store.slices() {
        let width = slice.element_bits();
        for i in 0..slice.num_elements() {
            let span = slice.element(i);
            let mut offset = 0;
            while offset < width {
                let chunk = (width - offset).min(64);
                let mask = if chunk == 64 {
                    u64::MAX
                } else {
                    (1u64 << chunk) - 1
                };
                span.write(offset, chunk, rng.next_u64() & mask);
                offset += chunk;
            }
        }
    }
}
