//! Benchmark profiles for packed tissue simulation.
//!
//! - [`reference_profile`]: 64x64 torus (4K columns), two tissue kinds and
//!   one sensory kind
//! - [`stress_profile`]: 200x200 torus (40K columns), same kinds
//! - [`connected_store`]: a store of either profile with territories filled
//!   by [`reference_fill`]

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::Arc;

use tissue_arena::TissueState;
use tissue_connect::{fill_territories, ConnectError, DistributionMatrix, FillMatrix};
use tissue_core::{Radius, TissueCellKind, TissueShape, TorusAxes};

fn profile(side: u32) -> TissueShape {
    let excitatory = TissueCellKind {
        cells_per_column: 6,
        synapses_in_territory: 24,
        bits_per_cell: 16,
        bits_per_synapse: 12,
        bits_per_signalling: 8,
        neighbourhood_radius: Radius::new(2, 2, 1),
    };
    let inhibitory = TissueCellKind {
        cells_per_column: 2,
        synapses_in_territory: 12,
        bits_per_cell: 10,
        bits_per_synapse: 7,
        bits_per_signalling: 5,
        neighbourhood_radius: Radius::new(1, 1, 1),
    };
    TissueShape::builder(side, side)
        .torus(TorusAxes::XY)
        .tissue_kind(excitatory)
        .tissue_kind(inhibitory)
        .sensory_kind(32)
        .bits_per_sensory_cell(4)
        .synapses_to_muscles(64, 9)
        .build()
        .expect("profile shape is valid")
}

/// Build the reference profile: 64x64 columns, 8 cells per column.
pub fn reference_profile() -> TissueShape {
    profile(64)
}

/// Build the stress profile: 200x200 columns, 8 cells per column.
pub fn stress_profile() -> TissueShape {
    profile(200)
}

/// Fill matrix for the profiles: the excitatory kind takes half its
/// synapses from itself, a quarter from each of the other kinds; the
/// inhibitory kind listens only to the excitatory one.
pub fn reference_fill(shape: &TissueShape) -> Result<FillMatrix, ConnectError> {
    FillMatrix::new(shape, vec![72, 36, 36, 24, 0, 0])
}

/// 5x5 neighbourhood using 48 of the 72 excitatory-to-excitatory synapses.
pub fn reference_distribution() -> DistributionMatrix {
    let mut counts = vec![1; 25];
    counts[12] = 24;
    DistributionMatrix::new(5, 5, counts).expect("5x5 matrix")
}

/// Allocate a store for `shape` and fill its territories with
/// [`reference_fill`].
pub fn connected_store(shape: TissueShape, threads: usize) -> TissueState {
    let fill = reference_fill(&shape).expect("profile fill matrix matches shape");
    let store = TissueState::new(Arc::new(shape)).expect("profile store fits in memory");
    fill_territories(&store, &fill, threads).expect("fill of a fresh store succeeds");
    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use tissue_core::KindOfCell;

    #[test]
    fn reference_fill_matches_territories() {
        let shape = reference_profile();
        assert_eq!(shape.extents().num_columns(), 4096);
        assert!(reference_fill(&shape).is_ok());
    }

    #[test]
    fn distribution_fits_source_synapses() {
        let m = reference_distribution();
        assert_eq!(m.sum(), 48);
        let shape = reference_profile();
        let fill = reference_fill(&shape).unwrap();
        assert!(m.sum() <= fill.get(KindOfCell(0), KindOfCell(0)) as u64);
    }

    #[test]
    fn connected_store_is_filled() {
        let store = connected_store(reference_profile(), 4);
        let ordinals =
            tissue_connect::ordinals_of_source_kind(&store, KindOfCell(0), KindOfCell(0));
        assert_eq!(ordinals.len(), 72);
    }
}
