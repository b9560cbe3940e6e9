//! Tissue: packed neural-tissue state with a parallel transition engine.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all tissue sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use tissue::prelude::*;
//!
//! let shape = TissueShape::builder(8, 8)
//!     .torus(TorusAxes::XY)
//!     .tissue_kind(TissueCellKind {
//!         cells_per_column: 2,
//!         synapses_in_territory: 4,
//!         bits_per_cell: 8,
//!         bits_per_synapse: 4,
//!         bits_per_signalling: 2,
//!         neighbourhood_radius: Radius::new(1, 1, 0),
//!     })
//!     .build()
//!     .unwrap();
//! let store = TissueState::new(Arc::new(shape)).unwrap();
//!
//! // Every synapse starts out listening to a cell of its own column.
//! let fill = FillMatrix::new(store.shape(), vec![8]).unwrap();
//! fill_territories(&store, &fill, 4).unwrap();
//!
//! // Count the cells up by one.
//! let increment = FnTransition::new(
//!     "increment",
//!     TransitionTarget::Cell,
//!     |own: Bits<'_>, _: &PositionMeta<'_>, _: &Neighbourhood<'_>| {
//!         own.set_value(own.value() + 1);
//!     },
//! );
//! let metrics = apply_transition(&store, &increment, 4).unwrap();
//! assert_eq!(metrics.items_visited, 8 * 8 * 2);
//! assert_eq!(store.cell(TissueCoordinates::new(3, 5, 1)).value(), 1);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tissue-core` | IDs, coordinates, bit spans, shape configuration |
//! | [`arena`] | `tissue-arena` | Homogenous slices, layout plan, the packed store |
//! | [`space`] | `tissue-space` | Enumeration, partitioning, shifts, neighbourhoods |
//! | [`transition`] | `tissue-transition` | Transition capability and neighbour resolution |
//! | [`engine`] | `tissue-engine` | Fork/join passes, configuration, metrics |
//! | [`connect`] | `tissue-connect` | Territory filling, synapse spreading, checks |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, bit spans and shape configuration (`tissue-core`).
pub use tissue_core as types;

/// Packed tissue storage (`tissue-arena`).
///
/// [`arena::TissueState`] owns one buffer per distinct element width and
/// hands out bit spans by coordinates.
pub use tissue_arena as arena;

/// Coordinate utilities (`tissue-space`).
pub use tissue_space as space;

/// Transition capability (`tissue-transition`).
///
/// Implement [`transition::TransitionFunction`] or wrap a closure in
/// [`transition::FnTransition`].
pub use tissue_transition as transition;

/// Parallel passes over a store (`tissue-engine`).
pub use tissue_engine as engine;

/// Connectivity initialisation and checks (`tissue-connect`).
pub use tissue_connect as connect;

/// Common imports for typical tissue usage.
///
/// ```rust
/// use tissue::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use tissue_core::{
        Bits, BitsRef, KindOfCell, Radius, ShiftInCoordinates, TerritorialState,
        TissueCellKind, TissueCoordinates, TissueShape, TorusAxes,
    };

    // Store
    pub use tissue_arena::TissueState;

    // Transitions
    pub use tissue_transition::{
        FnTransition, MuscleTransition, NeighbourCategory, Neighbourhood, PositionMeta,
        TransitionFunction, TransitionTarget,
    };

    // Engine
    pub use tissue_engine::{
        apply_transition, apply_transition_of_synapses_to_muscles, apply_transition_with,
        EngineConfig, PassMetrics, ReadMode,
    };

    // Connectivity
    pub use tissue_connect::{
        check_consistency_of_matrix_and_tissue, fill_territories,
        spread_synapses_into_local_neighbourhoods, spread_synapses_into_neighbourhoods,
        ColumnShift, DistributionMatrix, FillMatrix, IdentityShift,
    };

    // Errors
    pub use tissue_arena::ArenaError;
    pub use tissue_connect::ConnectError;
    pub use tissue_core::ShapeError;
    pub use tissue_engine::EngineError;
}
