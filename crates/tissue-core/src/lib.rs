//! Core types for packed neural-tissue simulations.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by every other crate in the workspace:
//! cell-kind IDs, tissue coordinates and shifts, the bit-span accessors
//! over shared packed buffers, the immutable [`TissueShape`] configuration,
//! and the territorial state of synapses.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bits;
pub mod coords;
pub mod error;
pub mod id;
pub mod shape;
pub mod territory;

pub use bits::{
    bits_to_value, read_columnar_coord_from_bits, read_tissue_coordinates_from_bits,
    read_x_coord_from_bits, read_y_coord_from_bits, value_to_bits, write_column_to_bits,
    write_tissue_coordinates_to_bits, BitBuffer, Bits, BitsRef,
};
pub use coords::{Radius, ShiftInCoordinates, TissueCoordinates, TissueExtents, TorusAxes};
pub use error::ShapeError;
pub use id::KindOfCell;
pub use shape::{bits_to_represent, TissueCellKind, TissueShape, TissueShapeBuilder};
pub use territory::{TerritorialState, NUM_DELIMITERS};
