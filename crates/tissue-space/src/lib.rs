//! Coordinate utilities for tissue grids.
//!
//! - [`enumerate`]: the linear position order (`x` fastest, then `y`, then
//!   columnar) and the interleaved partition of positions across workers.
//! - [`shift`]: per-axis clipping and application of signed shifts, with
//!   either torus wrap-around or clamping at the boundary.
//! - [`neighbourhood`]: the clipped box of relative shifts around a position.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod enumerate;
pub mod neighbourhood;
pub mod shift;

pub use enumerate::{
    coordinates_of, go_to_next_column, go_to_next_coordinates, linear_index, StridedColumns,
    StridedPositions, StridedRange,
};
pub use neighbourhood::SpatialNeighbourhood;
pub use shift::{clip_shift, shift_coordinate, shift_coordinates};
