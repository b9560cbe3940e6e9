//! Connectivity of packed tissue: where each synapse takes its signal from.
//!
//! - [`fill_territories`] gives every territory slot an initial source in
//!   its own column, kind by kind, as counted by a [`FillMatrix`].
//! - [`spread_synapses_into_neighbourhoods`] rotates chosen slots along
//!   column cycles so that their sources come from a neighbourhood of
//!   offsets counted by a [`DistributionMatrix`].
//! - [`check_consistency_of_matrix_and_tissue`] verifies, per column, that
//!   the tissue still holds as many source-kind synapses as the matrix
//!   moves.
//!
//! All passes run on the fork/join driver of `tissue-engine`. A pass that
//! fails part-way poisons the store.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod consistency;
pub mod error;
pub mod fill;
pub mod matrix;
mod pass;
pub mod shift_fn;
pub mod spread;

pub use consistency::{
    check_consistency_of_matrix_and_tissue, count_from_kind, count_synapses_by_source_offset,
};
pub use error::ConnectError;
pub use fill::fill_territories;
pub use matrix::{DistributionMatrix, FillMatrix};
pub use shift_fn::{ColumnShift, ColumnShiftTable, IdentityShift};
pub use spread::{
    ordinals_of_source_kind, spread_synapses_into_local_neighbourhoods,
    spread_synapses_into_neighbourhoods, Ordinal,
};
