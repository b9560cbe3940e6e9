//! Packed bit-level storage of tissue state.
//!
//! A tissue's state consists of cells, synapse territories, signalling
//! states, delimiters, sensory cells and synapses to muscles, each with its
//! own declared bit width. This crate packs all of them into a handful of
//! [`HomogenousSlice`]s, one per distinct width, and resolves any element
//! to a bit span in O(1).
//!
//! # Architecture
//!
//! ```text
//! TissueState (store)
//! ├── Arc<TissueShape> (immutable configuration)
//! ├── LayoutPlan ((category, kind) → Placement)
//! │   └── IndexMap<width, element count> (slice order)
//! └── HomogenousSlice × distinct widths
//!     └── BitBuffer (AtomicU64 words, LSB-first)
//! ```
//!
//! Inside a placement, per-cell elements are ordered by the cell's local
//! columnar coordinate, then `y`, then `x`, then the sub-index (territory
//! slot or delimiter number).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod layout;
pub mod slice;
pub mod state;

pub use error::ArenaError;
pub use layout::{DataCategory, LayoutPlan, Placement};
pub use slice::HomogenousSlice;
pub use state::{ElementLocation, TissueState};
