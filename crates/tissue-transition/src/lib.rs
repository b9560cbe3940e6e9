//! Transition functions and the context they are invoked with.
//!
//! A [`TransitionFunction`] is called once per position of a pass. It gets
//! a writable span for the position's own data, the position's
//! [`PositionMeta`], and a [`Neighbourhood`] that resolves relative shifts
//! to read-only spans elsewhere in the store, as well as to the position's
//! own territory and, in synapse passes, the synapse's source cell.
//! [`MuscleTransition`] is the counterpart for the flat array of synapses
//! to muscles.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod meta;
pub mod muscle;
pub mod neighbourhood;
pub mod transition;

pub use meta::PositionMeta;
pub use muscle::{FnMuscleTransition, MuscleTransition};
pub use neighbourhood::Neighbourhood;
pub use transition::{FnTransition, NeighbourCategory, TransitionFunction, TransitionTarget};
