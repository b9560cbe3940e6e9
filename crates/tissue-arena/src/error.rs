//! Arena-specific error types.

use std::error::Error;
use std::fmt;

use tissue_core::ShapeError;

/// Errors raised while laying out or allocating a tissue state store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The shape failed validation.
    Shape(ShapeError),
    /// An element count or bit count overflowed `u64`.
    BitCountOverflow {
        /// What was being sized.
        what: &'static str,
    },
    /// A slice needs more words than the host can address.
    AllocationTooLarge {
        /// Width of the elements held by the slice.
        element_bits: u32,
        /// Bits requested for the slice.
        num_bits: u64,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shape(e) => write!(f, "invalid shape: {e}"),
            Self::BitCountOverflow { what } => {
                write!(f, "bit count overflow while sizing {what}")
            }
            Self::AllocationTooLarge {
                element_bits,
                num_bits,
            } => write!(
                f,
                "slice of {element_bits}-bit elements needs {num_bits} bits, more than the host can address"
            ),
        }
    }
}

impl Error for ArenaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Shape(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ShapeError> for ArenaError {
    fn from(e: ShapeError) -> Self {
        Self::Shape(e)
    }
}
