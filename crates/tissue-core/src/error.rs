//! Shape-configuration error types.

use std::error::Error;
use std::fmt;

use crate::id::KindOfCell;

/// Errors detected while validating a [`TissueShape`](crate::TissueShape).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShapeError {
    /// An axis of the tissue has zero cells.
    EmptyAxis {
        /// Name of the axis.
        axis: &'static str,
    },
    /// No tissue cell kinds were declared.
    NoTissueKinds,
    /// More kinds were declared than a [`KindOfCell`] can address.
    TooManyKinds {
        /// Total number of declared kinds.
        count: usize,
    },
    /// A tissue kind has no cells per column, so it owns no columnar range.
    EmptyKind {
        /// The offending kind.
        kind: KindOfCell,
    },
    /// A tissue kind has a territory of zero synapses.
    ZeroTerritory {
        /// The offending kind.
        kind: KindOfCell,
    },
    /// A packed field was declared with zero bits.
    ZeroBitWidth {
        /// Which field.
        field: &'static str,
        /// The kind the width belongs to, if it is per-kind.
        kind: Option<KindOfCell>,
    },
    /// A size or coordinate range does not fit the coordinate encoding.
    CoordinateOverflow {
        /// What overflowed.
        reason: String,
    },
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyAxis { axis } => write!(f, "axis '{axis}' has zero cells"),
            Self::NoTissueKinds => write!(f, "at least one tissue cell kind is required"),
            Self::TooManyKinds { count } => {
                write!(f, "{count} cell kinds exceed the addressable maximum")
            }
            Self::EmptyKind { kind } => {
                write!(f, "tissue kind {kind} has no cells per column")
            }
            Self::ZeroTerritory { kind } => {
                write!(f, "tissue kind {kind} has an empty synapse territory")
            }
            Self::ZeroBitWidth { field, kind } => match kind {
                Some(kind) => write!(f, "field '{field}' of kind {kind} has zero bits"),
                None => write!(f, "field '{field}' has zero bits"),
            },
            Self::CoordinateOverflow { reason } => {
                write!(f, "coordinate overflow: {reason}")
            }
        }
    }
}

impl Error for ShapeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_kind() {
        let err = ShapeError::ZeroBitWidth {
            field: "synapse",
            kind: Some(KindOfCell(2)),
        };
        assert_eq!(err.to_string(), "field 'synapse' of kind 2 has zero bits");
        let err = ShapeError::ZeroBitWidth {
            field: "sensory cell",
            kind: None,
        };
        assert_eq!(err.to_string(), "field 'sensory cell' has zero bits");
    }
}
