//! Connectivity error types.

use std::error::Error;
use std::fmt;

use tissue_core::KindOfCell;
use tissue_engine::EngineError;

/// Errors raised by territory filling, synapse spreading and their checks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectError {
    /// A matrix does not have the dimensions the operation requires.
    MatrixShape {
        /// Expected number of entries.
        expected: usize,
        /// Entries supplied.
        actual: usize,
    },
    /// A fill-matrix row does not add up to the kind's synapse count.
    RowSumMismatch {
        /// The target kind of the row.
        target: KindOfCell,
        /// Synapses in one column's territories of that kind.
        expected: u64,
        /// Sum of the row.
        actual: u64,
    },
    /// A fill-matrix entry asks for synapses from a kind with no cells.
    EmptySourceKind {
        /// The target kind.
        target: KindOfCell,
        /// The empty source kind.
        source: KindOfCell,
    },
    /// A neighbourhood diameter is even, zero, or not below the axis extent.
    InvalidDiameter {
        /// Name of the axis.
        axis: &'static str,
        /// The diameter.
        diameter: u32,
        /// Cells along the axis.
        extent: u32,
    },
    /// The kind must be a tissue kind.
    NotTissueKind {
        /// The offending kind.
        kind: KindOfCell,
    },
    /// The kind is neither a tissue nor a sensory kind.
    UnknownKind {
        /// The offending kind.
        kind: KindOfCell,
    },
    /// The matrix moves more synapses than a column holds from the source
    /// kind.
    NotEnoughSourceSynapses {
        /// Sum of the matrix.
        required: u64,
        /// Source-kind synapses found in column `(0, 0)`.
        available: u64,
    },
    /// A slot that sources from the source kind in column `(0, 0)` sources
    /// from another kind in some other column.
    SourceKindMismatch {
        /// Column of the offending slot.
        column: (u32, u32),
        /// Columnar coordinate of the territory's cell.
        cell: u32,
        /// Territory slot.
        slot: u32,
    },
    /// A slot on a cycle held neither the displaced value nor its own
    /// column.
    BrokenCycle {
        /// Column of the offending slot.
        column: (u32, u32),
        /// Column stored in the slot.
        found: (u32, u32),
    },
    /// A column shift function left the grid.
    ShiftOutOfRange {
        /// The column shifted.
        from: (u32, u32),
        /// The column it was mapped to.
        to: (u32, u32),
    },
    /// An explicit column shift table is not a permutation of the grid.
    InvalidShiftTable {
        /// What is wrong with it.
        reason: String,
    },
    /// The parallel pass failed.
    Engine(EngineError),
}

impl fmt::Display for ConnectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MatrixShape { expected, actual } => {
                write!(f, "matrix has {actual} entries, expected {expected}")
            }
            Self::RowSumMismatch {
                target,
                expected,
                actual,
            } => write!(
                f,
                "row of kind {target} sums to {actual}, territories of the kind hold {expected} synapses per column"
            ),
            Self::EmptySourceKind { target, source } => {
                write!(f, "kind {target} asks for synapses from kind {source}, which has no cells")
            }
            Self::InvalidDiameter {
                axis,
                diameter,
                extent,
            } => write!(
                f,
                "diameter {diameter} along {axis} must be odd, nonzero and below the extent {extent}"
            ),
            Self::NotTissueKind { kind } => write!(f, "kind {kind} is not a tissue kind"),
            Self::UnknownKind { kind } => write!(f, "kind {kind} does not exist"),
            Self::NotEnoughSourceSynapses {
                required,
                available,
            } => write!(
                f,
                "matrix moves {required} synapses but a column holds only {available} from the source kind"
            ),
            Self::SourceKindMismatch { column, cell, slot } => write!(
                f,
                "slot {slot} of cell {cell} in column {column:?} does not source from the source kind"
            ),
            Self::BrokenCycle { column, found } => write!(
                f,
                "slot in column {column:?} holds column {found:?}, which is not on the cycle"
            ),
            Self::ShiftOutOfRange { from, to } => {
                write!(f, "column shift maps {from:?} outside the grid to {to:?}")
            }
            Self::InvalidShiftTable { reason } => write!(f, "invalid column shift table: {reason}"),
            Self::Engine(e) => write!(f, "parallel pass failed: {e}"),
        }
    }
}

impl Error for ConnectError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Engine(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EngineError> for ConnectError {
    fn from(e: EngineError) -> Self {
        Self::Engine(e)
    }
}
