//! Territorial state of synapses and territory list delimiters.
//!
//! Every synapse slot in a cell's territory records where the synapse is
//! heading: it either delivers its signal to the cell owning the territory
//! or migrates towards a neighbouring territory along one axis. A territory
//! is kept as one list per state; [`NUM_DELIMITERS`] fields per cell mark
//! where one list ends and the next begins.

/// Where a synapse in a territory is heading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TerritorialState {
    /// The synapse delivers its signal to the cell of the territory.
    SignalDeliveryToCellOfTerritory = 0,
    /// Migrating towards the territory at `x + 1`.
    MigrationAlongPositiveXAxis = 1,
    /// Migrating towards the territory at `x - 1`.
    MigrationAlongNegativeXAxis = 2,
    /// Migrating towards the territory at `y + 1`.
    MigrationAlongPositiveYAxis = 3,
    /// Migrating towards the territory at `y - 1`.
    MigrationAlongNegativeYAxis = 4,
    /// Migrating towards the territory at `c + 1`.
    MigrationAlongPositiveColumnarAxis = 5,
    /// Migrating towards the territory at `c - 1`.
    MigrationAlongNegativeColumnarAxis = 6,
}

/// Number of distinct territorial states.
pub const NUM_TERRITORIAL_STATES: u32 = 7;

/// Delimiters per cell: one between each pair of consecutive state lists.
pub const NUM_DELIMITERS: u32 = NUM_TERRITORIAL_STATES - 1;

impl TerritorialState {
    /// Bits needed to store one territorial state.
    pub const NUM_BITS: u32 = 3;

    /// All states in list order.
    pub const ALL: [Self; NUM_TERRITORIAL_STATES as usize] = [
        Self::SignalDeliveryToCellOfTerritory,
        Self::MigrationAlongPositiveXAxis,
        Self::MigrationAlongNegativeXAxis,
        Self::MigrationAlongPositiveYAxis,
        Self::MigrationAlongNegativeYAxis,
        Self::MigrationAlongPositiveColumnarAxis,
        Self::MigrationAlongNegativeColumnarAxis,
    ];

    /// Encoded value stored in a territorial-state span.
    pub fn to_bits(self) -> u64 {
        self as u64
    }

    /// Decode a stored value; `None` for the unused code 7.
    pub fn from_bits(value: u64) -> Option<Self> {
        Self::ALL.get(usize::try_from(value).ok()?).copied()
    }

    /// Whether the synapse is leaving its current territory.
    pub fn is_migrating(self) -> bool {
        self != Self::SignalDeliveryToCellOfTerritory
    }
}
