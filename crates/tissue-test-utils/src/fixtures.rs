//! Reusable transition fixtures.
//!
//! - [`IncrementCell`]: self-only update of cell states.
//! - [`NeighbourSum`]: replaces a cell by the sum of its neighbourhood.
//! - [`SlotStamp`]: self-only update of every territory slot.
//! - [`CountingTransition`]: counts invocations, writes nothing.
//! - [`PanickingTransition`]: panics at one position.
//! - [`CopySourceToMuscle`]: copies a muscle synapse's source cell state.
//! - [`CopySourceToSynapse`]: copies a synapse's source cell state.
//! - [`DeliveringSynapseSum`]: sums the synapses of a territory that
//!   deliver to its cell.

use std::sync::atomic::{AtomicU64, Ordering};

use tissue_core::{Bits, BitsRef, KindOfCell, TerritorialState, TissueCoordinates};
use tissue_transition::{
    MuscleTransition, Neighbourhood, PositionMeta, TransitionFunction, TransitionTarget,
};

fn mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Adds one to every cell state, wrapping at the cell width.
pub struct IncrementCell;

impl TransitionFunction for IncrementCell {
    fn name(&self) -> &str {
        "increment_cell"
    }

    fn target(&self) -> TransitionTarget {
        TransitionTarget::Cell
    }

    fn transition(&self, own: Bits<'_>, _meta: &PositionMeta<'_>, _n: &Neighbourhood<'_>) {
        own.set_value(own.value().wrapping_add(1) & mask(own.num_bits()));
    }
}

/// Sets every cell to the wrapped sum of all cells in its neighbourhood,
/// itself included.
pub struct NeighbourSum;

impl TransitionFunction for NeighbourSum {
    fn name(&self) -> &str {
        "neighbour_sum"
    }

    fn target(&self) -> TransitionTarget {
        TransitionTarget::Cell
    }

    fn transition(&self, own: Bits<'_>, _meta: &PositionMeta<'_>, n: &Neighbourhood<'_>) {
        let sum = n
            .shifts()
            .filter_map(|s| n.get_shift(s))
            .fold(0u64, |acc, b| acc.wrapping_add(b.value()));
        own.set_value(sum & mask(own.num_bits()));
    }
}

/// XORs every synapse with its slot number plus one.
pub struct SlotStamp;

impl TransitionFunction for SlotStamp {
    fn name(&self) -> &str {
        "slot_stamp"
    }

    fn target(&self) -> TransitionTarget {
        TransitionTarget::Synapse
    }

    fn transition(&self, own: Bits<'_>, meta: &PositionMeta<'_>, _n: &Neighbourhood<'_>) {
        let stamp = meta.slot().map_or(0, |s| s as u64 + 1);
        own.set_value((own.value() ^ stamp) & mask(own.num_bits()));
    }
}

/// Counts invocations without writing anything.
pub struct CountingTransition {
    pub target: TransitionTarget,
    calls: AtomicU64,
}

impl CountingTransition {
    pub fn new(target: TransitionTarget) -> Self {
        Self {
            target,
            calls: AtomicU64::new(0),
        }
    }

    /// Invocations so far.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

impl TransitionFunction for CountingTransition {
    fn name(&self) -> &str {
        "counting"
    }

    fn target(&self) -> TransitionTarget {
        self.target
    }

    fn transition(&self, _own: Bits<'_>, _meta: &PositionMeta<'_>, _n: &Neighbourhood<'_>) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }
}

/// Panics when visiting `trigger`; increments every other cell.
pub struct PanickingTransition {
    pub trigger: TissueCoordinates,
}

impl TransitionFunction for PanickingTransition {
    fn name(&self) -> &str {
        "panicking"
    }

    fn target(&self) -> TransitionTarget {
        TransitionTarget::Cell
    }

    fn transition(&self, own: Bits<'_>, meta: &PositionMeta<'_>, n: &Neighbourhood<'_>) {
        if meta.coords() == self.trigger {
            panic!("deliberate failure at {}", self.trigger);
        }
        IncrementCell.transition(own, meta, n);
    }
}

/// Copies the low bits of the source cell into the muscle synapse.
pub struct CopySourceToMuscle;

impl MuscleTransition for CopySourceToMuscle {
    fn name(&self) -> &str {
        "copy_source_to_muscle"
    }

    fn transition(&self, own: Bits<'_>, _index: u32, source: BitsRef<'_>, _kind: KindOfCell) {
        let width = own.num_bits().min(source.num_bits());
        own.set_value(source.read(0, width));
    }
}

/// Copies the low bits of the source cell into the synapse, or clears the
/// synapse when its source coordinates address nothing.
pub struct CopySourceToSynapse;

impl TransitionFunction for CopySourceToSynapse {
    fn name(&self) -> &str {
        "copy_source_to_synapse"
    }

    fn target(&self) -> TransitionTarget {
        TransitionTarget::Synapse
    }

    fn transition(&self, own: Bits<'_>, _meta: &PositionMeta<'_>, n: &Neighbourhood<'_>) {
        match n.source_cell() {
            Some(source) => {
                let width = own.num_bits().min(source.num_bits());
                own.set_value(source.read(0, width));
            }
            None => own.clear(),
        }
    }
}

/// Sets every cell to the wrapped sum of the territory synapses whose
/// territorial state is signal delivery, plus the first delimiter.
pub struct DeliveringSynapseSum;

impl TransitionFunction for DeliveringSynapseSum {
    fn name(&self) -> &str {
        "delivering_synapse_sum"
    }

    fn target(&self) -> TransitionTarget {
        TransitionTarget::Cell
    }

    fn transition(&self, own: Bits<'_>, _meta: &PositionMeta<'_>, n: &Neighbourhood<'_>) {
        let sum = (0..n.territory_size())
            .filter(|&s| {
                n.territorial_state(s) == Some(TerritorialState::SignalDeliveryToCellOfTerritory)
            })
            .fold(n.delimiter(0).value(), |acc, s| {
                acc.wrapping_add(n.territory_synapse(s).value())
            });
        own.set_value(sum & mask(own.num_bits()));
    }
}
