//! Transitions of synapses to muscles.

use tissue_core::{Bits, BitsRef, KindOfCell};

/// A per-synapse update of the flat array of synapses to muscles.
///
/// `source` is the state of the cell the synapse reads from: a tissue cell,
/// or a sensory cell when the source columnar coordinate lies past the
/// tissue. `source_kind` names its kind.
pub trait MuscleTransition: Sync {
    /// Name used in logs and metrics.
    fn name(&self) -> &str;

    /// Update synapse `index`.
    fn transition(&self, own: Bits<'_>, index: u32, source: BitsRef<'_>, source_kind: KindOfCell);
}

/// A [`MuscleTransition`] built from a closure.
pub struct FnMuscleTransition<F> {
    name: String,
    f: F,
}

impl<F> FnMuscleTransition<F>
where
    F: Fn(Bits<'_>, u32, BitsRef<'_>, KindOfCell) + Sync,
{
    /// Wrap `f`.
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> MuscleTransition for FnMuscleTransition<F>
where
    F: Fn(Bits<'_>, u32, BitsRef<'_>, KindOfCell) + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn transition(&self, own: Bits<'_>, index: u32, source: BitsRef<'_>, source_kind: KindOfCell) {
        (self.f)(own, index, source, source_kind)
    }
}
