//! The [`TransitionFunction`] trait.

use tissue_core::Bits;

use crate::meta::PositionMeta;
use crate::neighbourhood::Neighbourhood;

/// Which element of a position a pass updates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionTarget {
    /// The cell state.
    Cell,
    /// The signalling state.
    Signalling,
    /// Every synapse slot of the cell's territory, one call per slot.
    Synapse,
}

/// Which element neighbourhood lookups resolve to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum NeighbourCategory {
    /// Cell states of neighbouring positions.
    #[default]
    Cell,
    /// Signalling states of neighbouring positions.
    Signalling,
}

/// A per-position update applied by the engine.
///
/// # Contract
///
/// - Communicate only by writing to `own`. Spans returned by the
///   neighbourhood are read-only.
/// - Must not panic. A panic fails the whole pass and poisons the store.
/// - With in-place reads a neighbour may or may not already hold this
///   pass's value. Results that must not depend on the worker count
///   should read a frozen view.
///
/// # Examples
///
/// ```
/// use tissue_core::Bits;
/// use tissue_transition::{Neighbourhood, PositionMeta, TransitionFunction, TransitionTarget};
///
/// struct Increment;
///
/// impl TransitionFunction for Increment {
///     fn name(&self) -> &str { "increment" }
///
///     fn target(&self) -> TransitionTarget { TransitionTarget::Cell }
///
///     fn transition(&self, own: Bits<'_>, _meta: &PositionMeta<'_>, _n: &Neighbourhood<'_>) {
///         let max = (1u64 << own.num_bits().min(63)) - 1;
///         own.set_value((own.value() + 1).min(max));
///     }
/// }
///
/// assert_eq!(Increment.name(), "increment");
/// ```
pub trait TransitionFunction: Sync {
    /// Name used in logs and metrics.
    fn name(&self) -> &str;

    /// Element updated at each position.
    fn target(&self) -> TransitionTarget;

    /// Element the neighbourhood resolves to.
    fn neighbour_category(&self) -> NeighbourCategory {
        NeighbourCategory::Cell
    }

    /// Update `own` at the position described by `meta`.
    fn transition(&self, own: Bits<'_>, meta: &PositionMeta<'_>, neighbours: &Neighbourhood<'_>);
}

/// A [`TransitionFunction`] built from a closure.
pub struct FnTransition<F> {
    name: String,
    target: TransitionTarget,
    neighbour_category: NeighbourCategory,
    f: F,
}

impl<F> FnTransition<F>
where
    F: Fn(Bits<'_>, &PositionMeta<'_>, &Neighbourhood<'_>) + Sync,
{
    /// Wrap `f` as a transition over `target` reading neighbouring cells.
    pub fn new(name: impl Into<String>, target: TransitionTarget, f: F) -> Self {
        Self {
            name: name.into(),
            target,
            neighbour_category: NeighbourCategory::Cell,
            f,
        }
    }

    /// Resolve neighbours to `category` instead.
    pub fn with_neighbour_category(mut self, category: NeighbourCategory) -> Self {
        self.neighbour_category = category;
        self
    }
}

impl<F> TransitionFunction for FnTransition<F>
where
    F: Fn(Bits<'_>, &PositionMeta<'_>, &Neighbourhood<'_>) + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn target(&self) -> TransitionTarget {
        self.target
    }

    fn neighbour_category(&self) -> NeighbourCategory {
        self.neighbour_category
    }

    fn transition(&self, own: Bits<'_>, meta: &PositionMeta<'_>, neighbours: &Neighbourhood<'_>) {
        (self.f)(own, meta, neighbours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_adapter_reports_configuration() {
        let t = FnTransition::new("noop", TransitionTarget::Synapse, |_own, _meta, _n| {})
            .with_neighbour_category(NeighbourCategory::Signalling);
        assert_eq!(t.name(), "noop");
        assert_eq!(t.target(), TransitionTarget::Synapse);
        assert_eq!(t.neighbour_category(), NeighbourCategory::Signalling);
    }
}
