//! Per-pass metrics.

/// Timing and coverage of one engine pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PassMetrics {
    /// Name of the transition.
    pub name: String,
    /// Workers that took part, the calling thread included.
    pub workers: usize,
    /// Transition calls made.
    pub items_visited: u64,
    /// Wall-clock time of the pass, in microseconds.
    pub elapsed_us: u64,
}
