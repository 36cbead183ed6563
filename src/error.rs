//! Error types for model construction and the search procedures.

/// Rejections raised while assembling a [`crate::graph::FireGraph`] or a
/// [`crate::scenario::Scenario`] from raw input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// The same node key appeared twice in the node set.
    #[error("duplicate node {0}")]
    DuplicateNode(String),

    /// An arc references a node that is not part of the node set.
    #[error("arc endpoint {0} is not a known node")]
    UnknownNode(String),

    /// Two arcs share the same (tail, head) pair.
    #[error("duplicate arc {0}")]
    DuplicateArc(String),

    /// An arc carries a negative or non-finite base weight.
    #[error("arc {arc} has invalid weight {weight}")]
    InvalidWeight { arc: String, weight: f64 },

    /// The ignition set is empty.
    #[error("at least one ignition node is required")]
    NoIgnitions,

    /// The interdiction delay must be positive and finite.
    #[error("delay must be positive and finite, got {0}")]
    InvalidDelay(f64),

    /// The arrival-time target must be finite.
    #[error("arrival-time target must be finite, got {0}")]
    InvalidTarget(f64),

    /// The release schedule has no entries.
    #[error("release schedule is empty")]
    EmptySchedule,

    /// Two schedule entries share the same release time.
    #[error("duplicate release time {0}")]
    DuplicateReleaseTime(f64),

    /// A release time is non-finite.
    #[error("release time must be finite, got {0}")]
    InvalidReleaseTime(f64),
}

/// Recoverable conditions raised by the construction heuristic, the
/// perturbation operators, and the placement invariant checks.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    /// No node qualifies for a resource released at the given time: every
    /// resource-free node is already reached before the release.
    #[error("no eligible node for a resource released at t = {time}")]
    ConstructionExhausted { time: f64 },

    /// A removal operator ran against an empty placement.
    #[error("no resources placed, nothing to remove")]
    NoResourcesToRemove,

    /// Defensive invariant check: a node would hold two resources, or a
    /// release time would exceed its capacity. Unreachable through the
    /// public search operations.
    #[error("capacity exceeded: {0}")]
    CapacityExceeded(String),
}
