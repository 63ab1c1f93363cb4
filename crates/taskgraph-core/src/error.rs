use std::fmt;

/// Convenience alias used by every fallible graph operation.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Failures raised by graph construction, accessors, and path analysis.
///
/// All failures are synchronous and deterministic: repeating an identical
/// call fails identically.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Invalid construction input (e.g. a duration list of the wrong length).
    #[error("invalid graph construction: {reason}")]
    Construction { reason: String },

    /// A node index outside `[0, node_count)`.
    #[error("node index {index} out of range for graph with {node_count} nodes")]
    Index { index: usize, node_count: usize },

    /// A path query ran on a graph whose topological order reports a cycle.
    #[error("graph contains a cycle: only {processed} of {node_count} nodes could be ordered")]
    Cycle { processed: usize, node_count: usize },

    /// Accumulated path weight left the `i64` range.
    #[error("path weight overflow while relaxing edges out of node {node}")]
    Overflow { node: usize },
}

impl GraphError {
    /// Stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Construction { .. } => ErrorCode::InvalidConstruction,
            Self::Index { .. } => ErrorCode::IndexOutOfRange,
            Self::Cycle { .. } => ErrorCode::CycleDetected,
            Self::Overflow { .. } => ErrorCode::WeightOverflow,
        }
    }

    pub(crate) fn construction(reason: impl Into<String>) -> Self {
        Self::Construction {
            reason: reason.into(),
        }
    }
}

/// Stable codes grouped by stage: `E1xxx` construction and lookup, `E2xxx` path analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidConstruction,
    IndexOutOfRange,
    CycleDetected,
    WeightOverflow,
}

impl ErrorCode {
    /// The `E####` identifier printed by the CLI.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidConstruction => "E1001",
            Self::IndexOutOfRange => "E1002",
            Self::CycleDetected => "E2001",
            Self::WeightOverflow => "E2002",
        }
    }

    /// One-line summary, independent of the failing values.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidConstruction => "Invalid graph construction",
            Self::IndexOutOfRange => "Node index out of range",
            Self::CycleDetected => "Graph is not acyclic",
            Self::WeightOverflow => "Path weight overflow",
        }
    }

    /// What to change in the input, when there is a single obvious fix.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InvalidConstruction => {
                Some("Supply exactly one duration per node, or omit durations.")
            }
            Self::IndexOutOfRange => Some("Node ids must lie in [0, n)."),
            Self::CycleDetected => {
                Some("Run path analysis on the condensation graph instead of the raw graph.")
            }
            Self::WeightOverflow => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
