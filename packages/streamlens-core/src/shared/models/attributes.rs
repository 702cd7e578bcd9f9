//! Inferred pipeline attributes
//!
//! The externally exposed attribute vocabulary: execution mode and element
//! ordering, plus the kind tag distinguishing the two attribute automata.

use serde::{Deserialize, Serialize};

/// Execution mode of a pipeline
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ExecutionMode {
    /// Elements are processed on the calling thread
    Sequential,

    /// Elements may be processed by parallel workers
    Parallel,
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionMode::Sequential => write!(f, "SEQUENTIAL"),
            ExecutionMode::Parallel => write!(f, "PARALLEL"),
        }
    }
}

/// Element ordering of a pipeline
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum ElementOrdering {
    /// Encounter order is defined and preserved
    Ordered,

    /// No encounter order is guaranteed
    Unordered,
}

impl std::fmt::Display for ElementOrdering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementOrdering::Ordered => write!(f, "ORDERED"),
            ElementOrdering::Unordered => write!(f, "UNORDERED"),
        }
    }
}

/// Which attribute an automaton (and its fact table) tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeKind {
    /// Sequential vs. parallel execution
    Execution,

    /// Ordered vs. unordered elements
    Ordering,
}

impl std::fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeKind::Execution => write!(f, "execution-mode"),
            AttributeKind::Ordering => write!(f, "ordering"),
        }
    }
}
