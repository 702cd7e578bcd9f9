/*
 * Analysis Diagnostics
 *
 * Per-instance findings that make a pipeline ineligible for refactoring.
 * Diagnostics are caught at the instance boundary and recorded; they never
 * abort the batch. Fatal conditions live in `crate::errors` instead.
 */

use serde::{Deserialize, Serialize};

use super::call_graph::ProgramPoint;
use super::instance::InstanceId;

/// Failure kind attached to a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// Two possible upstream types/paths disagree where a single value was
    /// required (e.g., conflicting declaration defaults across source types)
    InconsistentAttribute,

    /// The candidate source type is declared non-iterable
    NonIterableSource,

    /// The candidate source type is declared non-instantiable
    NonInstantiableSource,

    /// No ordering characteristic is known for the candidate source type
    CannotExtractIterationProtocol,

    /// The instance is never provably consumed by a terminal operation
    MissingTerminalOperation,

    /// A scalar terminal operation is covered by neither reduce-order table
    UnknownReduceOrderSemantics,

    /// The instance's call chain resolves entirely to framework-internal code
    NoApplicationCodeInCallString,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::InconsistentAttribute => write!(f, "Inconsistent Attribute"),
            FailureKind::NonIterableSource => write!(f, "Non-Iterable Source"),
            FailureKind::NonInstantiableSource => write!(f, "Non-Instantiable Source"),
            FailureKind::CannotExtractIterationProtocol => {
                write!(f, "Cannot Extract Iteration Protocol")
            }
            FailureKind::MissingTerminalOperation => write!(f, "Missing Terminal Operation"),
            FailureKind::UnknownReduceOrderSemantics => {
                write!(f, "Unknown Reduce-Order Semantics")
            }
            FailureKind::NoApplicationCodeInCallString => {
                write!(f, "No Application Code In Call String")
            }
        }
    }
}

/// A per-instance analysis finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Failure kind
    pub kind: FailureKind,

    /// Instance the finding applies to
    pub instance: InstanceId,

    /// Originating call site, when one exists
    pub call_site: Option<ProgramPoint>,

    /// Human-readable message
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic without an originating call site
    pub fn new(kind: FailureKind, instance: InstanceId, message: impl Into<String>) -> Self {
        Self {
            kind,
            instance,
            call_site: None,
            message: message.into(),
        }
    }

    /// Attach the originating call site
    pub fn at(mut self, point: ProgramPoint) -> Self {
        self.call_site = Some(point);
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.call_site {
            Some(point) => write!(
                f,
                "{} on {} at {}: {}",
                self.kind, self.instance, point, self.message
            ),
            None => write!(f, "{} on {}: {}", self.kind, self.instance, self.message),
        }
    }
}
