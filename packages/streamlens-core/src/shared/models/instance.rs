//! Pipeline Instances
//!
//! Abstract identities for dynamically created pipeline objects. Concrete heap
//! objects are abstracted to allocation sites; each tracked instance carries
//! the call string that produced it, its concrete type, and the declaration-
//! derived attribute defaults computed once from the creation expression.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::attributes::{ElementOrdering, ExecutionMode};
use super::call_graph::{CallSiteId, CallString, ProcedureId};

/// Unique identifier for a tracked pipeline instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub u32);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "inst:{}", self.0)
    }
}

/// The originating call expression of a candidate pipeline
///
/// `receiver_type` is the declared type of the source the pipeline was created
/// from (e.g. a collection type); `method` is the creation call itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreationExpr {
    /// Declared type of the creation receiver, if any
    pub receiver_type: Option<String>,

    /// Creation method name (e.g., "stream", "parallelStream", "of")
    pub method: String,
}

impl CreationExpr {
    /// Creation expression with a receiver (collection-view creation)
    pub fn on_receiver(receiver_type: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            receiver_type: Some(receiver_type.into()),
            method: method.into(),
        }
    }

    /// Receiver-less creation expression (static factory)
    pub fn factory(method: impl Into<String>) -> Self {
        Self {
            receiver_type: None,
            method: method.into(),
        }
    }
}

impl fmt::Display for CreationExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.receiver_type {
            Some(recv) => write!(f, "{}.{}()", recv, self.method),
            None => write!(f, "{}()", self.method),
        }
    }
}

/// A candidate pipeline creation site, as reported by external discovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreationSite {
    /// The creation call site
    pub site: CallSiteId,

    /// Enclosing procedure
    pub procedure: ProcedureId,

    /// Declared pipeline type at the creation expression
    pub declared_type: String,

    /// The originating call expression
    pub expression: CreationExpr,

    /// Possible runtime types of the creation receiver, when discovery can
    /// narrow a polymorphic receiver to more than one candidate
    pub possible_source_types: Vec<String>,
}

impl CreationSite {
    /// Create a creation-site record
    pub fn new(
        site: CallSiteId,
        procedure: ProcedureId,
        declared_type: impl Into<String>,
        expression: CreationExpr,
    ) -> Self {
        Self {
            site,
            procedure,
            declared_type: declared_type.into(),
            expression,
            possible_source_types: Vec::new(),
        }
    }

    /// Add a possible runtime source type
    pub fn with_source_type(mut self, ty: impl Into<String>) -> Self {
        self.possible_source_types.push(ty.into());
        self
    }

    /// Candidate source types: the narrowed set when present, otherwise the
    /// declared receiver type of the creation expression
    pub fn source_types(&self) -> Vec<&str> {
        if !self.possible_source_types.is_empty() {
            self.possible_source_types.iter().map(|s| s.as_str()).collect()
        } else {
            self.expression
                .receiver_type
                .iter()
                .map(|s| s.as_str())
                .collect()
        }
    }
}

/// A tracked pipeline instance
///
/// Immutable once built. Defaults are computed from the syntactic form of the
/// creation expression alone and are used whenever the merged dynamic result
/// set at a consuming point is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamInstance {
    /// Instance identity (allocation-site abstraction)
    pub id: InstanceId,

    /// The creation site this instance was discovered from
    pub creation: CreationSite,

    /// Call string from the analysis entry point down to the allocation
    pub call_string: CallString,

    /// Concrete type the oracle attributes to the allocation
    pub concrete_type: String,

    /// Declaration-derived execution-mode default
    pub default_execution: ExecutionMode,

    /// Declaration-derived ordering default
    pub default_ordering: ElementOrdering,
}

impl StreamInstance {
    /// The producing call, the operation whose result is this instance
    #[inline]
    pub fn producing_call(&self) -> Option<crate::shared::models::ProgramPoint> {
        self.call_string.producing_call()
    }
}

impl fmt::Display for StreamInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} via {})", self.id, self.concrete_type, self.creation.expression)
    }
}
