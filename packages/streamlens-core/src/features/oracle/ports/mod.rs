/*
 * Analysis Oracle Port
 *
 * Boundary to the external call-graph/points-to engine. The engine consumes
 * the oracle read-only: instance identities, call strings, points-to sets,
 * dispatch targets, procedure-predecessor edges, and modification sets.
 * Building any of these is outside this crate.
 */

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::shared::models::{
    CallSite, CallSiteId, CallString, ContextId, CreationSite, InstanceId, Location, ProcedureId,
    ProcedureInfo,
};

/// Reference to a value at a call site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueRef {
    /// The receiver the call is invoked on
    Receiver(CallSiteId),

    /// The value the call returns
    Result(CallSiteId),

    /// A positional argument of the call
    Argument(CallSiteId, usize),
}

impl std::fmt::Display for ValueRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueRef::Receiver(site) => write!(f, "receiver@site:{}", site.0),
            ValueRef::Result(site) => write!(f, "result@site:{}", site.0),
            ValueRef::Argument(site, index) => write!(f, "arg{}@site:{}", index, site.0),
        }
    }
}

/// Oracle-supplied facts for one abstract pipeline object
///
/// The call string runs from the analysis entry point down through the
/// receiver chain to the producing call (its last element).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceFacts {
    pub id: InstanceId,

    /// Creation-site record for the producing call expression
    pub creation: CreationSite,

    pub call_string: CallString,

    /// Concrete type the oracle resolved for the object
    pub concrete_type: String,
}

/// Read-only view of the external call-graph/points-to analysis
pub trait AnalysisOracle: Send + Sync {
    /// Abstract objects a value may refer to in a calling context
    fn points_to(&self, value: ValueRef, context: ContextId) -> FxHashSet<InstanceId>;

    /// Call sites contained in a procedure body, in program order
    fn call_sites_of(&self, procedure: ProcedureId) -> &[CallSiteId];

    /// Call-site record
    fn call_site(&self, site: CallSiteId) -> Option<&CallSite>;

    /// Procedures a call may dispatch to
    fn possible_targets(&self, site: CallSiteId, context: ContextId) -> FxHashSet<ProcedureId>;

    /// Entry procedures of the behavioral argument at position `arg`
    ///
    /// This is `possible_targets` specialized to the closure value passed at
    /// the argument, rather than the called method itself.
    fn behavioral_targets(
        &self,
        site: CallSiteId,
        arg: usize,
        context: ContextId,
    ) -> FxHashSet<ProcedureId>;

    /// Procedures containing at least one call into `procedure`
    fn predecessors(&self, procedure: ProcedureId) -> FxHashSet<ProcedureId>;

    /// Heap locations the procedure itself may write
    fn modification_set(&self, procedure: ProcedureId) -> &[Location];

    /// All known procedures
    fn procedures(&self) -> Vec<ProcedureId>;

    /// Procedure record
    fn procedure(&self, id: ProcedureId) -> Option<&ProcedureInfo>;

    /// Facts for one tracked instance
    fn instance(&self, id: InstanceId) -> Option<&InstanceFacts>;

    /// All tracked instances, sorted
    fn instances(&self) -> Vec<InstanceId>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_ref_display() {
        assert_eq!(ValueRef::Receiver(CallSiteId(3)).to_string(), "receiver@site:3");
        assert_eq!(ValueRef::Result(CallSiteId(3)).to_string(), "result@site:3");
        assert_eq!(
            ValueRef::Argument(CallSiteId(3), 1).to_string(),
            "arg1@site:3"
        );
    }
}
