/*
 * Side-Effect Detector
 *
 * Decides, per terminal invocation, whether the behavioral parameters of the
 * consuming call or of any intermediate call on its upstream chains may write
 * observable state. Behavioral entry procedures come from the oracle; the
 * detector walks the procedures reachable from them, unions their
 * modification sets, and discards writes owned by pipeline-framework types.
 * Any surviving write marks the whole receiver set of the terminal call.
 */

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::features::catalog::domain::OperationCatalog;
use crate::features::chain::domain::PredecessorGraph;
use crate::features::oracle::ports::AnalysisOracle;
use crate::features::reachability::domain::TerminalInvocation;
use crate::shared::models::{ContextId, InstanceId, Location, ProcedureId, ProgramPoint};

pub struct SideEffectDetector<'a> {
    oracle: &'a dyn AnalysisOracle,
    catalog: &'a OperationCatalog,
    graph: &'a PredecessorGraph,
}

impl<'a> SideEffectDetector<'a> {
    pub fn new(
        oracle: &'a dyn AnalysisOracle,
        catalog: &'a OperationCatalog,
        graph: &'a PredecessorGraph,
    ) -> Self {
        Self {
            oracle,
            catalog,
            graph,
        }
    }

    /// Instances whose consuming call may run observably effectful code
    ///
    /// Returns the directly marked receiver sets; the caller closes the
    /// result upstream.
    pub fn detect(&self, invocations: &[TerminalInvocation]) -> FxHashSet<InstanceId> {
        let mut flagged = FxHashSet::default();
        for invocation in invocations {
            if self.invocation_has_effects(invocation) {
                flagged.extend(invocation.receivers.iter().copied());
            }
        }
        debug!(flagged = flagged.len(), "side-effect detection complete");
        flagged
    }

    fn invocation_has_effects(&self, invocation: &TerminalInvocation) -> bool {
        self.behavioral_points(invocation)
            .into_iter()
            .any(|point| self.point_has_effects(point))
    }

    /// The terminal call itself plus every call on the chains flowing into it
    ///
    /// Call strings carry the chained intermediate calls, so scanning the
    /// receiver set and its ancestors covers behavioral arguments passed
    /// anywhere along the pipeline.
    fn behavioral_points(&self, invocation: &TerminalInvocation) -> Vec<ProgramPoint> {
        let mut points = vec![invocation.point];
        let mut seen: FxHashSet<ProgramPoint> = points.iter().copied().collect();

        for &receiver in &invocation.receivers {
            let mut chain = self.graph.transitive_predecessors(receiver);
            chain.insert(receiver);
            for instance in chain {
                let Some(facts) = self.oracle.instance(instance) else {
                    continue;
                };
                for &point in facts.call_string.iter() {
                    if seen.insert(point) {
                        points.push(point);
                    }
                }
            }
        }
        points
    }

    fn point_has_effects(&self, point: ProgramPoint) -> bool {
        let Some(site) = self.oracle.call_site(point.site) else {
            return false;
        };
        for &arg in &site.behavioral_args {
            let entries = self.oracle.behavioral_targets(point.site, arg, point.context);
            if entries.is_empty() {
                continue;
            }
            for location in self.reachable_modifications(entries, point.context) {
                if !self.catalog.is_framework_internal(&location.owner_type) {
                    debug!(
                        site = %point,
                        location = %location,
                        "observable write reachable from behavioral argument"
                    );
                    return true;
                }
            }
        }
        false
    }

    /// Modification sets of every procedure reachable from the entry set,
    /// following dispatch targets in the same context
    fn reachable_modifications(
        &self,
        entries: FxHashSet<ProcedureId>,
        context: ContextId,
    ) -> Vec<Location> {
        let mut visited = FxHashSet::default();
        let mut frontier: Vec<ProcedureId> = entries.into_iter().collect();
        let mut locations = Vec::new();

        while let Some(procedure) = frontier.pop() {
            if !visited.insert(procedure) {
                continue;
            }
            locations.extend(self.oracle.modification_set(procedure).iter().cloned());
            for &site in self.oracle.call_sites_of(procedure) {
                frontier.extend(self.oracle.possible_targets(site, context));
            }
        }
        locations
    }
}
