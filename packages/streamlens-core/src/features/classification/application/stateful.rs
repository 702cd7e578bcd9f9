/*
 * Stateful-Intermediate-Operation Detector
 *
 * An instance qualifies when it is provably derived from an intermediate
 * operation call: every receiver the oracle attributes to its producing
 * call, together with any predecessor recovered by widening, is a
 * pipeline-typed object. Qualified instances have their call strings scanned
 * against the stateful-operation catalog; the first hit sets the flag.
 * Verdicts are memoized per instance.
 */

use dashmap::DashMap;
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::features::catalog::domain::OperationCatalog;
use crate::features::chain::domain::PredecessorGraph;
use crate::features::oracle::ports::{AnalysisOracle, ValueRef};
use crate::shared::models::InstanceId;

pub struct StatefulOpDetector<'a> {
    oracle: &'a dyn AnalysisOracle,
    catalog: &'a OperationCatalog,
    graph: &'a PredecessorGraph,
    memo: DashMap<InstanceId, bool>,
}

impl<'a> StatefulOpDetector<'a> {
    pub fn new(
        oracle: &'a dyn AnalysisOracle,
        catalog: &'a OperationCatalog,
        graph: &'a PredecessorGraph,
    ) -> Self {
        Self {
            oracle,
            catalog,
            graph,
            memo: DashMap::new(),
        }
    }

    /// Instances whose chain contains a stateful intermediate operation
    ///
    /// Returns the directly flagged instances; the caller closes the result
    /// upstream.
    pub fn detect(&self, tracked: &[InstanceId]) -> FxHashSet<InstanceId> {
        let flagged: FxHashSet<InstanceId> = tracked
            .iter()
            .copied()
            .filter(|&instance| self.has_stateful_op(instance))
            .collect();
        debug!(flagged = flagged.len(), "stateful-operation scan complete");
        flagged
    }

    /// Memoized per-instance verdict
    pub fn has_stateful_op(&self, instance: InstanceId) -> bool {
        if let Some(hit) = self.memo.get(&instance) {
            return *hit;
        }
        let verdict =
            self.derived_from_intermediate(instance) && self.chain_contains_stateful(instance);
        self.memo.insert(instance, verdict);
        verdict
    }

    /// Whether every producer of the instance is a pipeline-typed object
    fn derived_from_intermediate(&self, instance: InstanceId) -> bool {
        let Some(facts) = self.oracle.instance(instance) else {
            return false;
        };
        let Some(point) = facts.call_string.producing_call() else {
            return false;
        };

        let mut producers = self
            .oracle
            .points_to(ValueRef::Receiver(point.site), point.context);
        // Widened predecessors count as producers too
        producers.extend(self.graph.immediate_predecessors(instance));

        !producers.is_empty()
            && producers.iter().all(|id| {
                self.oracle
                    .instance(*id)
                    .is_some_and(|f| self.catalog.is_pipeline_type(&f.concrete_type))
            })
    }

    fn chain_contains_stateful(&self, instance: InstanceId) -> bool {
        let Some(facts) = self.oracle.instance(instance) else {
            return false;
        };
        for point in facts.call_string.iter() {
            let Some(site) = self.oracle.call_site(point.site) else {
                continue;
            };
            if self.catalog.is_stateful(&site.method) {
                debug!(instance = %instance, method = %site.method, "stateful operation in chain");
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::catalog::infrastructure::BuiltInCatalog;
    use crate::features::oracle::infrastructure::TableOracle;
    use crate::features::oracle::ports::InstanceFacts;
    use crate::shared::models::{
        CallSite, CallSiteId, CallString, ContextId, CreationExpr, CreationSite, ProcedureId,
        ProgramPoint,
    };

    const MAIN: ProcedureId = ProcedureId(0);

    /// list.stream().distinct(): instance 1 is the root, instance 2 the
    /// distinct stage chained off it.
    fn chained_oracle(intermediate_method: &str) -> TableOracle {
        let mut oracle = TableOracle::new();
        oracle.add_call_site(
            CallSite::new(CallSiteId(1), MAIN, "stream").with_receiver_type("ArrayList"),
        );
        oracle.add_call_site(
            CallSite::new(CallSiteId(2), MAIN, intermediate_method).with_receiver_type("Stream"),
        );

        oracle.add_instance(InstanceFacts {
            id: InstanceId(1),
            creation: CreationSite::new(
                CallSiteId(1),
                MAIN,
                "Stream",
                CreationExpr::on_receiver("ArrayList", "stream"),
            ),
            call_string: CallString::from_points(vec![ProgramPoint::root(CallSiteId(1))]),
            concrete_type: "Stream".to_string(),
        });
        oracle.add_instance(InstanceFacts {
            id: InstanceId(2),
            creation: CreationSite::new(
                CallSiteId(2),
                MAIN,
                "Stream",
                CreationExpr::on_receiver("Stream", intermediate_method),
            ),
            call_string: CallString::from_points(vec![
                ProgramPoint::root(CallSiteId(1)),
                ProgramPoint::root(CallSiteId(2)),
            ]),
            concrete_type: "Stream".to_string(),
        });
        oracle.add_points_to(
            ValueRef::Receiver(CallSiteId(2)),
            ContextId::ROOT,
            [InstanceId(1)],
        );
        oracle
    }

    fn chained_graph() -> PredecessorGraph {
        let mut graph = PredecessorGraph::new();
        graph.add_predecessor(InstanceId(2), InstanceId(1));
        graph.compute_closures();
        graph
    }

    #[test]
    fn test_distinct_stage_is_flagged() {
        let oracle = chained_oracle("distinct");
        let graph = chained_graph();
        let detector = StatefulOpDetector::new(&oracle, BuiltInCatalog::get(), &graph);

        let flagged = detector.detect(&[InstanceId(1), InstanceId(2)]);

        assert!(flagged.contains(&InstanceId(2)));
        // The root is not derived from an intermediate call
        assert!(!flagged.contains(&InstanceId(1)));
    }

    #[test]
    fn test_stateless_chain_is_clean() {
        let oracle = chained_oracle("filter");
        let graph = chained_graph();
        let detector = StatefulOpDetector::new(&oracle, BuiltInCatalog::get(), &graph);

        assert!(detector.detect(&[InstanceId(1), InstanceId(2)]).is_empty());
    }

    #[test]
    fn test_sorted_counts_as_stateful() {
        let oracle = chained_oracle("sorted");
        let graph = chained_graph();
        let detector = StatefulOpDetector::new(&oracle, BuiltInCatalog::get(), &graph);

        assert!(detector.has_stateful_op(InstanceId(2)));
        // Memoized verdict is stable
        assert!(detector.has_stateful_op(InstanceId(2)));
    }

    #[test]
    fn test_root_with_stateful_creation_receiver_not_derived() {
        // A lone root: its producing call's receiver is the collection, not a
        // pipeline, so the scan never applies.
        let mut oracle = chained_oracle("distinct");
        // Receiver of the creation call resolves to an untracked object
        oracle.add_points_to(
            ValueRef::Receiver(CallSiteId(1)),
            ContextId::ROOT,
            [InstanceId(90)],
        );
        let graph = chained_graph();
        let detector = StatefulOpDetector::new(&oracle, BuiltInCatalog::get(), &graph);

        assert!(!detector.has_stateful_op(InstanceId(1)));
    }

    #[test]
    fn test_widened_predecessor_qualifies_instance() {
        // No receiver points-to for the producing call; the graph carries a
        // widened edge instead.
        let mut oracle = TableOracle::new();
        oracle.add_call_site(
            CallSite::new(CallSiteId(2), MAIN, "limit").with_receiver_type("Stream"),
        );
        oracle.add_instance(InstanceFacts {
            id: InstanceId(2),
            creation: CreationSite::new(
                CallSiteId(2),
                MAIN,
                "Stream",
                CreationExpr::on_receiver("Stream", "limit"),
            ),
            call_string: CallString::from_points(vec![ProgramPoint::root(CallSiteId(2))]),
            concrete_type: "Stream".to_string(),
        });
        oracle.add_instance(InstanceFacts {
            id: InstanceId(1),
            creation: CreationSite::new(
                CallSiteId(1),
                MAIN,
                "Stream",
                CreationExpr::on_receiver("ArrayList", "stream"),
            ),
            call_string: CallString::from_points(vec![ProgramPoint::root(CallSiteId(1))]),
            concrete_type: "Stream".to_string(),
        });

        let graph = chained_graph();
        let detector = StatefulOpDetector::new(&oracle, BuiltInCatalog::get(), &graph);

        assert!(detector.has_stateful_op(InstanceId(2)));
    }
}
