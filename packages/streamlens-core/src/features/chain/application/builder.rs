/*
 * Predecessor Graph Builder
 *
 * Derives the produced-from relation from oracle facts. For each tracked
 * instance, the immediate predecessors are the possible receiver objects of
 * its producing call, in that call's context.
 *
 * The oracle under-approximates chains threaded through helper returns: the
 * producing call's receiver points-to set comes back empty although real
 * pipeline stages exist one call removed. The widening step recovers them by
 * walking procedure-predecessor edges and admitting pipeline-typed instances
 * flowing out of pipeline-returning call sites in the calling procedures.
 * Skipping it silently drops stages from the merge; applying it always can
 * over-approximate under heavy aliasing. `WideningPolicy` makes the choice
 * explicit.
 */

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{Result, StreamlensError};
use crate::features::catalog::domain::OperationCatalog;
use crate::features::chain::domain::PredecessorGraph;
use crate::features::oracle::ports::{AnalysisOracle, ValueRef};
use crate::shared::models::{CallSite, InstanceId, ProgramPoint};

/// When to run the widening step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WideningPolicy {
    /// Never widen; use receiver points-to only
    Off,

    /// Widen only when the receiver points-to set came back empty
    #[default]
    OnEmptyReceiver,

    /// Widen at every pipeline-returning producing call
    Always,
}

/// Builds the predecessor graph for a tracked-instance set
pub struct PredecessorGraphBuilder<'a> {
    oracle: &'a dyn AnalysisOracle,
    catalog: &'a OperationCatalog,
    policy: WideningPolicy,
}

impl<'a> PredecessorGraphBuilder<'a> {
    pub fn new(oracle: &'a dyn AnalysisOracle, catalog: &'a OperationCatalog) -> Self {
        Self {
            oracle,
            catalog,
            policy: WideningPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: WideningPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build, validate, and close the graph
    ///
    /// # Errors
    /// - `Oracle` when a tracked instance or its producing site is unknown
    /// - `MalformedChain` when the derived relation has a cycle
    pub fn build(&self, tracked: &[InstanceId]) -> Result<PredecessorGraph> {
        let mut graph = PredecessorGraph::new();

        for &instance in tracked {
            graph.add_instance(instance);
            self.link_predecessors(&mut graph, instance)?;
        }

        graph.validate_acyclic()?;
        graph.compute_closures();

        info!(
            instances = graph.node_count(),
            edges = graph.edge_count(),
            policy = ?self.policy,
            "predecessor graph built"
        );
        Ok(graph)
    }

    fn link_predecessors(&self, graph: &mut PredecessorGraph, instance: InstanceId) -> Result<()> {
        let facts = self
            .oracle
            .instance(instance)
            .ok_or_else(|| StreamlensError::oracle(format!("no facts for {}", instance)))?;

        // No producing call: created outside the analyzed program, a root.
        let Some(point) = facts.call_string.producing_call() else {
            return Ok(());
        };

        let site = self.oracle.call_site(point.site).ok_or_else(|| {
            StreamlensError::oracle(format!(
                "call string of {} names unknown {}",
                instance, point
            ))
        })?;

        let receivers = self
            .oracle
            .points_to(ValueRef::Receiver(point.site), point.context);

        let mut linked = 0usize;
        for receiver in &receivers {
            if *receiver != instance && self.oracle.instance(*receiver).is_some() {
                graph.add_predecessor(instance, *receiver);
                linked += 1;
            }
        }

        let widen = match self.policy {
            WideningPolicy::Off => false,
            WideningPolicy::OnEmptyReceiver => linked == 0,
            WideningPolicy::Always => true,
        };
        if widen && self.returns_pipeline(site) {
            linked += self.widen(graph, instance, site, point);
        }

        debug!(instance = %instance, predecessors = linked, "predecessors linked");
        Ok(())
    }

    /// Recover pipeline stages one call removed from the producing call
    fn widen(
        &self,
        graph: &mut PredecessorGraph,
        instance: InstanceId,
        site: &CallSite,
        point: ProgramPoint,
    ) -> usize {
        let mut recovered = 0usize;

        for caller in self.oracle.predecessors(site.procedure) {
            for &caller_site in self.oracle.call_sites_of(caller) {
                let Some(candidate_site) = self.oracle.call_site(caller_site) else {
                    continue;
                };
                if !self.returns_pipeline(candidate_site) {
                    continue;
                }

                for flowing in self
                    .oracle
                    .points_to(ValueRef::Result(caller_site), point.context)
                {
                    if flowing == instance {
                        continue;
                    }
                    let Some(candidate) = self.oracle.instance(flowing) else {
                        continue;
                    };
                    if self.catalog.is_pipeline_type(&candidate.concrete_type) {
                        debug!(
                            instance = %instance,
                            predecessor = %flowing,
                            "widening recovered predecessor"
                        );
                        graph.add_predecessor(instance, flowing);
                        recovered += 1;
                    }
                }
            }
        }
        recovered
    }

    fn returns_pipeline(&self, site: &CallSite) -> bool {
        site.return_type
            .as_deref()
            .is_some_and(|ty| self.catalog.is_pipeline_type(ty))
    }
}
