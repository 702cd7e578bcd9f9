/*
 * Result Aggregator
 *
 * The last stage: converts merged automaton states into the exposed
 * attribute vocabulary, one entry per tracked instance. Consumed instances
 * union their merged state sets over every terminal point they are a
 * receiver at; an empty union substitutes the declaration-derived defaults
 * of the instance's origin set. Unconsumed instances are not aggregated and
 * carry their findings only.
 *
 * Per-instance aggregation is read-only over the merge caches and the flag
 * sets, so instances can be processed in parallel.
 */

use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeSet;
use tracing::debug;

use crate::features::aggregation::domain::{AnalysisReport, StreamAttributes};
use crate::features::automata::domain::{AttributeValue, AutomatonState};
use crate::features::chain::application::MergeEngine;
use crate::features::chain::domain::PredecessorGraph;
use crate::features::reachability::application::ConsumptionReport;
use crate::shared::models::{
    Diagnostic, ElementOrdering, ExecutionMode, InstanceId, ProgramPoint, StreamInstance,
};

/// Pass outputs consumed by the aggregator
///
/// The three flag sets must already be closed upstream; `findings` carries
/// every diagnostic the passes produced, in any order.
pub struct AggregationInput<'a> {
    pub consumption: &'a ConsumptionReport,
    pub side_effects: &'a FxHashSet<InstanceId>,
    pub stateful: &'a FxHashSet<InstanceId>,
    pub order_sensitive: &'a FxHashSet<InstanceId>,
    pub findings: &'a [Diagnostic],
}

pub struct ResultAggregator<'a> {
    instances: &'a FxHashMap<InstanceId, StreamInstance>,
    graph: &'a PredecessorGraph,
    execution_merge: &'a MergeEngine<'a>,
    ordering_merge: &'a MergeEngine<'a>,
    parallel: bool,
}

impl<'a> ResultAggregator<'a> {
    pub fn new(
        instances: &'a FxHashMap<InstanceId, StreamInstance>,
        graph: &'a PredecessorGraph,
        execution_merge: &'a MergeEngine<'a>,
        ordering_merge: &'a MergeEngine<'a>,
        parallel: bool,
    ) -> Self {
        Self {
            instances,
            graph,
            execution_merge,
            ordering_merge,
            parallel,
        }
    }

    /// Build the per-instance and per-site report
    pub fn aggregate(&self, input: &AggregationInput<'_>) -> AnalysisReport {
        let mut tracked: Vec<InstanceId> = self.instances.keys().copied().collect();
        tracked.sort_unstable();

        let entries: Vec<(InstanceId, StreamAttributes)> = if self.parallel {
            tracked
                .par_iter()
                .map(|&id| (id, self.aggregate_one(id, input)))
                .collect()
        } else {
            tracked
                .iter()
                .map(|&id| (id, self.aggregate_one(id, input)))
                .collect()
        };

        let mut report = AnalysisReport {
            instances: entries.into_iter().collect(),
            sites: Default::default(),
        };
        for (id, attrs) in &report.instances {
            if let Some(instance) = self.instances.get(id) {
                report
                    .sites
                    .entry(instance.creation.site)
                    .or_default()
                    .absorb(attrs);
            }
        }

        debug!(
            instances = report.len(),
            sites = report.sites.len(),
            "aggregation complete"
        );
        report
    }

    fn aggregate_one(&self, id: InstanceId, input: &AggregationInput<'_>) -> StreamAttributes {
        let diagnostics: Vec<Diagnostic> = input
            .findings
            .iter()
            .filter(|d| d.instance == id)
            .cloned()
            .collect();

        if !input.consumption.is_consumed(id) {
            return StreamAttributes {
                diagnostics,
                ..Default::default()
            };
        }

        let points = input.consumption.terminal_points(id);
        let mut modes = extract_modes(&self.merged_union(self.execution_merge, id, points));
        let mut orderings =
            extract_orderings(&self.merged_union(self.ordering_merge, id, points));

        if modes.is_empty() {
            modes = self.default_modes(id);
        }
        if orderings.is_empty() {
            orderings = self.default_orderings(id);
        }

        StreamAttributes {
            possible_execution_modes: modes,
            possible_orderings: orderings,
            has_possible_side_effects: input.side_effects.contains(&id),
            has_possible_stateful_intermediate_op: input.stateful.contains(&id),
            reduce_order_possibly_matters: input.order_sensitive.contains(&id),
            diagnostics,
        }
    }

    /// Union of merged states over the instance's terminal points
    ///
    /// Instances consumed only through a downstream derivation have no
    /// terminal points of their own; they use the point-independent merge.
    fn merged_union(
        &self,
        engine: &MergeEngine<'_>,
        id: InstanceId,
        points: &[ProgramPoint],
    ) -> BTreeSet<AutomatonState> {
        if points.is_empty() {
            return engine.merged(id);
        }
        let mut union = BTreeSet::new();
        for &point in points {
            union.extend(engine.merged_at(id, point));
        }
        union
    }

    /// Declaration defaults of the origin set
    ///
    /// An intermediate stage has no meaningful declaration of its own, so an
    /// empty merged set falls back to the roots its chain started from.
    fn default_modes(&self, id: InstanceId) -> BTreeSet<ExecutionMode> {
        let mut modes: BTreeSet<ExecutionMode> = self
            .graph
            .origins(id)
            .into_iter()
            .filter_map(|origin| self.instances.get(&origin))
            .map(|instance| instance.default_execution)
            .collect();
        if modes.is_empty() {
            if let Some(instance) = self.instances.get(&id) {
                modes.insert(instance.default_execution);
            }
        }
        modes
    }

    fn default_orderings(&self, id: InstanceId) -> BTreeSet<ElementOrdering> {
        let mut orderings: BTreeSet<ElementOrdering> = self
            .graph
            .origins(id)
            .into_iter()
            .filter_map(|origin| self.instances.get(&origin))
            .map(|instance| instance.default_ordering)
            .collect();
        if orderings.is_empty() {
            if let Some(instance) = self.instances.get(&id) {
                orderings.insert(instance.default_ordering);
            }
        }
        orderings
    }
}

fn extract_modes(states: &BTreeSet<AutomatonState>) -> BTreeSet<ExecutionMode> {
    states
        .iter()
        .filter_map(|state| match state.value() {
            Some(AttributeValue::Execution(mode)) => Some(mode),
            _ => None,
        })
        .collect()
}

fn extract_orderings(states: &BTreeSet<AutomatonState>) -> BTreeSet<ElementOrdering> {
    states
        .iter()
        .filter_map(|state| match state.value() {
            Some(AttributeValue::Ordering(ordering)) => Some(ordering),
            _ => None,
        })
        .collect()
}
