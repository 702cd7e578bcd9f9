/*
 * State Merge Engine
 *
 * Combines per-instance automaton facts along the predecessor graph into one
 * merged state set per instance. The select rule is the whole algorithm:
 *
 *   select(bottom, s)      = s          (bottom defers)
 *   select(s, bottom)      = s
 *   select(bottom, bottom) = bottom
 *   select(s1, s2)         = {s1, s2}   (differing evidence is kept, union)
 *
 * An empty fact set behaves as bottom. Root instances return their raw facts
 * unchanged. Disagreeing predecessor branches union, never intersect: the
 * result must cover every possibility a real execution could exhibit.
 *
 * Merged results are memoized per instance in a concurrent map; the engine
 * only reads the fact table and the (already closed) predecessor graph, so
 * per-instance queries may run in parallel.
 */

use dashmap::DashMap;
use std::collections::BTreeSet;

use crate::features::automata::domain::{AutomatonState, FactTable};
use crate::features::chain::domain::PredecessorGraph;
use crate::shared::models::{InstanceId, ProgramPoint};

/// Pairwise select of two automaton states
pub fn select(a: AutomatonState, b: AutomatonState) -> BTreeSet<AutomatonState> {
    let mut out = BTreeSet::new();
    match (a.is_bottom(), b.is_bottom()) {
        (true, true) => {
            out.insert(AutomatonState::Bottom);
        }
        (true, false) => {
            out.insert(b);
        }
        (false, true) => {
            out.insert(a);
        }
        (false, false) => {
            out.insert(a);
            out.insert(b);
        }
    }
    out
}

/// Select lifted to fact sets; an empty side behaves as bottom
pub fn combine(
    own: &BTreeSet<AutomatonState>,
    upstream: &BTreeSet<AutomatonState>,
) -> BTreeSet<AutomatonState> {
    if own.is_empty() {
        return upstream.clone();
    }
    if upstream.is_empty() {
        return own.clone();
    }

    let mut out = BTreeSet::new();
    for &a in own {
        for &b in upstream {
            out.extend(select(a, b));
        }
    }
    out
}

/// Memoized recursive merge over the predecessor graph
pub struct MergeEngine<'a> {
    graph: &'a PredecessorGraph,
    facts: &'a FactTable,
    cache: DashMap<InstanceId, BTreeSet<AutomatonState>>,
}

impl<'a> MergeEngine<'a> {
    pub fn new(graph: &'a PredecessorGraph, facts: &'a FactTable) -> Self {
        Self {
            graph,
            facts,
            cache: DashMap::new(),
        }
    }

    /// Merged state set for an instance, over all its recorded points
    pub fn merged(&self, instance: InstanceId) -> BTreeSet<AutomatonState> {
        if let Some(hit) = self.cache.get(&instance) {
            return hit.clone();
        }

        let own = self.facts.states_for(instance);
        let result = self.merge_with_predecessors(instance, own);

        self.cache.insert(instance, result.clone());
        result
    }

    /// Merged state set for an instance at one specific point
    ///
    /// Uses the facts recorded exactly at `point` when present, the
    /// instance-wide facts otherwise. Predecessor contributions are the
    /// point-independent merges.
    pub fn merged_at(&self, instance: InstanceId, point: ProgramPoint) -> BTreeSet<AutomatonState> {
        let own = match self.facts.at(instance, point) {
            Some(states) => states.clone(),
            None => self.facts.states_for(instance),
        };
        self.merge_with_predecessors(instance, own)
    }

    fn merge_with_predecessors(
        &self,
        instance: InstanceId,
        own: BTreeSet<AutomatonState>,
    ) -> BTreeSet<AutomatonState> {
        let predecessors = self.graph.immediate_predecessors(instance);
        if predecessors.is_empty() {
            return own;
        }

        let mut result = BTreeSet::new();
        for predecessor in predecessors {
            let upstream = self.merged(predecessor);
            result.extend(combine(&own, &upstream));
        }
        result
    }

    /// Number of memoized instances
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}
