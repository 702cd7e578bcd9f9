/*
 * Predecessor Graph
 *
 * Directed graph over pipeline instances where an edge X -> P means "X was
 * produced by an operation invoked on P". Roots (no outgoing edges) are the
 * creation points the merged facts are ultimately attributed back to.
 *
 * The relation is acyclic by construction of real programs: a producer
 * always exists strictly earlier in the chain. A cycle therefore means the
 * oracle handed us a malformed chain, and validation fails the whole run.
 *
 * Transitive closures are memoized eagerly by `compute_closures`, called
 * once after construction; afterwards every query is read-only, which is
 * what makes the downstream merge passes safe to run in parallel.
 */

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::errors::{Result, StreamlensError};
use crate::shared::models::InstanceId;

/// Produced-from relation over tracked instances
#[derive(Debug, Clone, Default)]
pub struct PredecessorGraph {
    graph: DiGraph<InstanceId, ()>,
    nodes: FxHashMap<InstanceId, NodeIndex>,
    closures: FxHashMap<InstanceId, FxHashSet<InstanceId>>,
}

impl PredecessorGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an instance node (idempotent)
    pub fn add_instance(&mut self, instance: InstanceId) -> NodeIndex {
        match self.nodes.get(&instance) {
            Some(idx) => *idx,
            None => {
                let idx = self.graph.add_node(instance);
                self.nodes.insert(instance, idx);
                idx
            }
        }
    }

    /// Record that `instance` was produced from `predecessor`
    pub fn add_predecessor(&mut self, instance: InstanceId, predecessor: InstanceId) {
        let from = self.add_instance(instance);
        let to = self.add_instance(predecessor);
        if !self.graph.contains_edge(from, to) {
            self.graph.add_edge(from, to, ());
        }
    }

    pub fn contains(&self, instance: InstanceId) -> bool {
        self.nodes.contains_key(&instance)
    }

    /// All instances in the graph, sorted
    pub fn instances(&self) -> Vec<InstanceId> {
        let mut ids: Vec<InstanceId> = self.nodes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Immediate predecessors of an instance
    pub fn immediate_predecessors(&self, instance: InstanceId) -> FxHashSet<InstanceId> {
        match self.nodes.get(&instance) {
            Some(idx) => self
                .graph
                .neighbors_directed(*idx, Direction::Outgoing)
                .map(|n| self.graph[n])
                .collect(),
            None => FxHashSet::default(),
        }
    }

    /// Instances produced from this one (inverse relation)
    pub fn successors(&self, instance: InstanceId) -> FxHashSet<InstanceId> {
        match self.nodes.get(&instance) {
            Some(idx) => self
                .graph
                .neighbors_directed(*idx, Direction::Incoming)
                .map(|n| self.graph[n])
                .collect(),
            None => FxHashSet::default(),
        }
    }

    /// Whether the instance has no predecessors
    pub fn is_root(&self, instance: InstanceId) -> bool {
        self.immediate_predecessors(instance).is_empty()
    }

    /// All transitive predecessors (ancestors), excluding the instance
    ///
    /// Served from the memoized closure; empty for unknown instances.
    pub fn transitive_predecessors(&self, instance: InstanceId) -> FxHashSet<InstanceId> {
        self.closures.get(&instance).cloned().unwrap_or_default()
    }

    /// Close a set of instances under the upstream relation
    ///
    /// Derived flags are monotone: set on an instance, they must be set on
    /// every transitive predecessor as well.
    pub fn upstream_closure(
        &self,
        seeds: impl IntoIterator<Item = InstanceId>,
    ) -> FxHashSet<InstanceId> {
        let mut closed = FxHashSet::default();
        for seed in seeds {
            closed.extend(self.transitive_predecessors(seed));
            closed.insert(seed);
        }
        closed
    }

    /// Root ancestors the instance's results attribute back to
    ///
    /// Includes the instance itself when it is a root.
    pub fn origins(&self, instance: InstanceId) -> FxHashSet<InstanceId> {
        if !self.contains(instance) {
            return FxHashSet::default();
        }
        let mut candidates = self.transitive_predecessors(instance);
        candidates.insert(instance);
        candidates
            .into_iter()
            .filter(|id| self.is_root(*id))
            .collect()
    }

    /// Reject cycles
    ///
    /// # Errors
    /// `MalformedChain` naming the instances on the cycle.
    pub fn validate_acyclic(&self) -> Result<()> {
        for scc in tarjan_scc(&self.graph) {
            if scc.len() > 1 {
                let members: Vec<String> = scc
                    .iter()
                    .map(|idx| self.graph[*idx].to_string())
                    .collect();
                return Err(StreamlensError::MalformedChain(format!(
                    "predecessor cycle through [{}]",
                    members.join(", ")
                )));
            }
        }
        for (instance, idx) in &self.nodes {
            if self.graph.contains_edge(*idx, *idx) {
                return Err(StreamlensError::MalformedChain(format!(
                    "{} is its own predecessor",
                    instance
                )));
            }
        }
        Ok(())
    }

    /// Memoize the transitive closure of every instance
    ///
    /// Must run after the graph is fully built and validated, and before any
    /// parallel traversal reads it.
    pub fn compute_closures(&mut self) {
        let ids: Vec<InstanceId> = self.nodes.keys().copied().collect();
        for instance in ids {
            if self.closures.contains_key(&instance) {
                continue;
            }
            let closure = self.walk_ancestors(instance);
            self.closures.insert(instance, closure);
        }
    }

    fn walk_ancestors(&self, instance: InstanceId) -> FxHashSet<InstanceId> {
        let mut seen = FxHashSet::default();
        let mut frontier: Vec<InstanceId> =
            self.immediate_predecessors(instance).into_iter().collect();

        while let Some(current) = frontier.pop() {
            if !seen.insert(current) {
                continue;
            }
            // Reuse a finished closure when available
            if let Some(memoized) = self.closures.get(&current) {
                seen.extend(memoized.iter().copied());
                continue;
            }
            frontier.extend(self.immediate_predecessors(current));
        }
        seen
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
