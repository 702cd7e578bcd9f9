/*
 * Analysis Session
 *
 * Per-run state: the tracked instance table, creation-time findings, the
 * predecessor graph, and the solver fact tables. Every cache lives here and
 * is dropped with the session; no analysis state is shared across runs, so
 * concurrent sessions never observe each other.
 *
 * Cancellation is cooperative. The analyzer polls the session's token at
 * terminal-call granularity and abandons the run (with its partial caches)
 * on the first observed cancel.
 */

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use rustc_hash::FxHashMap;

use crate::errors::{Result, StreamlensError};
use crate::features::automata::domain::FactTable;
use crate::features::chain::domain::PredecessorGraph;
use crate::shared::models::{AttributeKind, Diagnostic, InstanceId, StreamInstance};

/// Shared cancel flag for one analysis run
///
/// Clones share the flag; any holder may cancel.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// State of one analysis run
pub struct AnalysisSession {
    id: Uuid,
    token: CancellationToken,
    instances: FxHashMap<InstanceId, StreamInstance>,
    findings: Vec<Diagnostic>,
    graph: PredecessorGraph,
    execution_facts: FactTable,
    ordering_facts: FactTable,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::with_token(CancellationToken::new())
    }

    /// Session observing an externally held cancel flag
    pub fn with_token(token: CancellationToken) -> Self {
        let id = Uuid::new_v4();
        debug!(session = %id, "analysis session opened");
        Self {
            id,
            token,
            instances: FxHashMap::default(),
            findings: Vec::new(),
            graph: PredecessorGraph::new(),
            execution_facts: FactTable::new(AttributeKind::Execution),
            ordering_facts: FactTable::new(AttributeKind::Ordering),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// A clone of the session's cancel flag
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Fail fast when the run was cancelled
    pub fn checkpoint(&self) -> Result<()> {
        if self.token.is_cancelled() {
            debug!(session = %self.id, "cancellation observed");
            return Err(StreamlensError::Cancelled);
        }
        Ok(())
    }

    /// Admit a tracked instance
    pub fn admit(&mut self, instance: StreamInstance) {
        self.instances.insert(instance.id, instance);
    }

    /// Record a creation-time finding
    pub fn record_finding(&mut self, finding: Diagnostic) {
        self.findings.push(finding);
    }

    pub fn instances(&self) -> &FxHashMap<InstanceId, StreamInstance> {
        &self.instances
    }

    pub fn instance(&self, id: InstanceId) -> Option<&StreamInstance> {
        self.instances.get(&id)
    }

    /// Tracked instance ids, sorted
    pub fn tracked(&self) -> Vec<InstanceId> {
        let mut ids: Vec<InstanceId> = self.instances.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn findings(&self) -> &[Diagnostic] {
        &self.findings
    }

    pub fn graph(&self) -> &PredecessorGraph {
        &self.graph
    }

    pub fn set_graph(&mut self, graph: PredecessorGraph) {
        self.graph = graph;
    }

    pub fn execution_facts(&self) -> &FactTable {
        &self.execution_facts
    }

    pub fn ordering_facts(&self) -> &FactTable {
        &self.ordering_facts
    }

    /// Install a solved fact table for one attribute
    pub fn set_facts(&mut self, kind: AttributeKind, facts: FactTable) {
        match kind {
            AttributeKind::Execution => self.execution_facts = facts,
            AttributeKind::Ordering => self.ordering_facts = facts,
        }
    }
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new()
    }
}
