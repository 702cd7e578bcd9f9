/*
 * Terminal-Operation Reachability Check
 *
 * A pipeline instance is consumed when it appears in the receiver set of some
 * terminal invocation, or when one of its downstream derivations does. The
 * check unions all terminal receiver sets, propagates validity upstream
 * through the predecessor graph, and flags every tracked instance left
 * outside the propagated set. The flag makes that one instance ineligible;
 * the run continues.
 */

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::features::chain::domain::PredecessorGraph;
use crate::features::oracle::ports::AnalysisOracle;
use crate::features::reachability::domain::TerminalInvocation;
use crate::shared::models::{Diagnostic, FailureKind, InstanceId, ProgramPoint};

/// Outcome of the reachability check
#[derive(Debug, Default)]
pub struct ConsumptionReport {
    /// Instances consumed directly or through a downstream derivation
    valid: FxHashSet<InstanceId>,

    /// Terminal points at which an instance is a direct receiver
    terminal_points: FxHashMap<InstanceId, Vec<ProgramPoint>>,

    /// One finding per unconsumed tracked instance
    pub diagnostics: Vec<Diagnostic>,
}

impl ConsumptionReport {
    /// Whether the instance reaches a terminal operation
    #[inline]
    pub fn is_consumed(&self, instance: InstanceId) -> bool {
        self.valid.contains(&instance)
    }

    /// Terminal points where the instance itself is the receiver
    pub fn terminal_points(&self, instance: InstanceId) -> &[ProgramPoint] {
        self.terminal_points
            .get(&instance)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of consumed instances
    pub fn consumed_count(&self) -> usize {
        self.valid.len()
    }
}

/// Run the reachability check over a completed terminal sweep
pub fn check_consumption(
    oracle: &dyn AnalysisOracle,
    invocations: &[TerminalInvocation],
    graph: &PredecessorGraph,
    tracked: &[InstanceId],
) -> ConsumptionReport {
    let mut report = ConsumptionReport::default();

    for invocation in invocations {
        for &receiver in &invocation.receivers {
            report.valid.insert(receiver);
            report
                .terminal_points
                .entry(receiver)
                .or_default()
                .push(invocation.point);
            // The terminal consumes the whole upstream chain
            for upstream in graph.transitive_predecessors(receiver) {
                report.valid.insert(upstream);
            }
        }
    }

    for &instance in tracked {
        if report.is_consumed(instance) {
            continue;
        }
        let mut diagnostic = Diagnostic::new(
            FailureKind::MissingTerminalOperation,
            instance,
            "pipeline is never consumed by a terminal operation",
        );
        if let Some(point) = oracle
            .instance(instance)
            .and_then(|facts| facts.call_string.producing_call())
        {
            diagnostic = diagnostic.at(point);
        }
        debug!(instance = %instance, "missing terminal operation");
        report.diagnostics.push(diagnostic);
    }

    report
}
