/*
 * Chain Solver
 *
 * Straight-line reference solver: each tracked instance's raw facts are the
 * automaton state committed by its own producing call, recorded at that
 * call's program point. A producing call without a matching transition
 * records bottom; chain inheritance is entirely the merge engine's concern.
 *
 * Suitable for programs without control-flow branching over pipeline values.
 * The general fixed-point solver over the supergraph stays external.
 */

use tracing::debug;

use crate::errors::{Result, StreamlensError};
use crate::features::automata::domain::{AttributeAutomaton, FactTable};
use crate::features::automata::ports::TypestateSolver;
use crate::features::oracle::ports::AnalysisOracle;
use crate::shared::models::InstanceId;

/// Replays producing calls through the automaton
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainSolver;

impl ChainSolver {
    pub fn new() -> Self {
        Self
    }
}

impl TypestateSolver for ChainSolver {
    fn solve(
        &self,
        automaton: &AttributeAutomaton,
        oracle: &dyn AnalysisOracle,
        tracked: &[InstanceId],
    ) -> Result<FactTable> {
        let mut table = FactTable::new(automaton.kind());

        for &id in tracked {
            let facts = oracle
                .instance(id)
                .ok_or_else(|| StreamlensError::solver(format!("no oracle facts for {}", id)))?;

            let Some(point) = facts.call_string.producing_call() else {
                debug!(instance = %id, "empty call string, no facts to record");
                continue;
            };

            let site = oracle.call_site(point.site).ok_or_else(|| {
                StreamlensError::solver(format!("call string of {} names unknown {}", id, point))
            })?;

            let state = automaton.step(automaton.initial_state(), &site.method);
            table.record(id, point, state);
        }

        debug!(
            kind = %automaton.kind(),
            instances = tracked.len(),
            facts = table.len(),
            "chain solve complete"
        );
        Ok(table)
    }
}
