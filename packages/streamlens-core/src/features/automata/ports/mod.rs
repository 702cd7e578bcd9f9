/*
 * Typestate Solver Port
 *
 * Boundary to the external fixed-point typestate solver. The engine hands it
 * an automaton, the oracle, and the tracked-instance set; it returns raw
 * per-(instance, point) state facts. The tracked set is a plain parameter,
 * so callers select the tracking strategy without subclassing the solver.
 */

use crate::errors::Result;
use crate::features::automata::domain::{AttributeAutomaton, FactTable};
use crate::features::oracle::ports::AnalysisOracle;
use crate::shared::models::InstanceId;

/// Produces raw automaton facts for tracked instances
pub trait TypestateSolver: Send + Sync {
    /// Run one automaton over the program and collect per-point states
    ///
    /// # Arguments
    /// * `automaton` - attribute automaton to evaluate
    /// * `oracle` - call-graph/points-to facts
    /// * `tracked` - instances to compute facts for
    fn solve(
        &self,
        automaton: &AttributeAutomaton,
        oracle: &dyn AnalysisOracle,
        tracked: &[InstanceId],
    ) -> Result<FactTable>;
}
