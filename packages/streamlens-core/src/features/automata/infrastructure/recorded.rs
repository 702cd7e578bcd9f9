/*
 * Recorded Solver
 *
 * Serves pre-computed fact tables verbatim, restricted to the tracked set.
 * This is the adapter embedders use when the external fixed-point solver has
 * already run and its output was captured.
 */

use rustc_hash::FxHashMap;

use crate::errors::{Result, StreamlensError};
use crate::features::automata::domain::{AttributeAutomaton, FactTable};
use crate::features::automata::ports::TypestateSolver;
use crate::features::oracle::ports::AnalysisOracle;
use crate::shared::models::{AttributeKind, InstanceId};

/// TypestateSolver over pre-recorded fact tables
#[derive(Debug, Clone, Default)]
pub struct RecordedSolver {
    tables: FxHashMap<AttributeKind, FactTable>,
}

impl RecordedSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the recorded table for one attribute kind
    pub fn with_table(mut self, kind: AttributeKind, table: FactTable) -> Self {
        self.tables.insert(kind, table);
        self
    }

    /// Replace the recorded table for one attribute kind
    pub fn set_table(&mut self, kind: AttributeKind, table: FactTable) {
        self.tables.insert(kind, table);
    }
}

impl TypestateSolver for RecordedSolver {
    fn solve(
        &self,
        automaton: &AttributeAutomaton,
        _oracle: &dyn AnalysisOracle,
        tracked: &[InstanceId],
    ) -> Result<FactTable> {
        let table = self.tables.get(&automaton.kind()).ok_or_else(|| {
            StreamlensError::solver(format!("no recorded facts for {}", automaton.kind()))
        })?;

        Ok(table.filtered(|instance| tracked.contains(&instance)))
    }
}
