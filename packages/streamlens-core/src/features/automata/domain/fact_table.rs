/*
 * Fact Table
 *
 * Per-automaton solver output: the set of possible automaton states for each
 * (instance, program point) pair. Populated by a solver, read-only during
 * merging and aggregation.
 */

use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

use crate::features::automata::domain::AutomatonState;
use crate::shared::models::{AttributeKind, InstanceId, ProgramPoint};

/// Solver facts for one attribute kind
#[derive(Debug, Clone, Default)]
pub struct FactTable {
    kind: Option<AttributeKind>,
    facts: FxHashMap<(InstanceId, ProgramPoint), BTreeSet<AutomatonState>>,
}

impl FactTable {
    pub fn new(kind: AttributeKind) -> Self {
        Self {
            kind: Some(kind),
            facts: FxHashMap::default(),
        }
    }

    /// Attribute kind this table was solved for
    pub fn kind(&self) -> Option<AttributeKind> {
        self.kind
    }

    /// Record one possible state at a point
    pub fn record(&mut self, instance: InstanceId, point: ProgramPoint, state: AutomatonState) {
        self.facts.entry((instance, point)).or_default().insert(state);
    }

    /// Record several possible states at a point
    pub fn record_all(
        &mut self,
        instance: InstanceId,
        point: ProgramPoint,
        states: impl IntoIterator<Item = AutomatonState>,
    ) {
        self.facts
            .entry((instance, point))
            .or_default()
            .extend(states);
    }

    /// States recorded at one exact point
    pub fn at(&self, instance: InstanceId, point: ProgramPoint) -> Option<&BTreeSet<AutomatonState>> {
        self.facts.get(&(instance, point))
    }

    /// All states recorded for an instance, over every point
    ///
    /// This is the raw fact set the merge consumes; an empty result behaves
    /// as bottom there.
    pub fn states_for(&self, instance: InstanceId) -> BTreeSet<AutomatonState> {
        let mut states = BTreeSet::new();
        for ((recorded, _), set) in &self.facts {
            if *recorded == instance {
                states.extend(set.iter().copied());
            }
        }
        states
    }

    /// Instances with at least one recorded fact, sorted
    pub fn instances(&self) -> Vec<InstanceId> {
        let mut ids: Vec<InstanceId> = self.facts.keys().map(|(instance, _)| *instance).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Copy of this table restricted to instances the predicate accepts
    pub fn filtered(&self, keep: impl Fn(InstanceId) -> bool) -> FactTable {
        let facts = self
            .facts
            .iter()
            .filter(|((instance, _), _)| keep(*instance))
            .map(|(key, set)| (*key, set.clone()))
            .collect();
        FactTable {
            kind: self.kind,
            facts,
        }
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}
