/*
 * Attribute Automaton
 *
 * Finite automaton tracking one pipeline attribute through a call chain.
 *
 * # Example: Execution Mode
 * ```
 * States: {bottom, SEQUENTIAL, PARALLEL}
 * Transitions:
 *   any --parallel()--> PARALLEL
 *   any --sequential()--> SEQUENTIAL
 * ```
 *
 * bottom is the sole initial state and means "no evidence yet"; it defers to
 * upstream facts during the merge. Calls without a matching transition are
 * implicit self-loops, so the transition table only lists the methods that
 * change the attribute. Nothing transitions back into bottom.
 *
 * # Time Complexity
 * - step: O(1) (hash lookup)
 * - run: O(chain length)
 */

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::errors::{Result, StreamlensError};
use crate::shared::models::{AttributeKind, ElementOrdering, ExecutionMode};

/// Committed attribute value carried by a non-bottom automaton state
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AttributeValue {
    Execution(ExecutionMode),
    Ordering(ElementOrdering),
}

impl AttributeValue {
    /// Attribute kind this value belongs to
    pub fn kind(self) -> AttributeKind {
        match self {
            AttributeValue::Execution(_) => AttributeKind::Execution,
            AttributeValue::Ordering(_) => AttributeKind::Ordering,
        }
    }
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeValue::Execution(mode) => write!(f, "{}", mode),
            AttributeValue::Ordering(ordering) => write!(f, "{}", ordering),
        }
    }
}

/// State of an attribute automaton
///
/// `Bottom` orders before every committed value, so it is first in sorted
/// fact sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AutomatonState {
    /// No evidence observed on this chain segment
    Bottom,

    /// Attribute committed to a value
    Value(AttributeValue),
}

impl AutomatonState {
    /// Shorthand for a committed execution-mode state
    pub fn execution(mode: ExecutionMode) -> Self {
        AutomatonState::Value(AttributeValue::Execution(mode))
    }

    /// Shorthand for a committed ordering state
    pub fn ordering(ordering: ElementOrdering) -> Self {
        AutomatonState::Value(AttributeValue::Ordering(ordering))
    }

    pub fn is_bottom(self) -> bool {
        matches!(self, AutomatonState::Bottom)
    }

    /// Committed value, if any
    pub fn value(self) -> Option<AttributeValue> {
        match self {
            AutomatonState::Bottom => None,
            AutomatonState::Value(value) => Some(value),
        }
    }

    /// Complete state space for one attribute kind
    pub fn universe(kind: AttributeKind) -> Vec<AutomatonState> {
        match kind {
            AttributeKind::Execution => vec![
                AutomatonState::Bottom,
                AutomatonState::execution(ExecutionMode::Sequential),
                AutomatonState::execution(ExecutionMode::Parallel),
            ],
            AttributeKind::Ordering => vec![
                AutomatonState::Bottom,
                AutomatonState::ordering(ElementOrdering::Ordered),
                AutomatonState::ordering(ElementOrdering::Unordered),
            ],
        }
    }
}

impl std::fmt::Display for AutomatonState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AutomatonState::Bottom => write!(f, "bottom"),
            AutomatonState::Value(value) => write!(f, "{}", value),
        }
    }
}

/// Deterministic automaton over one attribute kind
///
/// Construct through [`AutomatonBuilder`]; the builder rejects conflicting
/// and ill-typed transition tables, so a built automaton is always valid.
#[derive(Debug, Clone)]
pub struct AttributeAutomaton {
    kind: AttributeKind,
    states: BTreeSet<AutomatonState>,
    transitions: FxHashMap<(AutomatonState, String), AutomatonState>,
}

impl AttributeAutomaton {
    pub fn kind(&self) -> AttributeKind {
        self.kind
    }

    /// Sole initial state
    pub fn initial_state(&self) -> AutomatonState {
        AutomatonState::Bottom
    }

    pub fn states(&self) -> &BTreeSet<AutomatonState> {
        &self.states
    }

    /// Successor state for one call
    ///
    /// # Returns
    /// The transition target, or `from` unchanged when no transition matches
    /// (implicit self-loop).
    pub fn step(&self, from: AutomatonState, method: &str) -> AutomatonState {
        self.transitions
            .get(&(from, method.to_string()))
            .copied()
            .unwrap_or(from)
    }

    /// Fold a call sequence from bottom
    ///
    /// # Example
    /// ```ignore
    /// let state = automaton.run(["filter", "parallel", "map"].into_iter());
    /// assert_eq!(state, AutomatonState::execution(ExecutionMode::Parallel));
    /// ```
    pub fn run<'a>(&self, methods: impl IntoIterator<Item = &'a str>) -> AutomatonState {
        methods
            .into_iter()
            .fold(self.initial_state(), |state, method| {
                self.step(state, method)
            })
    }

    /// Whether any transition fires on this method name
    pub fn responds_to(&self, method: &str) -> bool {
        self.transitions.keys().any(|(_, m)| m == method)
    }
}

/// Validating builder for [`AttributeAutomaton`]
///
/// # Example
/// ```ignore
/// let automaton = AutomatonBuilder::new(AttributeKind::Execution)
///     .on_any("parallel", AutomatonState::execution(ExecutionMode::Parallel))
///     .on_any("sequential", AutomatonState::execution(ExecutionMode::Sequential))
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct AutomatonBuilder {
    kind: AttributeKind,
    entries: Vec<(AutomatonState, String, AutomatonState)>,
}

impl AutomatonBuilder {
    pub fn new(kind: AttributeKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
        }
    }

    /// Add one transition
    pub fn transition(
        mut self,
        from: AutomatonState,
        method: impl Into<String>,
        to: AutomatonState,
    ) -> Self {
        self.entries.push((from, method.into(), to));
        self
    }

    /// Add the same transition from every state of the kind's universe
    ///
    /// Attribute-changing calls commit the attribute regardless of the state
    /// they find, so this is the common form.
    pub fn on_any(mut self, method: impl Into<String>, to: AutomatonState) -> Self {
        let method = method.into();
        for from in AutomatonState::universe(self.kind) {
            self.entries.push((from, method.clone(), to));
        }
        self
    }

    /// Validate and build
    ///
    /// # Errors
    /// - a state of a different attribute kind appears in the table
    /// - a transition targets bottom
    /// - the same (state, method) key maps to two different targets
    pub fn build(self) -> Result<AttributeAutomaton> {
        let mut states: BTreeSet<AutomatonState> =
            AutomatonState::universe(self.kind).into_iter().collect();
        let mut transitions: FxHashMap<(AutomatonState, String), AutomatonState> =
            FxHashMap::default();

        for (from, method, to) in self.entries {
            for state in [from, to] {
                if let Some(value) = state.value() {
                    if value.kind() != self.kind {
                        return Err(StreamlensError::config(format!(
                            "state '{}' does not belong to {} automaton",
                            state, self.kind
                        )));
                    }
                }
            }
            if to.is_bottom() {
                return Err(StreamlensError::config(format!(
                    "transition '{}' from '{}' re-enters bottom",
                    method, from
                )));
            }

            let key = (from, method);
            match transitions.get(&key) {
                Some(existing) if *existing != to => {
                    return Err(StreamlensError::config(format!(
                        "conflicting transitions for '{}' from '{}': '{}' vs '{}'",
                        key.1, key.0, existing, to
                    )));
                }
                _ => {
                    states.insert(from);
                    states.insert(to);
                    transitions.insert(key, to);
                }
            }
        }

        Ok(AttributeAutomaton {
            kind: self.kind,
            states,
            transitions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn execution_automaton() -> AttributeAutomaton {
        AutomatonBuilder::new(AttributeKind::Execution)
            .on_any(
                "parallel",
                AutomatonState::execution(ExecutionMode::Parallel),
            )
            .on_any(
                "sequential",
                AutomatonState::execution(ExecutionMode::Sequential),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_initial_state_is_bottom() {
        let automaton = execution_automaton();
        assert_eq!(automaton.initial_state(), AutomatonState::Bottom);
        assert!(automaton.initial_state().is_bottom());
    }

    #[test]
    fn test_step_commits_attribute() {
        let automaton = execution_automaton();

        let state = automaton.step(AutomatonState::Bottom, "parallel");
        assert_eq!(state, AutomatonState::execution(ExecutionMode::Parallel));

        let state = automaton.step(state, "sequential");
        assert_eq!(state, AutomatonState::execution(ExecutionMode::Sequential));
    }

    #[test]
    fn test_unmatched_call_is_self_loop() {
        let automaton = execution_automaton();

        assert_eq!(
            automaton.step(AutomatonState::Bottom, "filter"),
            AutomatonState::Bottom
        );

        let parallel = AutomatonState::execution(ExecutionMode::Parallel);
        assert_eq!(automaton.step(parallel, "map"), parallel);
    }

    #[test]
    fn test_run_folds_chain() {
        let automaton = execution_automaton();

        let state = automaton.run(["filter", "parallel", "map", "sequential", "distinct"]);
        assert_eq!(state, AutomatonState::execution(ExecutionMode::Sequential));

        // Last attribute-changing call wins
        let state = automaton.run(["sequential", "parallel"]);
        assert_eq!(state, AutomatonState::execution(ExecutionMode::Parallel));
    }

    #[test]
    fn test_run_without_evidence_stays_bottom() {
        let automaton = execution_automaton();
        assert_eq!(
            automaton.run(["filter", "map", "collect"]),
            AutomatonState::Bottom
        );
    }

    #[test]
    fn test_responds_to() {
        let automaton = execution_automaton();
        assert!(automaton.responds_to("parallel"));
        assert!(!automaton.responds_to("sorted"));
    }

    #[test]
    fn test_builder_rejects_conflicting_transitions() {
        let result = AutomatonBuilder::new(AttributeKind::Execution)
            .transition(
                AutomatonState::Bottom,
                "parallel",
                AutomatonState::execution(ExecutionMode::Parallel),
            )
            .transition(
                AutomatonState::Bottom,
                "parallel",
                AutomatonState::execution(ExecutionMode::Sequential),
            )
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_builder_accepts_repeated_identical_transition() {
        let result = AutomatonBuilder::new(AttributeKind::Execution)
            .transition(
                AutomatonState::Bottom,
                "parallel",
                AutomatonState::execution(ExecutionMode::Parallel),
            )
            .transition(
                AutomatonState::Bottom,
                "parallel",
                AutomatonState::execution(ExecutionMode::Parallel),
            )
            .build();

        assert!(result.is_ok());
    }

    #[test]
    fn test_builder_rejects_foreign_kind_state() {
        let result = AutomatonBuilder::new(AttributeKind::Execution)
            .transition(
                AutomatonState::Bottom,
                "sorted",
                AutomatonState::ordering(ElementOrdering::Ordered),
            )
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_builder_rejects_bottom_target() {
        let result = AutomatonBuilder::new(AttributeKind::Execution)
            .transition(
                AutomatonState::execution(ExecutionMode::Parallel),
                "reset",
                AutomatonState::Bottom,
            )
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_universe_covers_kind() {
        let execution = AutomatonState::universe(AttributeKind::Execution);
        assert_eq!(execution.len(), 3);
        assert!(execution.contains(&AutomatonState::Bottom));

        let ordering = AutomatonState::universe(AttributeKind::Ordering);
        assert_eq!(ordering.len(), 3);
        assert!(ordering.contains(&AutomatonState::ordering(ElementOrdering::Unordered)));
    }

    #[test]
    fn test_state_ordering_puts_bottom_first() {
        let mut set = BTreeSet::new();
        set.insert(AutomatonState::execution(ExecutionMode::Parallel));
        set.insert(AutomatonState::Bottom);

        assert_eq!(set.iter().next(), Some(&AutomatonState::Bottom));
    }

    #[test]
    fn test_display() {
        assert_eq!(AutomatonState::Bottom.to_string(), "bottom");
        assert_eq!(
            AutomatonState::execution(ExecutionMode::Parallel).to_string(),
            "PARALLEL"
        );
        assert_eq!(
            AutomatonState::ordering(ElementOrdering::Unordered).to_string(),
            "UNORDERED"
        );
    }
}
