/*
 * Built-in Attribute Automata
 *
 * The two automata the engine runs:
 * - ExecutionAutomaton: bottom / SEQUENTIAL / PARALLEL
 * - OrderingAutomaton: bottom / ORDERED / UNORDERED
 *
 * Trigger method names come from the operation catalog, so a catalog overlay
 * extends the automata without touching their state spaces.
 */

use crate::errors::Result;
use crate::features::automata::domain::{AttributeAutomaton, AutomatonBuilder, AutomatonState};
use crate::features::catalog::domain::OperationCatalog;
use crate::shared::models::{AttributeKind, ElementOrdering, ExecutionMode};

/// Execution-mode automaton
///
/// Transitions:
/// - any --parallel()--> PARALLEL
/// - any --sequential()--> SEQUENTIAL
///
/// Everything else self-loops; a chain that never calls either method stays
/// at bottom and defers to upstream evidence or the declaration default.
pub struct ExecutionAutomaton;

impl ExecutionAutomaton {
    /// Define the execution automaton from catalog trigger sets
    pub fn define(catalog: &OperationCatalog) -> Result<AttributeAutomaton> {
        let mut builder = AutomatonBuilder::new(AttributeKind::Execution);
        for method in &catalog.parallel_methods {
            builder = builder.on_any(
                method.clone(),
                AutomatonState::execution(ExecutionMode::Parallel),
            );
        }
        for method in &catalog.sequential_methods {
            builder = builder.on_any(
                method.clone(),
                AutomatonState::execution(ExecutionMode::Sequential),
            );
        }
        builder.build()
    }
}

/// Ordering automaton
///
/// Transitions:
/// - any --sorted()--> ORDERED
/// - any --unordered()--> UNORDERED
pub struct OrderingAutomaton;

impl OrderingAutomaton {
    /// Define the ordering automaton from catalog trigger sets
    pub fn define(catalog: &OperationCatalog) -> Result<AttributeAutomaton> {
        let mut builder = AutomatonBuilder::new(AttributeKind::Ordering);
        for method in &catalog.ordered_methods {
            builder = builder.on_any(
                method.clone(),
                AutomatonState::ordering(ElementOrdering::Ordered),
            );
        }
        for method in &catalog.unordered_methods {
            builder = builder.on_any(
                method.clone(),
                AutomatonState::ordering(ElementOrdering::Unordered),
            );
        }
        builder.build()
    }
}
