/*
 * Attribute Automata Feature
 *
 * Finite-state tracking of pipeline attributes: the automaton model and its
 * validating builder, the solver fact table, the two built-in automata, and
 * solver adapters behind the TypestateSolver port.
 *
 * # Architecture
 * - domain: AttributeAutomaton, AutomatonState, FactTable
 * - infrastructure: built-in automata, ChainSolver, RecordedSolver
 * - ports: TypestateSolver boundary to the external fixed-point solver
 */

pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::{AttributeAutomaton, AttributeValue, AutomatonBuilder, AutomatonState, FactTable};
pub use infrastructure::{ChainSolver, ExecutionAutomaton, OrderingAutomaton, RecordedSolver};
pub use ports::TypestateSolver;
