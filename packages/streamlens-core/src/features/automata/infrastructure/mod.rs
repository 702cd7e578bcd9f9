/*
 * Automata Infrastructure
 */

pub mod built_in;
pub mod chain_solver;
pub mod recorded;

pub use built_in::{ExecutionAutomaton, OrderingAutomaton};
pub use chain_solver::ChainSolver;
pub use recorded::RecordedSolver;
