/*
 * Automata Domain Models
 */

pub mod automaton;
pub mod fact_table;

pub use automaton::{AttributeAutomaton, AttributeValue, AutomatonBuilder, AutomatonState};
pub use fact_table::FactTable;
