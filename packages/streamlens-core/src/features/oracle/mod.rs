/*
 * Oracle Feature
 *
 * Read-only boundary to the external call-graph/points-to engine, plus an
 * in-memory table implementation for tests and embedders.
 */

pub mod infrastructure;
pub mod ports;

pub use infrastructure::TableOracle;
pub use ports::{AnalysisOracle, InstanceFacts, ValueRef};
