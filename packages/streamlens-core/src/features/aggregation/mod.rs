/*
 * Aggregation Feature
 *
 * Converts merged automaton states and pass outputs into the per-instance
 * attribute report exposed to callers.
 */

pub mod application;
pub mod domain;

pub use application::{AggregationInput, ResultAggregator};
pub use domain::{AnalysisReport, StreamAttributes};
