/*
 * Analysis Pipeline
 *
 * End-to-end orchestration: solver runs, predecessor graph, terminal sweep,
 * attribute passes, aggregation.
 */

pub mod analyzer;

pub use analyzer::StreamAnalyzer;
