/*
 * Chain Feature
 *
 * Links pipeline instances to their upstream producers and merges automaton
 * facts along that graph.
 *
 * ## Architecture
 *
 * - domain: predecessor graph with cycle validation and transitive closures
 * - application: graph construction (receiver points-to plus interprocedural
 *   widening) and the select/union merge engine
 */

pub mod application;
pub mod domain;

pub use application::{MergeEngine, PredecessorGraphBuilder, WideningPolicy};
pub use domain::PredecessorGraph;
