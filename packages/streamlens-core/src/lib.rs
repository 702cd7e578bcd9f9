/*
 * streamlens-core - Stream Pipeline Attribute Inference
 *
 * Statically infers, for every pipeline object a program may construct, the
 * attributes that hold at the moment the pipeline is consumed: possible
 * execution modes, possible element orderings, and three derived flags
 * (side effects, stateful intermediates, reduce-order sensitivity).
 *
 * Feature-First Hexagonal Architecture:
 * - shared/    : common models (instances, call graph, attributes, diagnostics)
 * - features/  : vertical slices (catalog, oracle, automata, chain,
 *                reachability, side_effects, classification, aggregation)
 * - pipeline/  : orchestration
 * - session/   : per-run state, caches, cancellation
 * - config/    : run configuration
 *
 * Call-graph and points-to facts come from an external engine behind the
 * `AnalysisOracle` port; automaton evaluation goes through the
 * `TypestateSolver` port. Everything else is self-contained.
 */

/// Shared models and utilities
pub mod shared;

/// Feature modules (vertical slices)
pub mod features;

/// Pipeline orchestration
pub mod pipeline;

/// Per-run session state
pub mod session;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// Re-exports for the public API

pub use config::AnalysisConfig;
pub use errors::{Result, StreamlensError};
pub use features::aggregation::domain::{AnalysisReport, StreamAttributes};
pub use features::automata::infrastructure::{ChainSolver, RecordedSolver};
pub use features::automata::ports::TypestateSolver;
pub use features::catalog::application::SourcePolicy;
pub use features::catalog::domain::OperationCatalog;
pub use features::catalog::infrastructure::BuiltInCatalog;
pub use features::chain::application::WideningPolicy;
pub use features::oracle::infrastructure::TableOracle;
pub use features::oracle::ports::{AnalysisOracle, InstanceFacts, ValueRef};
pub use pipeline::StreamAnalyzer;
pub use session::{AnalysisSession, CancellationToken};
pub use shared::models::{
    CallSite, CallSiteId, CallString, ContextId, CreationExpr, CreationSite, Diagnostic,
    ElementOrdering, ExecutionMode, FailureKind, InstanceId, Location, ProcedureId, ProcedureInfo,
    ProgramPoint, StreamInstance,
};
