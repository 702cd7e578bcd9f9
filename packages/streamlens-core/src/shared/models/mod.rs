/// Shared domain models
pub mod attributes;
pub mod call_graph;
pub mod diagnostics;
pub mod instance;

pub use attributes::{AttributeKind, ElementOrdering, ExecutionMode};
pub use call_graph::{
    CallSite, CallSiteId, CallString, ContextId, Location, ProcedureId, ProcedureInfo,
    ProgramPoint,
};
pub use diagnostics::{Diagnostic, FailureKind};
pub use instance::{CreationExpr, CreationSite, InstanceId, StreamInstance};
