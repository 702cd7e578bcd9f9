/*
 * Catalog Domain Models
 */

pub mod operations;
pub mod sources;

pub use operations::{OperationCatalog, ReturnCategory};
pub use sources::{SourceCapability, SourceOrdering, SourceTable};
