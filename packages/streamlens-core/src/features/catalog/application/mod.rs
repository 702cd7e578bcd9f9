/*
 * Catalog Application Services
 */

pub mod defaults;

pub use defaults::{infer_defaults, DefaultInference, SourcePolicy};
