/*
 * Operation Catalog Feature
 *
 * Signature tables describing the pipeline API under analysis: which
 * methods are terminal, which intermediates buffer state, which creation
 * expressions fix an ordering, how source types iterate, and the
 * reduce-order semantics of void/scalar terminals.
 *
 * # Architecture
 * - domain: OperationCatalog, SourceTable and capability models
 * - application: declaration-derived default inference
 * - infrastructure: built-in tables, YAML/JSON catalog parser
 *
 * The catalog replaces runtime reflection: every characteristic the
 * analysis needs from the API is declared statically and can be extended
 * per project through overlays.
 */

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{infer_defaults, DefaultInference, SourcePolicy};
pub use domain::{OperationCatalog, ReturnCategory, SourceCapability, SourceOrdering, SourceTable};
pub use infrastructure::{BuiltInCatalog, CatalogParser};
