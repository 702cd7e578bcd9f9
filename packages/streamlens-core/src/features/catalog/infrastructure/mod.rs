/*
 * Catalog Infrastructure
 */

pub mod built_in;
pub mod catalog_parser;

pub use built_in::BuiltInCatalog;
pub use catalog_parser::{CatalogConfig, CatalogParser, OrderingWord, SourceConfig};
