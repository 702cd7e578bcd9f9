/*
 * Catalog Definition Parser
 *
 * Parse operation catalogs from YAML/JSON, either as a complete catalog or
 * as an overlay on top of the built-in tables.
 *
 * # Schema
 * ```yaml
 * pipeline_types: [Stream, IntStream]
 * terminal_ops: [forEach, collect]
 * stateful_ops: [sorted, distinct]
 * reduce_order:
 *   always: [forEachOrdered]
 *   never: [count, forEach]
 * attribute_methods:
 *   parallel: [parallel]
 *   sequential: [sequential]
 *   ordered: [sorted]
 *   unordered: [unordered]
 * parallel_creations: [parallelStream]
 * creation_ordering:
 *   of: ordered
 *   generate: unordered
 * sources:
 *   ArrayList: { ordering: ordered }
 *   HashSet: { ordering: unordered }
 *   HashMap: { iterable: false }
 * ```
 *
 * Every section is optional; an overlay only extends the tables it names.
 */

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, StreamlensError};
use crate::features::catalog::domain::{OperationCatalog, SourceCapability, SourceOrdering};
use crate::shared::models::ElementOrdering;

/// Catalog document (YAML/JSON schema)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub pipeline_types: Vec<String>,

    #[serde(default)]
    pub framework_types: Vec<String>,

    #[serde(default)]
    pub framework_prefixes: Vec<String>,

    #[serde(default)]
    pub aggregate_types: Vec<String>,

    #[serde(default)]
    pub terminal_ops: Vec<String>,

    #[serde(default)]
    pub stateful_ops: Vec<String>,

    #[serde(default)]
    pub reduce_order: ReduceOrderConfig,

    #[serde(default)]
    pub attribute_methods: AttributeMethodsConfig,

    #[serde(default)]
    pub parallel_creations: Vec<String>,

    #[serde(default)]
    pub creation_ordering: BTreeMap<String, OrderingWord>,

    #[serde(default)]
    pub sources: BTreeMap<String, SourceConfig>,
}

/// Reduce-order tables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReduceOrderConfig {
    #[serde(default)]
    pub always: Vec<String>,

    #[serde(default)]
    pub never: Vec<String>,
}

/// Attribute-changing method names per transition direction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributeMethodsConfig {
    #[serde(default)]
    pub parallel: Vec<String>,

    #[serde(default)]
    pub sequential: Vec<String>,

    #[serde(default)]
    pub ordered: Vec<String>,

    #[serde(default)]
    pub unordered: Vec<String>,
}

/// Ordering keyword in catalog documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderingWord {
    Ordered,
    Unordered,
}

impl From<OrderingWord> for ElementOrdering {
    fn from(word: OrderingWord) -> Self {
        match word {
            OrderingWord::Ordered => ElementOrdering::Ordered,
            OrderingWord::Unordered => ElementOrdering::Unordered,
        }
    }
}

/// Source capability entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Ordering characteristic; absent means policy decides
    #[serde(default)]
    pub ordering: Option<OrderingWord>,

    #[serde(default = "default_true")]
    pub iterable: bool,

    #[serde(default = "default_true")]
    pub instantiable: bool,
}

fn default_true() -> bool {
    true
}

impl From<&SourceConfig> for SourceCapability {
    fn from(config: &SourceConfig) -> Self {
        SourceCapability {
            ordering: match config.ordering {
                Some(OrderingWord::Ordered) => SourceOrdering::Ordered,
                Some(OrderingWord::Unordered) => SourceOrdering::Unordered,
                None => SourceOrdering::Unknown,
            },
            iterable: config.iterable,
            instantiable: config.instantiable,
        }
    }
}

/// Catalog parser
pub struct CatalogParser;

impl CatalogParser {
    /// Parse a complete catalog from YAML
    ///
    /// The document must declare at least one pipeline type.
    pub fn from_yaml(yaml: &str) -> Result<OperationCatalog> {
        let config: CatalogConfig = serde_yaml::from_str(yaml)?;
        let catalog = Self::apply(OperationCatalog::empty(), &config);
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse a complete catalog from JSON
    pub fn from_json(json: &str) -> Result<OperationCatalog> {
        let config: CatalogConfig = serde_json::from_str(json)
            .map_err(|e| StreamlensError::catalog(format!("JSON parse error: {}", e)))?;
        let catalog = Self::apply(OperationCatalog::empty(), &config);
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse a YAML overlay and apply it on top of a base catalog
    ///
    /// Overlay entries extend the base tables; a source entry for an
    /// existing type replaces it.
    pub fn overlay_yaml(base: &OperationCatalog, yaml: &str) -> Result<OperationCatalog> {
        let config: CatalogConfig = serde_yaml::from_str(yaml)?;
        let catalog = Self::apply(base.clone(), &config);
        catalog.validate()?;
        Ok(catalog)
    }

    fn apply(mut catalog: OperationCatalog, config: &CatalogConfig) -> OperationCatalog {
        catalog
            .pipeline_types
            .extend(config.pipeline_types.iter().cloned());
        catalog
            .framework_types
            .extend(config.framework_types.iter().cloned());
        catalog
            .framework_prefixes
            .extend(config.framework_prefixes.iter().cloned());
        catalog
            .aggregate_types
            .extend(config.aggregate_types.iter().cloned());
        catalog
            .terminal_ops
            .extend(config.terminal_ops.iter().cloned());
        catalog
            .stateful_ops
            .extend(config.stateful_ops.iter().cloned());
        catalog
            .rom_always
            .extend(config.reduce_order.always.iter().cloned());
        catalog
            .rom_never
            .extend(config.reduce_order.never.iter().cloned());
        catalog
            .parallel_methods
            .extend(config.attribute_methods.parallel.iter().cloned());
        catalog
            .sequential_methods
            .extend(config.attribute_methods.sequential.iter().cloned());
        catalog
            .ordered_methods
            .extend(config.attribute_methods.ordered.iter().cloned());
        catalog
            .unordered_methods
            .extend(config.attribute_methods.unordered.iter().cloned());
        catalog
            .parallel_creations
            .extend(config.parallel_creations.iter().cloned());

        for (method, word) in &config.creation_ordering {
            catalog
                .creation_ordering
                .insert(method.clone(), ElementOrdering::from(*word));
        }
        for (ty, source) in &config.sources {
            catalog.sources.insert(ty.clone(), source.into());
        }

        catalog
    }
}
