/*
 * Operation Catalog
 *
 * Static signature tables for the analyzed pipeline API:
 * - terminal (consuming) operations
 * - stateful intermediate operations
 * - reduce-order "always matters" / "never matters" tables
 * - pipeline/framework type sets
 * - automaton trigger methods and creation defaults
 *
 * The catalog is configuration data, not code: a built-in table ships with the
 * crate and YAML files can replace or extend it. All lookups are O(1) hash
 * probes.
 */

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::{Result, StreamlensError};
use crate::shared::models::{ElementOrdering, ExecutionMode};

use super::sources::SourceTable;

/// Static return-type category of a terminal operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReturnCategory {
    /// No value is produced
    Void,

    /// Primitive or non-iterable reference result
    Scalar,

    /// Iterable or aggregate reference result
    NonScalar,
}

impl std::fmt::Display for ReturnCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReturnCategory::Void => write!(f, "void"),
            ReturnCategory::Scalar => write!(f, "scalar"),
            ReturnCategory::NonScalar => write!(f, "non-scalar"),
        }
    }
}

/// Operation catalog for one pipeline API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationCatalog {
    /// Types that are pipelines themselves
    pub pipeline_types: FxHashSet<String>,

    /// Framework-internal types whose mutations are not observable effects
    pub framework_types: FxHashSet<String>,

    /// Name prefixes marking framework-internal types
    pub framework_prefixes: Vec<String>,

    /// Aggregate/iterable result types (non-scalar terminal results)
    pub aggregate_types: FxHashSet<String>,

    /// Terminal (consuming) operation names
    pub terminal_ops: FxHashSet<String>,

    /// Stateful intermediate operation names
    pub stateful_ops: FxHashSet<String>,

    /// Void/scalar terminal operations whose result depends on combine order
    pub rom_always: FxHashSet<String>,

    /// Void/scalar terminal operations insensitive to combine order
    pub rom_never: FxHashSet<String>,

    /// Methods that switch a pipeline to parallel execution
    pub parallel_methods: FxHashSet<String>,

    /// Methods that switch a pipeline to sequential execution
    pub sequential_methods: FxHashSet<String>,

    /// Methods that impose an encounter order
    pub ordered_methods: FxHashSet<String>,

    /// Methods that discard the encounter order
    pub unordered_methods: FxHashSet<String>,

    /// Creation methods producing a parallel pipeline by default
    pub parallel_creations: FxHashSet<String>,

    /// Receiver-less creation methods with a fixed ordering default
    pub creation_ordering: BTreeMap<String, ElementOrdering>,

    /// Source-type capability table (declaration-derived ordering defaults)
    pub sources: SourceTable,
}

impl OperationCatalog {
    /// Empty catalog (tests and overlays start here)
    pub fn empty() -> Self {
        Self {
            pipeline_types: FxHashSet::default(),
            framework_types: FxHashSet::default(),
            framework_prefixes: Vec::new(),
            aggregate_types: FxHashSet::default(),
            terminal_ops: FxHashSet::default(),
            stateful_ops: FxHashSet::default(),
            rom_always: FxHashSet::default(),
            rom_never: FxHashSet::default(),
            parallel_methods: FxHashSet::default(),
            sequential_methods: FxHashSet::default(),
            ordered_methods: FxHashSet::default(),
            unordered_methods: FxHashSet::default(),
            parallel_creations: FxHashSet::default(),
            creation_ordering: BTreeMap::new(),
            sources: SourceTable::new(),
        }
    }

    /// Whether `ty` is a pipeline type
    #[inline]
    pub fn is_pipeline_type(&self, ty: &str) -> bool {
        self.pipeline_types.contains(ty)
    }

    /// Whether `ty` is framework-internal (pipeline machinery included)
    pub fn is_framework_internal(&self, ty: &str) -> bool {
        self.is_pipeline_type(ty)
            || self.framework_types.contains(ty)
            || self.framework_prefixes.iter().any(|p| ty.starts_with(p))
    }

    /// Whether `method` is a terminal (consuming) operation
    #[inline]
    pub fn is_terminal(&self, method: &str) -> bool {
        self.terminal_ops.contains(method)
    }

    /// Whether `method` is a stateful intermediate operation
    #[inline]
    pub fn is_stateful(&self, method: &str) -> bool {
        self.stateful_ops.contains(method)
    }

    /// Reduce-order verdict for a void/scalar terminal operation
    ///
    /// Returns `Some(true)` when order always matters, `Some(false)` when it
    /// never does, and `None` when neither table covers the operation.
    pub fn reduce_order(&self, method: &str) -> Option<bool> {
        if self.rom_always.contains(method) {
            Some(true)
        } else if self.rom_never.contains(method) {
            Some(false)
        } else {
            None
        }
    }

    /// Static return-type category for a terminal call
    pub fn return_category(&self, return_type: Option<&str>) -> ReturnCategory {
        match return_type {
            None => ReturnCategory::Void,
            Some(ty) => {
                if ty.ends_with("[]")
                    || self.is_pipeline_type(ty)
                    || self.aggregate_types.contains(ty)
                {
                    ReturnCategory::NonScalar
                } else {
                    ReturnCategory::Scalar
                }
            }
        }
    }

    /// Declaration-derived execution default for a creation method
    pub fn execution_default(&self, creation_method: &str) -> ExecutionMode {
        if self.parallel_creations.contains(creation_method) {
            ExecutionMode::Parallel
        } else {
            ExecutionMode::Sequential
        }
    }

    /// Fixed ordering default for a receiver-less creation method, if any
    pub fn creation_ordering(&self, creation_method: &str) -> Option<ElementOrdering> {
        self.creation_ordering.get(creation_method).copied()
    }

    /// YAML rendering of the complete catalog state
    ///
    /// Round-trips through `serde_yaml`; this is a state dump, not the
    /// overlay format the parser accepts.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validate table consistency
    ///
    /// Checks:
    /// - the reduce-order tables are disjoint
    /// - every stateful operation is not also terminal
    /// - at least one pipeline type is declared
    pub fn validate(&self) -> Result<()> {
        if let Some(dup) = self.rom_always.intersection(&self.rom_never).next() {
            return Err(StreamlensError::catalog(format!(
                "'{}' appears in both reduce-order tables",
                dup
            )));
        }
        if let Some(dup) = self.stateful_ops.intersection(&self.terminal_ops).next() {
            return Err(StreamlensError::catalog(format!(
                "'{}' is both a stateful intermediate and a terminal operation",
                dup
            )));
        }
        if self.pipeline_types.is_empty() {
            return Err(StreamlensError::catalog("no pipeline types declared"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_catalog() -> OperationCatalog {
        let mut catalog = OperationCatalog::empty();
        catalog.pipeline_types.insert("Stream".to_string());
        catalog.framework_prefixes.push("stream.internal.".to_string());
        catalog.aggregate_types.insert("List".to_string());
        catalog.terminal_ops.insert("collect".to_string());
        catalog.terminal_ops.insert("count".to_string());
        catalog.stateful_ops.insert("distinct".to_string());
        catalog.rom_always.insert("findFirst".to_string());
        catalog.rom_never.insert("count".to_string());
        catalog.parallel_creations.insert("parallelStream".to_string());
        catalog
            .creation_ordering
            .insert("of".to_string(), ElementOrdering::Ordered);
        catalog
    }

    #[test]
    fn test_lookups() {
        let catalog = small_catalog();
        assert!(catalog.is_pipeline_type("Stream"));
        assert!(!catalog.is_pipeline_type("List"));
        assert!(catalog.is_terminal("collect"));
        assert!(catalog.is_stateful("distinct"));
        assert!(!catalog.is_stateful("map"));
    }

    #[test]
    fn test_framework_internal() {
        let catalog = small_catalog();
        assert!(catalog.is_framework_internal("Stream"));
        assert!(catalog.is_framework_internal("stream.internal.Spined"));
        assert!(!catalog.is_framework_internal("Widget"));
    }

    #[test]
    fn test_reduce_order_tables() {
        let catalog = small_catalog();
        assert_eq!(catalog.reduce_order("findFirst"), Some(true));
        assert_eq!(catalog.reduce_order("count"), Some(false));
        assert_eq!(catalog.reduce_order("mystery"), None);
    }

    #[test]
    fn test_return_category() {
        let catalog = small_catalog();
        assert_eq!(catalog.return_category(None), ReturnCategory::Void);
        assert_eq!(catalog.return_category(Some("long")), ReturnCategory::Scalar);
        assert_eq!(catalog.return_category(Some("List")), ReturnCategory::NonScalar);
        assert_eq!(catalog.return_category(Some("int[]")), ReturnCategory::NonScalar);
        assert_eq!(catalog.return_category(Some("Stream")), ReturnCategory::NonScalar);
    }

    #[test]
    fn test_creation_defaults() {
        let catalog = small_catalog();
        assert_eq!(
            catalog.execution_default("parallelStream"),
            ExecutionMode::Parallel
        );
        assert_eq!(catalog.execution_default("stream"), ExecutionMode::Sequential);
        assert_eq!(catalog.creation_ordering("of"), Some(ElementOrdering::Ordered));
        assert_eq!(catalog.creation_ordering("stream"), None);
    }

    #[test]
    fn test_validate_rejects_overlapping_rom_tables() {
        let mut catalog = small_catalog();
        catalog.rom_never.insert("findFirst".to_string());
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_validate_requires_pipeline_types() {
        let catalog = OperationCatalog::empty();
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_validate_ok() {
        assert!(small_catalog().validate().is_ok());
    }

    #[test]
    fn test_yaml_state_dump_round_trips() {
        let catalog = small_catalog();
        let yaml = catalog.to_yaml().unwrap();
        let parsed: OperationCatalog = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(parsed.terminal_ops, catalog.terminal_ops);
        assert_eq!(parsed.creation_ordering, catalog.creation_ordering);
        assert!(parsed.is_stateful("distinct"));
    }
}
