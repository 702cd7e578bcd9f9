/*
 * Built-in Operation Catalog
 *
 * Signature tables for the standard stream API surface:
 * - pipeline and framework type names
 * - terminal and stateful-intermediate operation names
 * - reduce-order semantics for void/scalar terminals
 * - attribute-changing method names (parallel/sequential, sorted/unordered)
 * - creation factories with a fixed ordering
 * - source-type capability table (ordering, iterability)
 *
 * The catalog is usable out-of-the-box and can be overlaid from YAML.
 */

use once_cell::sync::Lazy;

use crate::features::catalog::domain::{OperationCatalog, SourceCapability, SourceTable};
use crate::shared::models::ElementOrdering;

static BUILT_IN: Lazy<OperationCatalog> = Lazy::new(BuiltInCatalog::define);

/// Built-in catalog definition
///
/// # Example
/// ```ignore
/// let catalog = BuiltInCatalog::get();
/// assert!(catalog.is_terminal("collect"));
/// assert!(catalog.is_stateful("sorted"));
/// assert_eq!(catalog.reduce_order("forEachOrdered"), Some(true));
/// ```
pub struct BuiltInCatalog;

impl BuiltInCatalog {
    /// Shared built-in catalog, constructed once
    pub fn get() -> &'static OperationCatalog {
        &BUILT_IN
    }

    /// Define the built-in catalog from scratch
    pub fn define() -> OperationCatalog {
        let mut catalog = OperationCatalog::empty();

        // Pipeline types
        for ty in ["Stream", "IntStream", "LongStream", "DoubleStream", "BaseStream"] {
            catalog.pipeline_types.insert(ty.to_string());
        }

        // Framework machinery; modifications inside these do not count as
        // client side effects.
        for ty in [
            "Collector",
            "Collectors",
            "StreamSupport",
            "Spliterator",
            "Spliterators",
            "AbstractPipeline",
            "ReferencePipeline",
            "IntPipeline",
            "LongPipeline",
            "DoublePipeline",
            "Nodes",
            "ReduceOps",
            "ForEachOps",
            "Sink",
        ] {
            catalog.framework_types.insert(ty.to_string());
        }
        catalog.framework_prefixes.push("java.util.stream".to_string());

        // Non-scalar return types beyond pipelines and arrays
        for ty in [
            "List",
            "Set",
            "Map",
            "Collection",
            "ArrayList",
            "LinkedList",
            "HashSet",
            "TreeSet",
            "LinkedHashSet",
            "HashMap",
            "TreeMap",
            "LinkedHashMap",
            "Deque",
            "Queue",
            "Iterator",
            "Spliterator",
        ] {
            catalog.aggregate_types.insert(ty.to_string());
        }

        // Terminal operations
        for op in [
            "forEach",
            "forEachOrdered",
            "toArray",
            "reduce",
            "collect",
            "min",
            "max",
            "count",
            "anyMatch",
            "allMatch",
            "noneMatch",
            "findFirst",
            "findAny",
            "sum",
            "average",
            "iterator",
            "spliterator",
            "toList",
        ] {
            catalog.terminal_ops.insert(op.to_string());
        }

        // Stateful intermediate operations
        for op in ["distinct", "sorted", "limit", "skip"] {
            catalog.stateful_ops.insert(op.to_string());
        }

        // Reduce-order semantics for void/scalar terminals. Operations in
        // neither table (reduce, collect) are reported as unknown.
        for op in ["forEachOrdered", "findFirst"] {
            catalog.rom_always.insert(op.to_string());
        }
        for op in [
            "forEach",
            "findAny",
            "count",
            "sum",
            "average",
            "min",
            "max",
            "anyMatch",
            "allMatch",
            "noneMatch",
        ] {
            catalog.rom_never.insert(op.to_string());
        }

        // Attribute-changing intermediates
        catalog.parallel_methods.insert("parallel".to_string());
        catalog.sequential_methods.insert("sequential".to_string());
        catalog.ordered_methods.insert("sorted".to_string());
        catalog.unordered_methods.insert("unordered".to_string());

        // Creation methods that start parallel
        catalog.parallel_creations.insert("parallelStream".to_string());

        // Factory methods with a fixed ordering, regardless of arguments
        for method in ["of", "iterate", "range", "rangeClosed", "empty", "chars"] {
            catalog
                .creation_ordering
                .insert(method.to_string(), ElementOrdering::Ordered);
        }
        for method in ["generate", "ints", "longs", "doubles"] {
            catalog
                .creation_ordering
                .insert(method.to_string(), ElementOrdering::Unordered);
        }

        catalog.sources = Self::define_sources();
        catalog
    }

    /// Capability table for common source types
    fn define_sources() -> SourceTable {
        let mut sources = SourceTable::new();

        // Encounter-ordered sources
        for ty in [
            "ArrayList",
            "LinkedList",
            "List",
            "Vector",
            "Stack",
            "ArrayDeque",
            "Deque",
            "Queue",
            "TreeSet",
            "LinkedHashSet",
            "SortedSet",
            "NavigableSet",
            "EnumSet",
            "CopyOnWriteArrayList",
            "Arrays",
        ] {
            sources.insert(ty, SourceCapability::ordered());
        }

        // Sources with no encounter order
        for ty in ["HashSet", "PriorityQueue"] {
            sources.insert(ty, SourceCapability::unordered());
        }

        // Iteration order depends on the implementation behind the interface
        for ty in ["Collection", "Iterable", "Set"] {
            sources.insert(ty, SourceCapability::unspecified());
        }

        // Maps do not expose element iteration directly
        for ty in [
            "HashMap",
            "TreeMap",
            "LinkedHashMap",
            "Map",
            "ConcurrentHashMap",
            "Hashtable",
        ] {
            sources.insert(ty, SourceCapability::non_iterable());
        }

        sources
    }
}
