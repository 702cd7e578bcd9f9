/*
 * Declaration-Derived Defaults
 *
 * Computes, once per instance, the execution-mode and ordering defaults from
 * the syntactic form of the creation expression, independent of any dynamic
 * evidence. The merged dynamic result set falls back to these values when it
 * is empty at a consuming point.
 *
 * Ordering resolution order:
 * 1. fixed ordering of the creation method (factory table)
 * 2. capability table entries for the possible source types
 * 3. policy fallback (conservative ordered, or a diagnostic under Strict)
 */

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::features::catalog::domain::{OperationCatalog, SourceOrdering};
use crate::shared::models::{CreationSite, ElementOrdering, ExecutionMode, FailureKind};

/// Policy for source types the capability table does not determine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourcePolicy {
    /// Fall back to ordered without a finding
    #[default]
    ConservativeOrdered,

    /// Record a finding and still fall back to ordered
    Strict,
}

/// Result of default inference for one creation site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultInference {
    /// Execution-mode default
    pub execution: ExecutionMode,

    /// Ordering default
    pub ordering: ElementOrdering,

    /// Findings to record on the instance (kind + message)
    pub findings: Vec<(FailureKind, String)>,
}

/// Infer declaration-derived defaults for a creation site
pub fn infer_defaults(
    creation: &CreationSite,
    catalog: &OperationCatalog,
    policy: SourcePolicy,
) -> DefaultInference {
    let method = creation.expression.method.as_str();
    let execution = catalog.execution_default(method);
    let mut findings = Vec::new();

    // Factory methods with a fixed ordering short-circuit the source lookup.
    if let Some(ordering) = catalog.creation_ordering(method) {
        return DefaultInference {
            execution,
            ordering,
            findings,
        };
    }

    let mut saw_ordered = false;
    let mut saw_unordered = false;

    for ty in creation.source_types() {
        match catalog.sources.lookup(ty) {
            Some(cap) => {
                if !cap.iterable {
                    findings.push((
                        FailureKind::NonIterableSource,
                        format!("source type '{}' cannot be iterated", ty),
                    ));
                    continue;
                }
                if !cap.instantiable {
                    findings.push((
                        FailureKind::NonInstantiableSource,
                        format!("source type '{}' cannot be instantiated", ty),
                    ));
                }
                match cap.ordering {
                    SourceOrdering::Ordered => saw_ordered = true,
                    SourceOrdering::Unordered => saw_unordered = true,
                    SourceOrdering::Unknown => {
                        if policy == SourcePolicy::Strict {
                            findings.push((
                                FailureKind::CannotExtractIterationProtocol,
                                format!("no ordering characteristic declared for '{}'", ty),
                            ));
                        } else {
                            saw_ordered = true;
                        }
                    }
                }
            }
            None => {
                if policy == SourcePolicy::Strict {
                    findings.push((
                        FailureKind::CannotExtractIterationProtocol,
                        format!("source type '{}' is not in the capability table", ty),
                    ));
                } else {
                    debug!(source_type = ty, "unknown source type, assuming ordered");
                    saw_ordered = true;
                }
            }
        }
    }

    let ordering = match (saw_ordered, saw_unordered) {
        (true, false) => ElementOrdering::Ordered,
        (false, true) => ElementOrdering::Unordered,
        (true, true) => {
            findings.push((
                FailureKind::InconsistentAttribute,
                format!(
                    "possible source types of {} disagree on ordering",
                    creation.expression
                ),
            ));
            ElementOrdering::Ordered
        }
        // No evidence at all: receiver-less creation outside the factory
        // table, or every source type was non-iterable.
        (false, false) => {
            if policy == SourcePolicy::Strict && findings.is_empty() {
                findings.push((
                    FailureKind::CannotExtractIterationProtocol,
                    format!("no ordering evidence for {}", creation.expression),
                ));
            }
            ElementOrdering::Ordered
        }
    };

    DefaultInference {
        execution,
        ordering,
        findings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::catalog::domain::{SourceCapability, SourceTable};
    use crate::shared::models::{CallSiteId, CreationExpr, ProcedureId};

    fn catalog() -> OperationCatalog {
        let mut catalog = OperationCatalog::empty();
        catalog.pipeline_types.insert("Stream".to_string());
        catalog.parallel_creations.insert("parallelStream".to_string());
        catalog
            .creation_ordering
            .insert("of".to_string(), ElementOrdering::Ordered);
        catalog
            .creation_ordering
            .insert("generate".to_string(), ElementOrdering::Unordered);
        catalog.sources = SourceTable::new()
            .with("ArrayList", SourceCapability::ordered())
            .with("HashSet", SourceCapability::unordered())
            .with("Blob", SourceCapability::non_iterable());
        catalog
    }

    fn site(expr: CreationExpr) -> CreationSite {
        CreationSite::new(CallSiteId(1), ProcedureId(0), "Stream", expr)
    }

    #[test]
    fn test_ordered_collection_source() {
        let inferred = infer_defaults(
            &site(CreationExpr::on_receiver("ArrayList", "stream")),
            &catalog(),
            SourcePolicy::default(),
        );
        assert_eq!(inferred.execution, ExecutionMode::Sequential);
        assert_eq!(inferred.ordering, ElementOrdering::Ordered);
        assert!(inferred.findings.is_empty());
    }

    #[test]
    fn test_parallel_creation_on_unordered_source() {
        let inferred = infer_defaults(
            &site(CreationExpr::on_receiver("HashSet", "parallelStream")),
            &catalog(),
            SourcePolicy::default(),
        );
        assert_eq!(inferred.execution, ExecutionMode::Parallel);
        assert_eq!(inferred.ordering, ElementOrdering::Unordered);
    }

    #[test]
    fn test_factory_ordering_short_circuits() {
        let inferred = infer_defaults(
            &site(CreationExpr::factory("generate")),
            &catalog(),
            SourcePolicy::Strict,
        );
        assert_eq!(inferred.ordering, ElementOrdering::Unordered);
        assert!(inferred.findings.is_empty());
    }

    #[test]
    fn test_non_iterable_source_finding() {
        let inferred = infer_defaults(
            &site(CreationExpr::on_receiver("Blob", "stream")),
            &catalog(),
            SourcePolicy::default(),
        );
        assert_eq!(inferred.ordering, ElementOrdering::Ordered);
        assert_eq!(inferred.findings.len(), 1);
        assert_eq!(inferred.findings[0].0, FailureKind::NonIterableSource);
    }

    #[test]
    fn test_unknown_source_conservative_vs_strict() {
        let unknown = site(CreationExpr::on_receiver("Widget", "stream"));

        let lenient = infer_defaults(&unknown, &catalog(), SourcePolicy::ConservativeOrdered);
        assert_eq!(lenient.ordering, ElementOrdering::Ordered);
        assert!(lenient.findings.is_empty());

        let strict = infer_defaults(&unknown, &catalog(), SourcePolicy::Strict);
        assert_eq!(strict.ordering, ElementOrdering::Ordered);
        assert_eq!(
            strict.findings[0].0,
            FailureKind::CannotExtractIterationProtocol
        );
    }

    #[test]
    fn test_disagreeing_sources_are_inconsistent() {
        let creation = site(CreationExpr::on_receiver("ArrayList", "stream"))
            .with_source_type("ArrayList")
            .with_source_type("HashSet");

        let inferred = infer_defaults(&creation, &catalog(), SourcePolicy::default());
        assert_eq!(inferred.ordering, ElementOrdering::Ordered);
        assert!(inferred
            .findings
            .iter()
            .any(|(k, _)| *k == FailureKind::InconsistentAttribute));
    }

    #[test]
    fn test_non_instantiable_source_finding() {
        let mut cat = catalog();
        cat.sources
            .insert("List", SourceCapability::ordered().non_instantiable());

        let inferred = infer_defaults(
            &site(CreationExpr::on_receiver("List", "stream")),
            &cat,
            SourcePolicy::default(),
        );
        // Ordering is still usable; the finding records ineligibility.
        assert_eq!(inferred.ordering, ElementOrdering::Ordered);
        assert_eq!(inferred.findings[0].0, FailureKind::NonInstantiableSource);
    }
}
