/*
 * Reduce-Order-Matters Classifier
 *
 * Decides, per terminal invocation, whether the order in which elements are
 * combined can change the result. Void and scalar terminal operations are
 * classified by the catalog's two disjoint tables; a scalar operation covered
 * by neither is flagged as unknown. Non-scalar operations carry their
 * sensitivity in the supplied combiner, so the verdict defers to the ordering
 * inferred for the call's possible result values, falling back to the
 * source-capability table for result types the oracle does not track.
 * Inconsistent or missing ordering evidence resolves to "matters".
 */

use rustc_hash::FxHashSet;
use std::collections::BTreeSet;
use tracing::debug;

use crate::features::automata::domain::{AttributeValue, AutomatonState};
use crate::features::catalog::domain::{OperationCatalog, ReturnCategory};
use crate::features::chain::application::MergeEngine;
use crate::features::oracle::ports::{AnalysisOracle, ValueRef};
use crate::features::reachability::domain::TerminalInvocation;
use crate::shared::models::{Diagnostic, ElementOrdering, FailureKind, InstanceId};

/// Outcome of the reduce-order classification
#[derive(Debug, Default)]
pub struct ReduceOrderReport {
    /// Instances whose terminal call is order-sensitive
    pub flagged: FxHashSet<InstanceId>,

    /// One finding per receiver of an uncovered scalar terminal call
    pub diagnostics: Vec<Diagnostic>,
}

pub struct ReduceOrderClassifier<'a> {
    oracle: &'a dyn AnalysisOracle,
    catalog: &'a OperationCatalog,
}

impl<'a> ReduceOrderClassifier<'a> {
    pub fn new(oracle: &'a dyn AnalysisOracle, catalog: &'a OperationCatalog) -> Self {
        Self { oracle, catalog }
    }

    /// Classify every terminal invocation
    ///
    /// `ordering_merge` must be built over the ordering fact table; it
    /// resolves the inferred ordering of tracked result values.
    pub fn classify(
        &self,
        invocations: &[TerminalInvocation],
        ordering_merge: &MergeEngine<'_>,
    ) -> ReduceOrderReport {
        let mut report = ReduceOrderReport::default();

        for invocation in invocations {
            let category = self
                .catalog
                .return_category(invocation.return_type.as_deref());
            match category {
                ReturnCategory::Void | ReturnCategory::Scalar => {
                    self.classify_tabled(invocation, category, &mut report);
                }
                ReturnCategory::NonScalar => {
                    if self.result_ordering_matters(invocation, ordering_merge) {
                        report.flagged.extend(invocation.receivers.iter().copied());
                    }
                }
            }
        }

        debug!(
            flagged = report.flagged.len(),
            findings = report.diagnostics.len(),
            "reduce-order classification complete"
        );
        report
    }

    fn classify_tabled(
        &self,
        invocation: &TerminalInvocation,
        category: ReturnCategory,
        report: &mut ReduceOrderReport,
    ) {
        match self.catalog.reduce_order(&invocation.method) {
            Some(true) => {
                report.flagged.extend(invocation.receivers.iter().copied());
            }
            Some(false) => {}
            None => {
                // Uncovered void operations cannot observe combine order
                if category != ReturnCategory::Scalar {
                    return;
                }
                for &receiver in &invocation.receivers {
                    report.diagnostics.push(
                        Diagnostic::new(
                            FailureKind::UnknownReduceOrderSemantics,
                            receiver,
                            format!("no reduce-order entry for scalar terminal '{}'", invocation.method),
                        )
                        .at(invocation.point),
                    );
                }
            }
        }
    }

    /// Ordering verdict for a non-scalar terminal call
    fn result_ordering_matters(
        &self,
        invocation: &TerminalInvocation,
        ordering_merge: &MergeEngine<'_>,
    ) -> bool {
        let results = self
            .oracle
            .points_to(ValueRef::Result(invocation.point.site), invocation.point.context);

        let mut verdicts: Vec<Option<ElementOrdering>> = Vec::new();
        for id in &results {
            verdicts.push(match self.oracle.instance(*id) {
                Some(_) => resolve_ordering(&ordering_merge.merged_at(*id, invocation.point)),
                // Untracked result object: judge by its declared type
                None => self.declared_ordering(invocation.return_type.as_deref()),
            });
        }
        if results.is_empty() {
            verdicts.push(self.declared_ordering(invocation.return_type.as_deref()));
        }

        // Any ordered or undetermined result keeps the conservative verdict
        verdicts
            .iter()
            .any(|v| !matches!(v, Some(ElementOrdering::Unordered)))
    }

    fn declared_ordering(&self, return_type: Option<&str>) -> Option<ElementOrdering> {
        return_type
            .and_then(|ty| self.catalog.sources.lookup(ty))
            .and_then(|capability| capability.ordering.as_element_ordering())
    }
}

/// Collapse a merged ordering state set to a single verdict
///
/// Inconsistent evidence (both orderings reachable) resolves to ordered;
/// bottom-only or empty sets resolve to none.
fn resolve_ordering(states: &BTreeSet<AutomatonState>) -> Option<ElementOrdering> {
    let mut ordered = false;
    let mut unordered = false;
    for state in states {
        if let Some(AttributeValue::Ordering(o)) = state.value() {
            match o {
                ElementOrdering::Ordered => ordered = true,
                ElementOrdering::Unordered => unordered = true,
            }
        }
    }
    match (ordered, unordered) {
        (true, _) => Some(ElementOrdering::Ordered),
        (false, true) => Some(ElementOrdering::Unordered),
        (false, false) => None,
    }
}
