//! Report assertions shared across the integration tests.

use std::collections::BTreeSet;

use streamlens_core::{AnalysisReport, ElementOrdering, ExecutionMode, FailureKind, InstanceId};

/// Assert the exact possible-execution-mode set of an instance
pub fn assert_modes(report: &AnalysisReport, id: InstanceId, expected: &[ExecutionMode]) {
    let attrs = report
        .get(id)
        .unwrap_or_else(|| panic!("no attributes for {}", id));
    let expected: BTreeSet<ExecutionMode> = expected.iter().copied().collect();
    assert_eq!(
        attrs.possible_execution_modes, expected,
        "execution modes of {}",
        id
    );
}

/// Assert the exact possible-ordering set of an instance
pub fn assert_orderings(report: &AnalysisReport, id: InstanceId, expected: &[ElementOrdering]) {
    let attrs = report
        .get(id)
        .unwrap_or_else(|| panic!("no attributes for {}", id));
    let expected: BTreeSet<ElementOrdering> = expected.iter().copied().collect();
    assert_eq!(attrs.possible_orderings, expected, "orderings of {}", id);
}

/// Assert the instance carries at least one finding of the given kind
pub fn assert_finding(report: &AnalysisReport, id: InstanceId, kind: FailureKind) {
    let attrs = report
        .get(id)
        .unwrap_or_else(|| panic!("no attributes for {}", id));
    assert!(
        attrs.diagnostics.iter().any(|d| d.kind == kind),
        "expected a {:?} finding on {}, got {:?}",
        kind,
        id,
        attrs.diagnostics
    );
}

/// Assert the instance carries no findings at all
pub fn assert_no_findings(report: &AnalysisReport, id: InstanceId) {
    let attrs = report
        .get(id)
        .unwrap_or_else(|| panic!("no attributes for {}", id));
    assert!(
        attrs.diagnostics.is_empty(),
        "unexpected findings on {}: {:?}",
        id,
        attrs.diagnostics
    );
}
