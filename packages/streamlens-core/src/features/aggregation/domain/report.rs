/*
 * Inferred Attribute Report
 *
 * The externally exposed result vocabulary. Everything upstream of this file
 * speaks automaton states; the aggregator converts to attribute values once,
 * here, and nothing downstream converts back.
 */

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::errors::Result;
use crate::shared::models::{CallSiteId, Diagnostic, ElementOrdering, ExecutionMode, InstanceId};

/// Inferred attributes of one pipeline instance
///
/// The possible-sets are unions over every consuming point; a set with more
/// than one element means different executions may observe different values.
/// Empty sets mean the instance was not aggregated (see its diagnostics).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamAttributes {
    /// Execution modes the pipeline may run under
    pub possible_execution_modes: BTreeSet<ExecutionMode>,

    /// Element orderings the pipeline may observe
    pub possible_orderings: BTreeSet<ElementOrdering>,

    /// A behavioral argument may write observable state
    pub has_possible_side_effects: bool,

    /// The chain may contain a stateful intermediate operation
    pub has_possible_stateful_intermediate_op: bool,

    /// The consuming call's result may depend on combine order
    pub reduce_order_possibly_matters: bool,

    /// Findings recorded for this instance
    pub diagnostics: Vec<Diagnostic>,
}

impl StreamAttributes {
    /// Whether attribute aggregation was performed for the instance
    pub fn is_aggregated(&self) -> bool {
        !self.possible_execution_modes.is_empty() || !self.possible_orderings.is_empty()
    }

    /// Whether any finding makes the instance ineligible
    pub fn has_findings(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Union another instance's attributes into this one
    ///
    /// Used for the per-site view, where several instances may be attributed
    /// to the same creation site.
    pub fn absorb(&mut self, other: &StreamAttributes) {
        self.possible_execution_modes
            .extend(other.possible_execution_modes.iter().copied());
        self.possible_orderings
            .extend(other.possible_orderings.iter().copied());
        self.has_possible_side_effects |= other.has_possible_side_effects;
        self.has_possible_stateful_intermediate_op |= other.has_possible_stateful_intermediate_op;
        self.reduce_order_possibly_matters |= other.reduce_order_possibly_matters;
        self.diagnostics.extend(other.diagnostics.iter().cloned());
    }
}

/// Results of one analysis run
///
/// `instances` is the primary view. `sites` unions the attributes of every
/// instance attributed to the same creation site, which is the granularity
/// external checkers consume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Results keyed by instance, in instance order
    pub instances: BTreeMap<InstanceId, StreamAttributes>,

    /// Results keyed by creation site
    pub sites: BTreeMap<CallSiteId, StreamAttributes>,
}

impl AnalysisReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Result for one instance
    pub fn get(&self, instance: InstanceId) -> Option<&StreamAttributes> {
        self.instances.get(&instance)
    }

    /// Unioned result for one creation site
    pub fn at_site(&self, site: CallSiteId) -> Option<&StreamAttributes> {
        self.sites.get(&site)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// All findings across instances, in instance order
    pub fn all_diagnostics(&self) -> Vec<&Diagnostic> {
        self.instances
            .values()
            .flat_map(|attrs| attrs.diagnostics.iter())
            .collect()
    }

    /// Pretty-printed JSON rendering of the report
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
