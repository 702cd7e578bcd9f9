/*
 * Table Oracle
 *
 * In-memory AnalysisOracle backed by explicit fact tables. Integration tests
 * and embedders that already hold call-graph facts populate it directly;
 * nothing is computed, every query is a table lookup.
 */

use rustc_hash::{FxHashMap, FxHashSet};

use crate::features::oracle::ports::{AnalysisOracle, InstanceFacts, ValueRef};
use crate::shared::models::{
    CallSite, CallSiteId, ContextId, InstanceId, Location, ProcedureId, ProcedureInfo,
};

const NO_SITES: &[CallSiteId] = &[];
const NO_LOCATIONS: &[Location] = &[];

/// AnalysisOracle implementation over explicit tables
#[derive(Debug, Clone, Default)]
pub struct TableOracle {
    points_to: FxHashMap<(ValueRef, ContextId), FxHashSet<InstanceId>>,
    call_sites: FxHashMap<CallSiteId, CallSite>,
    sites_by_procedure: FxHashMap<ProcedureId, Vec<CallSiteId>>,
    targets: FxHashMap<(CallSiteId, ContextId), FxHashSet<ProcedureId>>,
    behavioral: FxHashMap<(CallSiteId, usize, ContextId), FxHashSet<ProcedureId>>,
    predecessors: FxHashMap<ProcedureId, FxHashSet<ProcedureId>>,
    modifications: FxHashMap<ProcedureId, Vec<Location>>,
    procedures: FxHashMap<ProcedureId, ProcedureInfo>,
    instances: FxHashMap<InstanceId, InstanceFacts>,
}

impl TableOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a procedure
    pub fn add_procedure(&mut self, info: ProcedureInfo) {
        self.sites_by_procedure.entry(info.id).or_default();
        self.procedures.insert(info.id, info);
    }

    /// Register a call site; sites keep insertion order per procedure
    pub fn add_call_site(&mut self, site: CallSite) {
        self.sites_by_procedure
            .entry(site.procedure)
            .or_default()
            .push(site.id);
        self.call_sites.insert(site.id, site);
    }

    /// Record a points-to edge
    pub fn add_points_to(
        &mut self,
        value: ValueRef,
        context: ContextId,
        instances: impl IntoIterator<Item = InstanceId>,
    ) {
        self.points_to
            .entry((value, context))
            .or_default()
            .extend(instances);
    }

    /// Record dispatch targets for a call
    pub fn add_targets(
        &mut self,
        site: CallSiteId,
        context: ContextId,
        procedures: impl IntoIterator<Item = ProcedureId>,
    ) {
        self.targets
            .entry((site, context))
            .or_default()
            .extend(procedures);
    }

    /// Record the entry procedures of a behavioral argument
    pub fn add_behavioral_targets(
        &mut self,
        site: CallSiteId,
        arg: usize,
        context: ContextId,
        procedures: impl IntoIterator<Item = ProcedureId>,
    ) {
        self.behavioral
            .entry((site, arg, context))
            .or_default()
            .extend(procedures);
    }

    /// Record a caller edge
    pub fn add_predecessor(&mut self, procedure: ProcedureId, caller: ProcedureId) {
        self.predecessors
            .entry(procedure)
            .or_default()
            .insert(caller);
    }

    /// Record a heap location a procedure may write
    pub fn add_modification(&mut self, procedure: ProcedureId, location: Location) {
        self.modifications
            .entry(procedure)
            .or_default()
            .push(location);
    }

    /// Register a tracked instance
    pub fn add_instance(&mut self, facts: InstanceFacts) {
        self.instances.insert(facts.id, facts);
    }
}

impl AnalysisOracle for TableOracle {
    fn points_to(&self, value: ValueRef, context: ContextId) -> FxHashSet<InstanceId> {
        self.points_to
            .get(&(value, context))
            .cloned()
            .unwrap_or_default()
    }

    fn call_sites_of(&self, procedure: ProcedureId) -> &[CallSiteId] {
        self.sites_by_procedure
            .get(&procedure)
            .map(Vec::as_slice)
            .unwrap_or(NO_SITES)
    }

    fn call_site(&self, site: CallSiteId) -> Option<&CallSite> {
        self.call_sites.get(&site)
    }

    fn possible_targets(&self, site: CallSiteId, context: ContextId) -> FxHashSet<ProcedureId> {
        self.targets
            .get(&(site, context))
            .cloned()
            .unwrap_or_default()
    }

    fn behavioral_targets(
        &self,
        site: CallSiteId,
        arg: usize,
        context: ContextId,
    ) -> FxHashSet<ProcedureId> {
        self.behavioral
            .get(&(site, arg, context))
            .cloned()
            .unwrap_or_default()
    }

    fn predecessors(&self, procedure: ProcedureId) -> FxHashSet<ProcedureId> {
        self.predecessors
            .get(&procedure)
            .cloned()
            .unwrap_or_default()
    }

    fn modification_set(&self, procedure: ProcedureId) -> &[Location] {
        self.modifications
            .get(&procedure)
            .map(Vec::as_slice)
            .unwrap_or(NO_LOCATIONS)
    }

    fn procedures(&self) -> Vec<ProcedureId> {
        let mut ids: Vec<ProcedureId> = self.procedures.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn procedure(&self, id: ProcedureId) -> Option<&ProcedureInfo> {
        self.procedures.get(&id)
    }

    fn instance(&self, id: InstanceId) -> Option<&InstanceFacts> {
        self.instances.get(&id)
    }

    fn instances(&self) -> Vec<InstanceId> {
        let mut ids: Vec<InstanceId> = self.instances.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
