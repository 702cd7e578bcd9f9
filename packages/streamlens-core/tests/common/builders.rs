//! Oracle program builder
//!
//! Assembles `TableOracle` fixtures the way client code chains pipelines:
//! sources, derived stages, and consuming calls, with identifiers handed out
//! automatically. Every stage registers its receiver and result points-to
//! edges in the root context; the handful of tests that need facts beyond
//! that (lost receiver sets, extra calling contexts) use the dedicated
//! helpers below.

use streamlens_core::{
    CallSite, CallSiteId, CallString, ContextId, CreationExpr, CreationSite, InstanceFacts,
    InstanceId, Location, ProcedureId, ProcedureInfo, ProgramPoint, TableOracle, ValueRef,
};

/// Entry procedure every fixture starts from
pub const MAIN: ProcedureId = ProcedureId(0);

/// Handle to a built pipeline stage
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub id: InstanceId,
    pub site: CallSiteId,
    points: Vec<ProgramPoint>,
}

/// Incremental oracle fixture builder
pub struct ProgramBuilder {
    oracle: TableOracle,
    next_site: u32,
    next_instance: u32,
    next_procedure: u32,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        let mut oracle = TableOracle::new();
        oracle.add_procedure(ProcedureInfo::application(MAIN, "main"));
        Self {
            oracle,
            next_site: 0,
            next_instance: 0,
            next_procedure: 0,
        }
    }

    fn fresh_site(&mut self) -> CallSiteId {
        self.next_site += 1;
        CallSiteId(self.next_site)
    }

    fn fresh_instance(&mut self) -> InstanceId {
        self.next_instance += 1;
        InstanceId(self.next_instance)
    }

    /// Register an application procedure
    pub fn procedure(&mut self, name: &str) -> ProcedureId {
        self.next_procedure += 1;
        let id = ProcedureId(self.next_procedure);
        self.oracle.add_procedure(ProcedureInfo::application(id, name));
        id
    }

    /// Record that `caller` contains a call into `callee`
    pub fn called_from(&mut self, callee: ProcedureId, caller: ProcedureId) {
        self.oracle.add_predecessor(callee, caller);
    }

    /// `receiver.stream()` in main
    pub fn source(&mut self, receiver_type: &str) -> Pipeline {
        self.source_via(receiver_type, "stream")
    }

    /// A collection-view creation with an explicit method name
    pub fn source_via(&mut self, receiver_type: &str, method: &str) -> Pipeline {
        let site = self.fresh_site();
        self.oracle.add_call_site(
            CallSite::new(site, MAIN, method)
                .with_receiver_type(receiver_type)
                .with_return_type("Stream"),
        );
        let creation = CreationSite::new(
            site,
            MAIN,
            "Stream",
            CreationExpr::on_receiver(receiver_type, method),
        );
        self.admit(site, creation, vec![ProgramPoint::root(site)])
    }

    /// A receiver-less factory creation, e.g. `Stream.of(..)`
    pub fn factory(&mut self, method: &str) -> Pipeline {
        let site = self.fresh_site();
        self.oracle
            .add_call_site(CallSite::new(site, MAIN, method).with_return_type("Stream"));
        let creation = CreationSite::new(site, MAIN, "Stream", CreationExpr::factory(method));
        self.admit(site, creation, vec![ProgramPoint::root(site)])
    }

    /// A stage derived from one upstream pipeline
    pub fn stage(&mut self, upstream: &Pipeline, method: &str) -> Pipeline {
        self.derive(&[upstream], method, false)
    }

    /// A stage whose first argument is a closure, e.g. `map`/`filter`/`peek`
    pub fn lambda_stage(&mut self, upstream: &Pipeline, method: &str) -> Pipeline {
        self.derive(&[upstream], method, true)
    }

    /// A stage whose receiver may be any of several upstream pipelines
    pub fn merge_stages(&mut self, upstreams: &[&Pipeline], method: &str) -> Pipeline {
        self.derive(upstreams, method, false)
    }

    fn derive(&mut self, upstreams: &[&Pipeline], method: &str, behavioral: bool) -> Pipeline {
        let site = self.fresh_site();
        let mut record = CallSite::new(site, MAIN, method)
            .with_receiver_type("Stream")
            .with_return_type("Stream");
        if behavioral {
            record = record.with_behavioral_arg(0);
        }
        self.oracle.add_call_site(record);
        self.oracle.add_points_to(
            ValueRef::Receiver(site),
            ContextId::ROOT,
            upstreams.iter().map(|up| up.id),
        );

        let mut points = upstreams[0].points.clone();
        points.push(ProgramPoint::root(site));
        let creation = CreationSite::new(
            site,
            MAIN,
            "Stream",
            CreationExpr::on_receiver("Stream", method),
        );
        self.admit(site, creation, points)
    }

    /// A stage produced inside `procedure` whose receiver points-to set the
    /// oracle lost; only the widening step can link it to its upstream.
    pub fn helper_stage(
        &mut self,
        procedure: ProcedureId,
        upstream: &Pipeline,
        method: &str,
    ) -> Pipeline {
        let site = self.fresh_site();
        self.oracle.add_call_site(
            CallSite::new(site, procedure, method)
                .with_receiver_type("Stream")
                .with_return_type("Stream"),
        );
        let mut points = upstream.points.clone();
        points.push(ProgramPoint::root(site));
        let creation = CreationSite::new(
            site,
            procedure,
            "Stream",
            CreationExpr::on_receiver("Stream", method),
        );
        self.admit(site, creation, points)
    }

    /// Another instance at the same creation site, observed under a
    /// different calling context
    pub fn source_in_context(
        &mut self,
        original: &Pipeline,
        receiver_type: &str,
        context: ContextId,
    ) -> Pipeline {
        let id = self.fresh_instance();
        let points = vec![ProgramPoint::new(original.site, context)];
        self.oracle.add_instance(InstanceFacts {
            id,
            creation: CreationSite::new(
                original.site,
                MAIN,
                "Stream",
                CreationExpr::on_receiver(receiver_type, "stream"),
            ),
            call_string: CallString::from_points(points.clone()),
            concrete_type: "Stream".to_string(),
        });
        self.oracle
            .add_points_to(ValueRef::Result(original.site), context, [id]);
        Pipeline {
            id,
            site: original.site,
            points,
        }
    }

    /// A void consuming call taking a closure, e.g. `forEach`
    pub fn terminal(&mut self, upstream: &Pipeline, method: &str) -> ProgramPoint {
        let point = self.consuming_site(method, None, true);
        self.oracle
            .add_points_to(ValueRef::Receiver(point.site), ContextId::ROOT, [upstream.id]);
        point
    }

    /// A value-returning consuming call, e.g. `collect` or `count`
    pub fn typed_terminal(
        &mut self,
        upstream: &Pipeline,
        method: &str,
        return_type: &str,
    ) -> ProgramPoint {
        let point = self.consuming_site(method, Some(return_type), false);
        self.oracle
            .add_points_to(ValueRef::Receiver(point.site), ContextId::ROOT, [upstream.id]);
        point
    }

    /// A consuming call whose receiver resolves only under `context`
    pub fn terminal_in_context(
        &mut self,
        upstream: &Pipeline,
        method: &str,
        context: ContextId,
    ) -> ProgramPoint {
        let point = self.consuming_site(method, None, true);
        self.oracle
            .add_points_to(ValueRef::Receiver(point.site), context, [upstream.id]);
        ProgramPoint::new(point.site, context)
    }

    fn consuming_site(
        &mut self,
        method: &str,
        return_type: Option<&str>,
        behavioral: bool,
    ) -> ProgramPoint {
        let site = self.fresh_site();
        let mut record = CallSite::new(site, MAIN, method).with_receiver_type("Stream");
        if let Some(ty) = return_type {
            record = record.with_return_type(ty);
        }
        if behavioral {
            record = record.with_behavioral_arg(0);
        }
        self.oracle.add_call_site(record);
        ProgramPoint::root(site)
    }

    /// Wire a state-writing lambda into the behavioral argument of a call
    pub fn writer(&mut self, site: CallSiteId, owner: &str, field: &str) -> ProcedureId {
        let name = format!("main$lambda{}", self.next_procedure + 1);
        let lambda = self.procedure(&name);
        self.oracle
            .add_behavioral_targets(site, 0, ContextId::ROOT, [lambda]);
        self.oracle
            .add_modification(lambda, Location::new(owner, field));
        lambda
    }

    fn admit(
        &mut self,
        site: CallSiteId,
        creation: CreationSite,
        points: Vec<ProgramPoint>,
    ) -> Pipeline {
        let id = self.fresh_instance();
        self.oracle.add_instance(InstanceFacts {
            id,
            creation,
            call_string: CallString::from_points(points.clone()),
            concrete_type: "Stream".to_string(),
        });
        self.oracle
            .add_points_to(ValueRef::Result(site), ContextId::ROOT, [id]);
        Pipeline { id, site, points }
    }

    /// Finish building; the oracle is ready to analyze
    pub fn finish(self) -> TableOracle {
        self.oracle
    }
}

impl Default for ProgramBuilder {
    fn default() -> Self {
        Self::new()
    }
}
