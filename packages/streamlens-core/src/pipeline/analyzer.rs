/*
 * Stream Analyzer
 *
 * Orchestrates one analysis run end to end: admit tracked instances with
 * their declaration-derived defaults, solve both attribute automata, build
 * the predecessor graph, sweep terminal call sites, run the reachability,
 * side-effect, stateful and reduce-order passes, close the derived flags
 * upstream, and aggregate.
 *
 * Per-instance problems (unknown source types, unconsumed pipelines,
 * uncovered terminal signatures) become diagnostics on the affected instance
 * and never abort the batch. Oracle and solver failures, malformed chains,
 * and cancellation are fatal and abort the whole run.
 */

use parking_lot::Mutex;
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use tracing::{debug, info};

use crate::config::AnalysisConfig;
use crate::errors::Result;
use crate::features::aggregation::application::{AggregationInput, ResultAggregator};
use crate::features::aggregation::domain::AnalysisReport;
use crate::features::automata::infrastructure::{ExecutionAutomaton, OrderingAutomaton};
use crate::features::automata::ports::TypestateSolver;
use crate::features::catalog::application::infer_defaults;
use crate::features::catalog::domain::OperationCatalog;
use crate::features::chain::application::{MergeEngine, PredecessorGraphBuilder};
use crate::features::classification::application::{
    ReduceOrderClassifier, ReduceOrderReport, StatefulOpDetector,
};
use crate::features::oracle::ports::{AnalysisOracle, InstanceFacts};
use crate::features::reachability::application::check_consumption;
use crate::features::reachability::domain::{collect_terminal_invocations, TerminalInvocation};
use crate::features::side_effects::application::SideEffectDetector;
use crate::session::{AnalysisSession, CancellationToken};
use crate::shared::models::{
    AttributeKind, Diagnostic, ElementOrdering, ExecutionMode, FailureKind, StreamInstance,
};

/// One-shot pipeline attribute analysis over an oracle
pub struct StreamAnalyzer<'a> {
    oracle: &'a dyn AnalysisOracle,
    solver: &'a dyn TypestateSolver,
    catalog: OperationCatalog,
    config: AnalysisConfig,
}

impl<'a> StreamAnalyzer<'a> {
    /// Analyzer with the default configuration and built-in catalog
    pub fn new(oracle: &'a dyn AnalysisOracle, solver: &'a dyn TypestateSolver) -> Result<Self> {
        Self::with_config(oracle, solver, AnalysisConfig::default())
    }

    /// Analyzer with an explicit configuration
    ///
    /// Validates the configuration and loads the catalog (built-in plus the
    /// configured overlay) up front, so a bad overlay fails here rather than
    /// mid-run.
    pub fn with_config(
        oracle: &'a dyn AnalysisOracle,
        solver: &'a dyn TypestateSolver,
        config: AnalysisConfig,
    ) -> Result<Self> {
        config.validate()?;
        let catalog = config.load_catalog()?;
        Ok(Self {
            oracle,
            solver,
            catalog,
            config,
        })
    }

    pub fn catalog(&self) -> &OperationCatalog {
        &self.catalog
    }

    /// Run the analysis in a fresh session
    pub fn analyze(&self) -> Result<AnalysisReport> {
        let mut session = AnalysisSession::new();
        self.run(&mut session)
    }

    /// Run the analysis under an externally held cancellation token
    ///
    /// On cancellation the session and all of its partial caches are
    /// discarded; the error is the only thing that escapes.
    pub fn analyze_with_token(&self, token: CancellationToken) -> Result<AnalysisReport> {
        let mut session = AnalysisSession::with_token(token);
        self.run(&mut session)
    }

    fn run(&self, session: &mut AnalysisSession) -> Result<AnalysisReport> {
        self.admit_instances(session);
        let tracked = session.tracked();
        info!(
            session = %session.id(),
            instances = tracked.len(),
            "analysis started"
        );

        session.checkpoint()?;
        let execution = ExecutionAutomaton::define(&self.catalog)?;
        let ordering = OrderingAutomaton::define(&self.catalog)?;
        session.set_facts(
            AttributeKind::Execution,
            self.solver.solve(&execution, self.oracle, &tracked)?,
        );
        session.set_facts(
            AttributeKind::Ordering,
            self.solver.solve(&ordering, self.oracle, &tracked)?,
        );

        session.checkpoint()?;
        let graph = PredecessorGraphBuilder::new(self.oracle, &self.catalog)
            .with_policy(self.config.widening)
            .build(&tracked)?;
        session.set_graph(graph);

        // Everything past this line reads the session; the passes below may
        // share it across threads.
        let session: &AnalysisSession = session;
        let graph = session.graph();
        let execution_merge = MergeEngine::new(graph, session.execution_facts());
        let ordering_merge = MergeEngine::new(graph, session.ordering_facts());

        let invocations = collect_terminal_invocations(self.oracle, &self.catalog);
        let consumption = check_consumption(self.oracle, &invocations, graph, &tracked);

        let effect_detector = SideEffectDetector::new(self.oracle, &self.catalog, graph);
        let rom_classifier = ReduceOrderClassifier::new(self.oracle, &self.catalog);
        let effect_marks = Mutex::new(FxHashSet::default());
        let reduce_order = Mutex::new(ReduceOrderReport::default());
        // Cancellation is polled once per terminal call site processed.
        let scan = |invocation: &TerminalInvocation| -> Result<()> {
            session.checkpoint()?;
            effect_marks
                .lock()
                .extend(effect_detector.detect(std::slice::from_ref(invocation)));
            let partial =
                rom_classifier.classify(std::slice::from_ref(invocation), &ordering_merge);
            let mut sink = reduce_order.lock();
            sink.flagged.extend(partial.flagged);
            sink.diagnostics.extend(partial.diagnostics);
            Ok(())
        };
        if self.config.parallel {
            invocations.par_iter().try_for_each(scan)?;
        } else {
            invocations.iter().try_for_each(scan)?;
        }
        let effect_marks = effect_marks.into_inner();
        let mut reduce_order = reduce_order.into_inner();
        // Sweep order is schedule-dependent; report order must not be.
        reduce_order.diagnostics.sort_by_key(|d| (d.instance, d.call_site));

        let stateful_detector = StatefulOpDetector::new(self.oracle, &self.catalog, graph);
        let stateful_marks = stateful_detector.detect(&tracked);

        // A flag set on any stage holds for every ancestor of that stage.
        let side_effects = graph.upstream_closure(effect_marks);
        let stateful = graph.upstream_closure(stateful_marks);
        let order_sensitive = graph.upstream_closure(reduce_order.flagged.iter().copied());

        let mut findings: Vec<Diagnostic> = session.findings().to_vec();
        findings.extend(consumption.diagnostics.iter().cloned());
        findings.extend(reduce_order.diagnostics.iter().cloned());

        let aggregator = ResultAggregator::new(
            session.instances(),
            graph,
            &execution_merge,
            &ordering_merge,
            self.config.parallel,
        );
        let report = aggregator.aggregate(&AggregationInput {
            consumption: &consumption,
            side_effects: &side_effects,
            stateful: &stateful,
            order_sensitive: &order_sensitive,
            findings: &findings,
        });

        info!(
            session = %session.id(),
            instances = report.len(),
            consumed = consumption.consumed_count(),
            findings = findings.len(),
            "analysis complete"
        );
        Ok(report)
    }

    /// Build the tracked-instance table with declaration-derived defaults
    fn admit_instances(&self, session: &mut AnalysisSession) {
        for id in self.oracle.instances() {
            let Some(facts) = self.oracle.instance(id) else {
                continue;
            };
            let produced_at = facts.call_string.producing_call();

            let from_pipeline = facts
                .creation
                .expression
                .receiver_type
                .as_deref()
                .is_some_and(|ty| self.catalog.is_pipeline_type(ty));

            // A stage derived from another pipeline carries neutral defaults;
            // its origins' defaults win at aggregation time. Probing the
            // source-capability table with a pipeline type would be wrong.
            let (default_execution, default_ordering) = if from_pipeline {
                (ExecutionMode::Sequential, ElementOrdering::Ordered)
            } else {
                let inferred =
                    infer_defaults(&facts.creation, &self.catalog, self.config.source_policy);
                for (kind, message) in inferred.findings {
                    let mut finding = Diagnostic::new(kind, id, message);
                    if let Some(point) = produced_at {
                        finding = finding.at(point);
                    }
                    session.record_finding(finding);
                }
                (inferred.execution, inferred.ordering)
            };

            if self.chain_is_framework_only(facts) {
                let mut finding = Diagnostic::new(
                    FailureKind::NoApplicationCodeInCallString,
                    id,
                    "every call in the chain resolves to framework-internal code",
                );
                if let Some(point) = produced_at {
                    finding = finding.at(point);
                }
                session.record_finding(finding);
            }

            session.admit(StreamInstance {
                id,
                creation: facts.creation.clone(),
                call_string: facts.call_string.clone(),
                concrete_type: facts.concrete_type.clone(),
                default_execution,
                default_ordering,
            });
        }
        debug!(admitted = session.instances().len(), "instances admitted");
    }

    /// Whether a non-empty call string resolves only to framework procedures
    fn chain_is_framework_only(&self, facts: &InstanceFacts) -> bool {
        let mut resolved_any = false;
        for point in facts.call_string.iter() {
            let Some(site) = self.oracle.call_site(point.site) else {
                continue;
            };
            let Some(info) = self.oracle.procedure(site.procedure) else {
                continue;
            };
            resolved_any = true;
            if info.application {
                return false;
            }
        }
        resolved_any
    }
}
