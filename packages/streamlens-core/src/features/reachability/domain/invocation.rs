/*
 * Terminal-Operation Invocations
 *
 * A terminal invocation is a call site matching the terminal-operation
 * catalog, taken together with its program point and the points-to-derived
 * set of possible receiver instances. The sweep below enumerates them once;
 * the reachability, side-effect, and reduce-order passes all iterate the
 * same list, and cooperative cancellation is polled per invocation.
 */

use std::collections::BTreeSet;
use tracing::debug;

use crate::features::catalog::domain::OperationCatalog;
use crate::features::oracle::ports::{AnalysisOracle, ValueRef};
use crate::shared::models::{ContextId, InstanceId, ProgramPoint};

/// One terminal call with its resolved receiver set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalInvocation {
    /// The consuming call site and context
    pub point: ProgramPoint,

    /// Terminal operation name
    pub method: String,

    /// Declared return type of the call, if any
    pub return_type: Option<String>,

    /// Instances the receiver may refer to at this point
    pub receivers: BTreeSet<InstanceId>,
}

/// Calling contexts in which tracked instances were observed
///
/// The oracle answers points-to queries per context; the sweep probes each
/// terminal site under every context appearing in some tracked instance's
/// call string. The root context is always included.
pub fn observed_contexts(oracle: &dyn AnalysisOracle) -> Vec<ContextId> {
    let mut contexts = BTreeSet::new();
    contexts.insert(ContextId::ROOT);
    for id in oracle.instances() {
        if let Some(facts) = oracle.instance(id) {
            for point in facts.call_string.iter() {
                contexts.insert(point.context);
            }
        }
    }
    contexts.into_iter().collect()
}

/// Enumerate every terminal invocation with a non-empty receiver set
///
/// Walks all procedures in identifier order and their call sites in program
/// order, so the result is deterministic for a fixed oracle.
pub fn collect_terminal_invocations(
    oracle: &dyn AnalysisOracle,
    catalog: &OperationCatalog,
) -> Vec<TerminalInvocation> {
    let contexts = observed_contexts(oracle);
    let mut invocations = Vec::new();

    for procedure in oracle.procedures() {
        for &site_id in oracle.call_sites_of(procedure) {
            let Some(site) = oracle.call_site(site_id) else {
                continue;
            };
            if !catalog.is_terminal(&site.method) {
                continue;
            }

            for &context in &contexts {
                let receivers: BTreeSet<InstanceId> = oracle
                    .points_to(ValueRef::Receiver(site_id), context)
                    .into_iter()
                    .collect();
                if receivers.is_empty() {
                    continue;
                }
                invocations.push(TerminalInvocation {
                    point: ProgramPoint::new(site_id, context),
                    method: site.method.clone(),
                    return_type: site.return_type.clone(),
                    receivers,
                });
            }
        }
    }

    debug!(
        invocations = invocations.len(),
        contexts = contexts.len(),
        "terminal sweep complete"
    );
    invocations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::catalog::infrastructure::BuiltInCatalog;
    use crate::features::oracle::infrastructure::TableOracle;
    use crate::features::oracle::ports::InstanceFacts;
    use crate::shared::models::{
        CallSite, CallSiteId, CallString, CreationExpr, CreationSite, ProcedureId, ProcedureInfo,
    };

    fn oracle_with_terminal() -> TableOracle {
        let mut oracle = TableOracle::new();
        let main = ProcedureId(0);
        oracle.add_procedure(ProcedureInfo::application(main, "main"));
        oracle.add_call_site(CallSite::new(CallSiteId(1), main, "stream").with_return_type("Stream"));
        oracle.add_call_site(CallSite::new(CallSiteId(2), main, "map").with_return_type("Stream"));
        oracle.add_call_site(CallSite::new(CallSiteId(3), main, "collect").with_return_type("List"));
        oracle.add_points_to(
            ValueRef::Receiver(CallSiteId(3)),
            ContextId::ROOT,
            [InstanceId(1)],
        );
        oracle.add_instance(InstanceFacts {
            id: InstanceId(1),
            creation: CreationSite::new(
                CallSiteId(1),
                main,
                "Stream",
                CreationExpr::on_receiver("ArrayList", "stream"),
            ),
            call_string: CallString::from_points(vec![ProgramPoint::root(CallSiteId(1))]),
            concrete_type: "Stream".to_string(),
        });
        oracle
    }

    #[test]
    fn test_sweep_finds_terminal_call() {
        let oracle = oracle_with_terminal();
        let invocations = collect_terminal_invocations(&oracle, BuiltInCatalog::get());

        assert_eq!(invocations.len(), 1);
        let inv = &invocations[0];
        assert_eq!(inv.method, "collect");
        assert_eq!(inv.point, ProgramPoint::root(CallSiteId(3)));
        assert!(inv.receivers.contains(&InstanceId(1)));
    }

    #[test]
    fn test_sweep_skips_intermediate_calls() {
        let oracle = oracle_with_terminal();
        let invocations = collect_terminal_invocations(&oracle, BuiltInCatalog::get());
        assert!(invocations.iter().all(|inv| inv.method != "map"));
    }

    #[test]
    fn test_sweep_skips_unresolved_receivers() {
        let mut oracle = TableOracle::new();
        let main = ProcedureId(0);
        oracle.add_procedure(ProcedureInfo::application(main, "main"));
        oracle.add_call_site(CallSite::new(CallSiteId(9), main, "count"));
        // No points-to entry for the receiver
        let invocations = collect_terminal_invocations(&oracle, BuiltInCatalog::get());
        assert!(invocations.is_empty());
    }

    #[test]
    fn test_observed_contexts_include_root() {
        let oracle = TableOracle::new();
        assert_eq!(observed_contexts(&oracle), vec![ContextId::ROOT]);
    }

    #[test]
    fn test_observed_contexts_from_call_strings() {
        let mut oracle = oracle_with_terminal();
        let nested = ContextId(4);
        oracle.add_instance(InstanceFacts {
            id: InstanceId(2),
            creation: CreationSite::new(
                CallSiteId(2),
                ProcedureId(0),
                "Stream",
                CreationExpr::factory("of"),
            ),
            call_string: CallString::from_points(vec![ProgramPoint::new(CallSiteId(2), nested)]),
            concrete_type: "Stream".to_string(),
        });

        let contexts = observed_contexts(&oracle);
        assert!(contexts.contains(&ContextId::ROOT));
        assert!(contexts.contains(&nested));
    }
}
