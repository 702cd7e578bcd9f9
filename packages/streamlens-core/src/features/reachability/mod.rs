/*
 * Reachability Feature
 *
 * Enumerates terminal-operation invocations and decides which tracked
 * instances are actually consumed. Unconsumed instances are flagged and
 * excluded from attribute aggregation.
 */

pub mod application;
pub mod domain;

pub use application::{check_consumption, ConsumptionReport};
pub use domain::{collect_terminal_invocations, observed_contexts, TerminalInvocation};
