pub mod invocation;

pub use invocation::{collect_terminal_invocations, observed_contexts, TerminalInvocation};
