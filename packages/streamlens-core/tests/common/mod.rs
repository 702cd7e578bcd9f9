//! Shared fixtures for the integration tests.

mod assertions;
mod builders;

pub use assertions::*;
pub use builders::*;
