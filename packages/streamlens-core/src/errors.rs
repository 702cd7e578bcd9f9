//! Error types for streamlens-core
//!
//! Fatal conditions only: failures of the external oracle or solver, a
//! malformed predecessor chain, bad configuration, or cancellation. Per-instance
//! analysis findings are not errors; they are recorded as
//! [`Diagnostic`](crate::shared::models::Diagnostic) values on the instance and
//! never abort the batch.

use thiserror::Error;

/// Main error type for streamlens-core operations
#[derive(Debug, Error)]
pub enum StreamlensError {
    /// IO error (catalog files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog YAML error
    #[error("Catalog error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Report serialization error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The call-graph/points-to oracle returned inconsistent data
    #[error("Oracle error: {0}")]
    Oracle(String),

    /// The typestate solver failed or timed out
    #[error("Solver error: {0}")]
    Solver(String),

    /// The predecessor relation contains a cycle (bad oracle input)
    #[error("Malformed pipeline chain: {0}")]
    MalformedChain(String),

    /// Catalog contents failed validation
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Analysis was cancelled cooperatively
    #[error("Analysis cancelled")]
    Cancelled,
}

impl StreamlensError {
    /// Create an oracle error
    pub fn oracle(msg: impl Into<String>) -> Self {
        StreamlensError::Oracle(msg.into())
    }

    /// Create a solver error
    pub fn solver(msg: impl Into<String>) -> Self {
        StreamlensError::Solver(msg.into())
    }

    /// Create a catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        StreamlensError::Catalog(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        StreamlensError::Config(msg.into())
    }
}

/// Result type alias for streamlens operations
pub type Result<T> = std::result::Result<T, StreamlensError>;
