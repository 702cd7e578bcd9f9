/*
 * Analysis Configuration
 *
 * Run-level knobs: the predecessor widening policy, the source-capability
 * fallback policy, parallel aggregation, and an optional catalog overlay
 * file extending the built-in operation tables.
 */

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::errors::{Result, StreamlensError};
use crate::features::catalog::application::SourcePolicy;
use crate::features::catalog::domain::OperationCatalog;
use crate::features::catalog::infrastructure::{BuiltInCatalog, CatalogParser};
use crate::features::chain::application::WideningPolicy;

/// Configuration for one analysis run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Recovery policy for under-approximated receiver chains
    pub widening: WideningPolicy,

    /// Handling of source types without a usable capability entry
    pub source_policy: SourcePolicy,

    /// Aggregate instances in parallel
    pub parallel: bool,

    /// Optional YAML overlay extending the built-in operation catalog
    pub catalog_overlay: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            widening: WideningPolicy::default(),
            source_policy: SourcePolicy::default(),
            parallel: true,
            catalog_overlay: None,
        }
    }
}

impl AnalysisConfig {
    /// Parse a configuration document
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: AnalysisConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject unusable settings
    pub fn validate(&self) -> Result<()> {
        if let Some(path) = &self.catalog_overlay {
            if path.as_os_str().is_empty() {
                return Err(StreamlensError::config("catalog overlay path is empty"));
            }
        }
        Ok(())
    }

    /// The operation catalog this run analyzes against
    ///
    /// Starts from the built-in tables and applies the overlay file when one
    /// is configured.
    pub fn load_catalog(&self) -> Result<OperationCatalog> {
        match &self.catalog_overlay {
            None => Ok(BuiltInCatalog::get().clone()),
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                CatalogParser::overlay_yaml(BuiltInCatalog::get(), &text)
            }
        }
    }
}
