//! Configuration module for the pipeline engine
//!
//! `ExecutorConfig` selects the policies the executor applies while walking
//! a pipeline. It is stored in TOML files and travels with the `Executive`
//! every node is created with.
//!
//! # Example
//!
//! ```
//! use datavis_pipeline::config::{ExecutorConfig, MissingInputPolicy};
//!
//! let config = ExecutorConfig::from_toml_str(r#"
//!     missing_input = "retry_every_update"
//!     max_depth = 256
//! "#)?;
//! assert_eq!(config.missing_input, MissingInputPolicy::RetryEveryUpdate);
//! # Ok::<(), datavis_pipeline::PipelineError>(())
//! ```

use crate::error::{PipelineError, PipelineResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default bound on the depth of one update traversal
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// What the executor does when a required input port is left unconnected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingInputPolicy {
    /// Skip compute and record the attempt, so the node is not re-attempted
    /// until something it depends on changes.
    #[default]
    SkipUntilModified,
    /// Skip compute without recording the attempt; every `update()` retries.
    RetryEveryUpdate,
}

/// Executor policy settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Handling of nodes with a missing required input.
    pub missing_input: MissingInputPolicy,
    /// Clear (instead of keep) cached outputs of a node skipped for a missing input.
    pub clear_outputs_on_missing_input: bool,
    /// Maximum recursion depth of one traversal.
    pub max_depth: usize,
    /// Emit a debug event for every cache hit.
    pub trace_cache_hits: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            missing_input: MissingInputPolicy::default(),
            clear_outputs_on_missing_input: false,
            max_depth: DEFAULT_MAX_DEPTH,
            trace_cache_hits: true,
        }
    }
}

impl ExecutorConfig {
    /// Parse a config from TOML text
    pub fn from_toml_str(content: &str) -> PipelineResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| PipelineError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the config to TOML text
    pub fn to_toml_string(&self) -> PipelineResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| PipelineError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Load a config file
    pub fn load(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load a config file, returning defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load executor config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save the config to disk as TOML
    pub fn save(&self, path: impl AsRef<Path>) -> PipelineResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    PipelineError::Config(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        let content = self.to_toml_string()?;
        std::fs::write(path, content).map_err(|e| {
            PipelineError::Config(format!("Failed to write config file {:?}: {}", path, e))
        })
    }

    /// Reject settings the executor cannot run with
    pub fn validate(&self) -> PipelineResult<()> {
        if self.max_depth == 0 {
            return Err(PipelineError::Config(
                "max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether a skipped node should remember the attempt
    pub fn records_skipped_attempts(&self) -> bool {
        self.missing_input == MissingInputPolicy::SkipUntilModified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExecutorConfig::default();
        assert_eq!(config.missing_input, MissingInputPolicy::SkipUntilModified);
        assert!(!config.clear_outputs_on_missing_input);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert!(config.records_skipped_attempts());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ExecutorConfig::from_toml_str("missing_input = \"retry_every_update\"").unwrap();
        assert_eq!(config.missing_input, MissingInputPolicy::RetryEveryUpdate);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert!(config.trace_cache_hits);
        assert!(!config.records_skipped_attempts());
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(
            ExecutorConfig::from_toml_str("").unwrap(),
            ExecutorConfig::default()
        );
    }

    #[test]
    fn test_rejects_zero_depth() {
        let err = ExecutorConfig::from_toml_str("max_depth = 0").unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn test_rejects_unknown_policy() {
        assert!(ExecutorConfig::from_toml_str("missing_input = \"sometimes\"").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("executor.toml");

        let config = ExecutorConfig {
            missing_input: MissingInputPolicy::RetryEveryUpdate,
            clear_outputs_on_missing_input: true,
            max_depth: 64,
            trace_cache_hits: false,
        };
        config.save(&path).unwrap();

        let loaded = ExecutorConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExecutorConfig::load_or_default(dir.path().join("absent.toml"));
        assert_eq!(config, ExecutorConfig::default());
    }
}
