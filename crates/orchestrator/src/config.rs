//! `EngineConfig`: aggregates every tunable named across the component
//! specs into one TOML-loadable document, following the same
//! default-fn-per-field + explicit `Default` pattern used by every
//! sub-component config.

use std::path::Path;

use ao_domain::goal::{Budget, ErrorHandlingPolicy};
use ao_normalizer::NormalizerConfig;
use ao_state::WorkingMemoryConfig;
use serde::{Deserialize, Serialize};

use crate::error::{OrchestratorError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub budget: Budget,
    #[serde(default)]
    pub error_policy: ErrorHandlingPolicy,
    #[serde(default)]
    pub normalizer: NormalizerConfig,
    #[serde(default)]
    pub working_memory: WorkingMemoryConfig,
    #[serde(default = "d_state_dir")]
    pub state_dir: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            budget: Budget::default(),
            error_policy: ErrorHandlingPolicy::default(),
            normalizer: NormalizerConfig::default(),
            working_memory: WorkingMemoryConfig::default(),
            state_dir: d_state_dir(),
        }
    }
}

fn d_state_dir() -> String {
    "./ao-state".to_string()
}

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| OrchestratorError::Config(e.to_string()))?;
        toml::from_str(&raw).map_err(|e| OrchestratorError::Config(e.to_string()))
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Numeric bounds that must stay sane under hand-edited config are
    /// clamped rather than rejected.
    pub fn clamped(mut self) -> Self {
        self.error_policy = self.error_policy.clamped();
        self.normalizer.max_key_facts = self.normalizer.max_key_facts.clamp(1, 500);
        self.working_memory.max_memory_entries = self.working_memory.max_memory_entries.clamp(1, 10_000);
        self
    }

    /// Hand-rolled config validation, distinct from the JSON-Schema
    /// validation component — mirrors the `Config::validate` idiom of
    /// returning a severity-tagged list rather than erroring eagerly.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.budget.max_turns == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "budget.max_turns".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.working_memory.max_memory_entries == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "working_memory.max_memory_entries".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.normalizer.max_key_facts > 200 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "normalizer.max_key_facts".to_string(),
                message: "unusually large; working-memory compression will dominate cost".to_string(),
            });
        }
        errors
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}
