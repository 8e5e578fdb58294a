//! Chain and Step definitions
//!
//! A chain is an ordered sequence of generation steps plus chain-wide
//! configuration. Chains are built once (by hand or from YAML) and are
//! read-only during execution.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use super::kind::StepKind;

// ============================================================================
// Chain
// ============================================================================

/// An ordered sequence of generation steps. Insertion order is execution
/// order; the executor never reorders or mutates steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chain {
    /// Chain name (for logging)
    #[serde(default)]
    pub name: Option<String>,

    /// Chain-wide settings
    #[serde(default)]
    pub config: ChainConfig,

    /// Steps to execute
    pub steps: Vec<Step>,
}

impl Chain {
    /// Create a chain from steps with default configuration
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            name: None,
            config: ChainConfig::default(),
            steps,
        }
    }

    /// Only the steps with `enabled == true`, in original order.
    ///
    /// Pure filter: repeated calls on the same chain return the same
    /// sequence. An empty result is valid and executes as a vacuous
    /// success.
    pub fn enabled_steps(&self) -> Vec<&Step> {
        self.steps.iter().filter(|s| s.enabled).collect()
    }
}

/// Chain-wide configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Directory where step artifacts are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Additional chain-wide settings, passed through to handlers opaquely
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            extra: HashMap::new(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

// ============================================================================
// Step
// ============================================================================

/// A single generation step in a chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// What this step generates
    pub kind: StepKind,

    /// Backend model identifier (e.g. "hailuo", "veo2", "kling"). Resolved
    /// to the kind's default when absent.
    #[serde(default)]
    pub model: Option<String>,

    /// Step-specific generation parameters (prompt overrides, duration,
    /// resolution, ...). Keys are backend-defined; handlers extract only
    /// what they understand.
    #[serde(default)]
    pub params: HashMap<String, serde_json::Value>,

    /// Disabled steps are skipped entirely and never appear in execution
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Step {
    /// Create an enabled step with no parameters
    pub fn new(kind: StepKind) -> Self {
        Self {
            kind,
            model: None,
            params: HashMap::new(),
            enabled: true,
        }
    }

    /// Set the backend model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set a generation parameter
    pub fn with_param(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.params.insert(key.into(), value);
        self
    }

    /// Enable or disable the step
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// The model this step will run with: its own, or the kind's default
    pub fn resolved_model(&self) -> &str {
        self.model.as_deref().unwrap_or(self.kind.default_model())
    }
}
