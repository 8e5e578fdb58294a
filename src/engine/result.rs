//! Execution result types

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;

use crate::backend::GenerationOutput;

/// Result of a single step execution
#[derive(Debug, Clone)]
pub struct StepResult {
    pub success: bool,
    pub output_path: Option<String>,
    pub output_url: Option<String>,
    /// Seconds elapsed for this step
    pub processing_time: f64,
    /// Estimated cost in USD. Charged into the chain total even when the
    /// step fails: providers may bill for partial work.
    pub cost: f64,
    /// The model actually used
    pub model: String,
    pub metadata: HashMap<String, Value>,
    /// Present iff `success` is false
    pub error: Option<String>,
}

impl StepResult {
    /// The artifact locator handed to the next step: `output_path` when
    /// present, else `output_url`.
    ///
    /// Path is preferred because downstream steps typically need local file
    /// access. If a backend reports a path that is no longer readable while
    /// the URL is still valid, the next step fails on the stale path; that
    /// preference is deliberate and not second-guessed here.
    pub fn locator(&self) -> Option<&str> {
        self.output_path.as_deref().or(self.output_url.as_deref())
    }

    /// A failure-shaped result for a step that never reached its backend
    pub fn failure(model: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            output_path: None,
            output_url: None,
            processing_time: 0.0,
            cost: 0.0,
            model: model.into(),
            metadata: HashMap::new(),
            error: Some(error.into()),
        }
    }
}

impl From<GenerationOutput> for StepResult {
    /// Normalize whatever shape a backend reports into the common result
    /// shape. A backend-reported `error` marks the step failed but keeps
    /// whatever cost the provider already charged.
    fn from(output: GenerationOutput) -> Self {
        Self {
            success: output.error.is_none(),
            output_path: output.output_path,
            output_url: output.output_url,
            processing_time: output.processing_time,
            cost: output.cost,
            model: output.model,
            metadata: output.metadata,
            error: output.error,
        }
    }
}

/// Per-step record kept in [`ChainResult::outputs`]
#[derive(Debug, Clone)]
pub struct StepOutput {
    pub path: Option<String>,
    pub url: Option<String>,
    pub model: String,
    pub metadata: HashMap<String, Value>,
}

/// Result of a whole chain execution
#[derive(Debug, Clone)]
pub struct ChainResult {
    /// True only if every enabled step succeeded
    pub success: bool,
    /// Steps that finished successfully before the run stopped
    pub steps_completed: usize,
    /// Enabled steps in the chain
    pub total_steps: usize,
    /// Sum of per-step costs across all attempted steps, failing one included
    pub total_cost: f64,
    /// Seconds from run start to completion
    pub total_time: f64,
    /// One entry per completed step, keyed `"step_{index}_{kind}"` (1-based)
    pub outputs: HashMap<String, StepOutput>,
    /// Which step failed and why; present iff `success` is false
    pub error: Option<String>,
    /// Every StepResult produced, in execution order, failing one included
    pub step_results: Vec<StepResult>,
    pub run_id: String,
    pub started_at: DateTime<Utc>,
}
