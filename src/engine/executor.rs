//! Chain Executor - runs generation chains end to end
//!
//! This is the main engine that:
//! 1. Filters a chain down to its enabled steps
//! 2. Executes steps strictly in declaration order
//! 3. Threads each step's artifact into the next step's input
//! 4. Routes each step to its kind-specific backend generator
//! 5. Accumulates cost and time telemetry
//! 6. Stops at the first failing step, returning partial results

use std::collections::HashMap;
use std::time::Instant;

use chrono::Utc;
use serde_json::Value;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::backend::Generator;
use crate::chain::{Chain, ChainConfig, MediaType, Step, StepKind};
use crate::engine::error::ExecutorError;
use crate::engine::result::{ChainResult, StepOutput, StepResult};

/// The chain executor.
///
/// Holds one backend generator per step kind, registered at construction
/// and reused across runs. `execute` takes `&self`, so concurrent runs on
/// one executor share the generators by reference; thread-safety beyond
/// `Send + Sync` is the generators' responsibility, not the executor's.
pub struct Executor {
    generators: HashMap<StepKind, Box<dyn Generator>>,
}

/// Accumulators that survive an aborted run, so partial progress is
/// reported even when the executor hits an internal fault.
#[derive(Default)]
struct RunProgress {
    total_steps: usize,
    steps_completed: usize,
    total_cost: f64,
    outputs: HashMap<String, StepOutput>,
    step_results: Vec<StepResult>,
    error: Option<String>,
}

impl Executor {
    /// Create an executor with no generators registered
    pub fn new() -> Self {
        Self {
            generators: HashMap::new(),
        }
    }

    /// Register the backend generator for a step kind
    pub fn with_generator(mut self, kind: StepKind, generator: Box<dyn Generator>) -> Self {
        self.generators.insert(kind, generator);
        self
    }

    /// Run a chain against an initial input (conventionally prompt text).
    ///
    /// Always returns a `ChainResult`: step failures and internal faults
    /// are captured as data, never propagated. Callers branch on
    /// `ChainResult::success`.
    #[instrument(skip(self, chain, input))]
    pub async fn execute(&self, chain: &Chain, input: &str) -> ChainResult {
        self.execute_with_overrides(chain, input, &HashMap::new())
            .await
    }

    /// Run a chain with parameter overrides applied to every step.
    ///
    /// Overrides win over each step's own params, which in turn win over
    /// the chain-level `output_dir` default.
    #[instrument(
        skip(self, chain, input, overrides),
        fields(chain = chain.name.as_deref().unwrap_or("unnamed"))
    )]
    pub async fn execute_with_overrides(
        &self,
        chain: &Chain,
        input: &str,
        overrides: &HashMap<String, Value>,
    ) -> ChainResult {
        let run_id = Uuid::new_v4().to_string();
        let started_at = Utc::now();
        let clock = Instant::now();
        let mut progress = RunProgress::default();

        info!("Starting chain run {}", run_id);

        let outcome = self
            .run_steps(chain, input, overrides, &mut progress)
            .await;

        let total_time = clock.elapsed().as_secs_f64();
        let error = match outcome {
            Ok(()) => progress.error,
            Err(e) => {
                // An internal fault escaped the per-step handling; report it
                // as data with whatever progress had accumulated.
                error!("Chain run aborted: {}", e);
                Some(format!("Execution error: {}", e))
            }
        };

        ChainResult {
            success: error.is_none(),
            steps_completed: progress.steps_completed,
            total_steps: progress.total_steps,
            total_cost: progress.total_cost,
            total_time,
            outputs: progress.outputs,
            error,
            step_results: progress.step_results,
            run_id,
            started_at,
        }
    }

    async fn run_steps(
        &self,
        chain: &Chain,
        input: &str,
        overrides: &HashMap<String, Value>,
        progress: &mut RunProgress,
    ) -> Result<(), ExecutorError> {
        let enabled = chain.enabled_steps();
        progress.total_steps = enabled.len();

        if enabled.is_empty() {
            info!("Chain has no enabled steps; nothing to do");
            return Ok(());
        }

        // Backends write artifacts under the chain's output directory
        tokio::fs::create_dir_all(&chain.config.output_dir).await?;

        let mut current_data = input.to_string();
        let mut current_type = MediaType::Text;

        for (i, step) in enabled.iter().enumerate() {
            info!(
                "Step {}/{}: {} (model: {})",
                i + 1,
                progress.total_steps,
                step.kind,
                step.resolved_model()
            );

            let result = self
                .execute_step(step, &current_data, current_type, &chain.config, overrides)
                .await;

            // Charged before the success check: the provider may have
            // billed for partial work even when the step failed.
            progress.total_cost += result.cost;

            if !result.success {
                let reason = result
                    .error
                    .clone()
                    .unwrap_or_else(|| "unknown error".to_string());
                error!("Step {} failed: {}", i + 1, reason);
                progress.error = Some(format!("Step {} failed: {}", i + 1, reason));
                progress.step_results.push(result);
                return Ok(());
            }

            match result.locator() {
                Some(locator) => current_data = locator.to_string(),
                // A step with no artifact leaves the previous data in place
                None => warn!("Step {} produced no artifact locator", i + 1),
            }
            current_type = step.kind.output_type();

            progress.outputs.insert(
                format!("step_{}_{}", i + 1, step.kind),
                StepOutput {
                    path: result.output_path.clone(),
                    url: result.output_url.clone(),
                    model: result.model.clone(),
                    metadata: result.metadata.clone(),
                },
            );
            progress.step_results.push(result);
            progress.steps_completed = i + 1;
        }

        info!(
            "Chain complete: {} steps, ${:.4} estimated cost",
            progress.total_steps, progress.total_cost
        );
        Ok(())
    }

    /// Route one step to its kind-specific handler
    async fn execute_step(
        &self,
        step: &Step,
        input: &str,
        input_type: MediaType,
        config: &ChainConfig,
        overrides: &HashMap<String, Value>,
    ) -> StepResult {
        match step.kind {
            StepKind::TextToImage => {
                self.execute_text_to_image(step, input, input_type, config, overrides)
                    .await
            }
            StepKind::ImageToVideo => {
                self.execute_image_to_video(step, input, input_type, config, overrides)
                    .await
            }
            StepKind::AddAudio => {
                self.execute_add_audio(step, input, input_type, config, overrides)
                    .await
            }
            StepKind::UpscaleVideo => {
                self.execute_upscale_video(step, input, input_type, config, overrides)
                    .await
            }
            StepKind::Unknown => StepResult::failure(
                step.resolved_model(),
                format!("Unsupported step kind: {}", step.kind),
            ),
        }
    }

    /// Generate a still image from prompt text
    async fn execute_text_to_image(
        &self,
        step: &Step,
        input: &str,
        input_type: MediaType,
        config: &ChainConfig,
        overrides: &HashMap<String, Value>,
    ) -> StepResult {
        check_input_type(step, input_type, MediaType::Text);
        let params = merge_step_params(step, config, input_type, overrides);
        self.run_generation(step, input, &params).await
    }

    /// Animate an image into a video clip
    async fn execute_image_to_video(
        &self,
        step: &Step,
        input: &str,
        input_type: MediaType,
        config: &ChainConfig,
        overrides: &HashMap<String, Value>,
    ) -> StepResult {
        check_input_type(step, input_type, MediaType::Image);
        let params = merge_step_params(step, config, input_type, overrides);
        self.run_generation(step, input, &params).await
    }

    /// Generate and mix audio onto a video
    async fn execute_add_audio(
        &self,
        step: &Step,
        input: &str,
        input_type: MediaType,
        config: &ChainConfig,
        overrides: &HashMap<String, Value>,
    ) -> StepResult {
        check_input_type(step, input_type, MediaType::Video);
        let params = merge_step_params(step, config, input_type, overrides);
        self.run_generation(step, input, &params).await
    }

    /// Upscale a video to a higher resolution
    async fn execute_upscale_video(
        &self,
        step: &Step,
        input: &str,
        input_type: MediaType,
        config: &ChainConfig,
        overrides: &HashMap<String, Value>,
    ) -> StepResult {
        check_input_type(step, input_type, MediaType::Video);
        let params = merge_step_params(step, config, input_type, overrides);
        self.run_generation(step, input, &params).await
    }

    /// Call the registered generator for the step's kind and normalize the
    /// outcome. Never returns an error: a missing generator or a failed
    /// call becomes a failure-shaped `StepResult` for the loop to handle.
    async fn run_generation(
        &self,
        step: &Step,
        input: &str,
        params: &HashMap<String, Value>,
    ) -> StepResult {
        let model = params
            .get("model")
            .and_then(|v| v.as_str())
            .unwrap_or(step.resolved_model())
            .to_string();

        let Some(generator) = self.generators.get(&step.kind) else {
            return StepResult::failure(
                model,
                format!("No generator registered for step kind '{}'", step.kind),
            );
        };

        let start = Instant::now();
        match generator.generate(input, params).await {
            Ok(output) => StepResult::from(output),
            Err(e) => StepResult {
                processing_time: start.elapsed().as_secs_f64(),
                ..StepResult::failure(model, e.to_string())
            },
        }
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

/// Merge the parameter map a handler passes to its backend. Precedence,
/// lowest first: executor-provided context (`output_dir`, `input_type`),
/// the step's own params, the step's resolved model (only if no `model`
/// key is present yet), then chain-wide overrides.
fn merge_step_params(
    step: &Step,
    config: &ChainConfig,
    input_type: MediaType,
    overrides: &HashMap<String, Value>,
) -> HashMap<String, Value> {
    let mut params: HashMap<String, Value> = HashMap::new();
    params.insert(
        "output_dir".to_string(),
        Value::String(config.output_dir.display().to_string()),
    );
    params.insert(
        "input_type".to_string(),
        Value::String(input_type.to_string()),
    );

    for (key, value) in &step.params {
        params.insert(key.clone(), value.clone());
    }

    params
        .entry("model".to_string())
        .or_insert_with(|| Value::String(step.resolved_model().to_string()));

    for (key, value) in overrides {
        params.insert(key.clone(), value.clone());
    }

    params
}

/// An input of an unexpected type is a potential, not certain, failure:
/// log it and let the backend try.
fn check_input_type(step: &Step, actual: MediaType, expected: MediaType) {
    if actual != expected {
        warn!(
            "Step '{}' expects {} input, got {}",
            step.kind, expected, actual
        );
    }
}
