use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tempfile::TempDir;

use genchain::prelude::*;

/// One recorded backend invocation
pub struct RecordedCall {
    pub input: String,
    pub params: HashMap<String, Value>,
}

impl RecordedCall {
    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(|v| v.as_str())
    }
}

/// Shared across generators so a test can assert cross-step call order
pub type CallLog = Arc<Mutex<Vec<RecordedCall>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// A stand-in backend that replays a fixed script of outcomes and records
/// every call it receives.
pub struct ScriptedGenerator {
    model: String,
    script: Mutex<VecDeque<Result<GenerationOutput, GeneratorError>>>,
    log: CallLog,
}

impl ScriptedGenerator {
    pub fn new(
        model: &str,
        script: Vec<Result<GenerationOutput, GeneratorError>>,
        log: CallLog,
    ) -> Self {
        Self {
            model: model.to_string(),
            script: Mutex::new(script.into()),
            log,
        }
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(
        &self,
        input: &str,
        params: &HashMap<String, Value>,
    ) -> Result<GenerationOutput, GeneratorError> {
        self.log.lock().unwrap().push(RecordedCall {
            input: input.to_string(),
            params: params.clone(),
        });
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GeneratorError::ProviderError("script exhausted".to_string())))
    }

    fn default_model(&self) -> &str {
        &self.model
    }
}

pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// A chain writing artifacts under a temp directory
pub fn test_chain(dir: &TempDir, steps: Vec<Step>) -> Chain {
    let mut chain = Chain::new(steps);
    chain.config.output_dir = dir.path().to_path_buf();
    chain
}

pub fn ok_output(
    path: Option<&str>,
    url: Option<&str>,
    model: &str,
    cost: f64,
    processing_time: f64,
) -> Result<GenerationOutput, GeneratorError> {
    Ok(GenerationOutput {
        output_path: path.map(|p| p.to_string()),
        output_url: url.map(|u| u.to_string()),
        processing_time,
        cost,
        model: model.to_string(),
        metadata: HashMap::new(),
        error: None,
    })
}

/// A provider-reported failure; may still carry a nonzero cost
pub fn failed_output(
    model: &str,
    error: &str,
    cost: f64,
) -> Result<GenerationOutput, GeneratorError> {
    Ok(GenerationOutput {
        output_path: None,
        output_url: None,
        processing_time: 0.0,
        cost,
        model: model.to_string(),
        metadata: HashMap::new(),
        error: Some(error.to_string()),
    })
}
