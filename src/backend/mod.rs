//! Backend generator seam
//!
//! This module provides the boundary to external generation providers:
//! - `Generator` - the trait every per-kind backend implements
//! - `http` - a generic HTTP provider adapter
//!
//! Backends are opaque collaborators: they accept a primary input (a prompt
//! or an artifact locator) plus a parameter map, perform whatever network
//! and file I/O they need, and report a `GenerationOutput`. Polling a remote
//! job queue, if a provider requires it, lives inside the backend; the
//! executor only awaits the call.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

pub mod http;

pub use http::{HttpAuthConfig, HttpGenerator, HttpGeneratorConfig};

/// Common error type for generator operations
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("Failed to initialize generator: {0}")]
    StartupFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("HTTP error: {status} - {message}")]
    HttpError { status: u16, message: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// What a backend reports after a generation call
#[derive(Debug, Clone, Default)]
pub struct GenerationOutput {
    /// Local file the artifact was written to, if any
    pub output_path: Option<String>,

    /// Remote locator for the artifact, if any
    pub output_url: Option<String>,

    /// Seconds the provider spent on the request
    pub processing_time: f64,

    /// Estimated cost in USD, provider-supplied or approximated
    pub cost: f64,

    /// The model that actually served the request
    pub model: String,

    /// Provider-specific extra data
    pub metadata: HashMap<String, Value>,

    /// Failure the provider reported after accepting the request. Distinct
    /// from returning `Err`: an output with `error` set may still carry a
    /// nonzero `cost`, because the provider billed before failing.
    pub error: Option<String>,
}

/// A backend generation provider for one step kind.
///
/// Implementations must be `Send + Sync`: the executor holds one instance
/// per kind for its lifetime and concurrent chain runs share them by
/// reference, with no synchronization added on top.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Run one generation against the provider.
    ///
    /// `input` is the primary input for the kind (prompt text, an image
    /// locator, a video locator). `params` carries the merged step
    /// parameters, including `output_dir`; implementations read only the
    /// keys they understand.
    async fn generate(
        &self,
        input: &str,
        params: &HashMap<String, Value>,
    ) -> Result<GenerationOutput, GeneratorError>;

    /// Model identifier used when a step does not name one
    fn default_model(&self) -> &str;
}
