//! HTTP provider adapter - generation requests over plain HTTP
//!
//! Most generation providers expose the same thin surface: POST a JSON
//! payload naming a model, an input, and free-form parameters; get back a
//! JSON body with an artifact locator and billing metadata. This adapter
//! covers that surface for any such provider. It supports:
//! - Authentication (Bearer, API key header)
//! - Custom headers
//! - Artifact download into the chain's output directory

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::{GenerationOutput, Generator, GeneratorError};

/// Authentication for a provider endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HttpAuthConfig {
    Bearer { token: String },
    ApiKey { header: String, key: String },
}

/// Configuration for one HTTP generation provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpGeneratorConfig {
    /// Base URL of the provider API
    pub base_url: String,

    /// Request path for generation calls
    #[serde(default = "default_generate_path")]
    pub path: String,

    /// Model to request when a step does not name one
    pub model: String,

    /// Authentication
    pub auth: Option<HttpAuthConfig>,

    /// Extra headers sent on every request
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Cost charged per call when the provider does not report one
    #[serde(default)]
    pub cost_per_call: f64,

    /// Download the artifact locally when the provider only returns a URL
    #[serde(default = "default_download")]
    pub download: bool,
}

fn default_generate_path() -> String {
    "/v1/generate".to_string()
}

fn default_timeout() -> u64 {
    600_000
}

fn default_download() -> bool {
    true
}

/// What the provider sends back
#[derive(Debug, Deserialize)]
struct ProviderResponse {
    output_url: Option<String>,
    output_path: Option<String>,
    #[serde(default)]
    cost: Option<f64>,
    #[serde(default)]
    processing_time: Option<f64>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    metadata: HashMap<String, Value>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug)]
pub struct HttpGenerator {
    config: HttpGeneratorConfig,
    client: reqwest::Client,
}

impl HttpGenerator {
    pub fn new(config: HttpGeneratorConfig) -> Result<Self, GeneratorError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout))
            .build()
            .map_err(|e| GeneratorError::StartupFailed(e.to_string()))?;

        Ok(Self { config, client })
    }

    pub fn from_config(config: &HttpGeneratorConfig) -> Result<Self, GeneratorError> {
        Self::new(config.clone())
    }

    fn build_url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        format!("{}{}", base, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.auth {
            Some(HttpAuthConfig::Bearer { token }) => {
                request.header("Authorization", format!("Bearer {}", token))
            }
            Some(HttpAuthConfig::ApiKey { header, key }) => request.header(header, key),
            None => request,
        }
    }

    fn apply_headers(&self, mut request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        for (key, value) in &self.config.headers {
            request = request.header(key, value);
        }
        request
    }

    /// Pick a local filename for a downloaded artifact
    fn artifact_filename(url: &str) -> String {
        url.rsplit('/')
            .next()
            .filter(|name| !name.is_empty() && !name.contains('?'))
            .map(|name| name.to_string())
            .unwrap_or_else(|| format!("artifact-{}", uuid::Uuid::new_v4()))
    }

    async fn download_artifact(
        &self,
        url: &str,
        output_dir: &Path,
    ) -> Result<PathBuf, GeneratorError> {
        tokio::fs::create_dir_all(output_dir).await?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GeneratorError::ProviderError(format!("Download failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeneratorError::HttpError {
                status: status.as_u16(),
                message: format!("Artifact download from {}", url),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GeneratorError::ProviderError(format!("Download failed: {}", e)))?;

        let path = output_dir.join(Self::artifact_filename(url));
        tokio::fs::write(&path, &bytes).await?;
        debug!("Downloaded artifact to {}", path.display());

        Ok(path)
    }
}

#[async_trait]
impl Generator for HttpGenerator {
    async fn generate(
        &self,
        input: &str,
        params: &HashMap<String, Value>,
    ) -> Result<GenerationOutput, GeneratorError> {
        let url = self.build_url(&self.config.path);

        let model = params
            .get("model")
            .and_then(|v| v.as_str())
            .unwrap_or(&self.config.model)
            .to_string();

        let body = serde_json::json!({
            "model": model,
            "input": input,
            "params": params,
        });

        debug!("Executing POST {} (model: {})", url, model);
        let start = Instant::now();

        let mut request = self.client.post(&url).json(&body);
        request = self.apply_auth(request);
        request = self.apply_headers(request);

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                GeneratorError::Timeout
            } else {
                GeneratorError::ProviderError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeneratorError::HttpError {
                status: status.as_u16(),
                message,
            });
        }

        let provider: ProviderResponse = response
            .json()
            .await
            .map_err(|e| GeneratorError::ProviderError(format!("Malformed response: {}", e)))?;

        let mut output_path = provider.output_path;
        let output_url = provider.output_url;

        // Downstream steps usually need local file access
        if provider.error.is_none() && output_path.is_none() && self.config.download {
            if let Some(url) = &output_url {
                let output_dir = params
                    .get("output_dir")
                    .and_then(|v| v.as_str())
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("output"));

                match self.download_artifact(url, &output_dir).await {
                    Ok(path) => output_path = Some(path.display().to_string()),
                    Err(e) => {
                        // Keep the URL result rather than failing the step
                        warn!("Artifact download failed, keeping URL only: {}", e);
                    }
                }
            }
        }

        let elapsed = start.elapsed().as_secs_f64();
        match &provider.error {
            Some(error) => warn!("Provider reported failure (model: {}): {}", model, error),
            None => info!(
                "Generation complete (model: {}, {:.1}s)",
                model,
                provider.processing_time.unwrap_or(elapsed)
            ),
        }

        Ok(GenerationOutput {
            output_path,
            output_url,
            processing_time: provider.processing_time.unwrap_or(elapsed),
            // A failed call may still have been billed
            cost: provider.cost.unwrap_or(if provider.error.is_none() {
                self.config.cost_per_call
            } else {
                0.0
            }),
            model: provider.model.unwrap_or(model),
            metadata: provider.metadata,
            error: provider.error,
        })
    }

    fn default_model(&self) -> &str {
        &self.config.model
    }
}
