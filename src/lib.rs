//! # GenChain
//!
//! A sequential multi-step pipeline executor for generative media chains
//! (text→image→video→audio→upscale), threading each step's output into the
//! next step's input and aggregating cost/time telemetry along the way.
//!
//! ## Features
//!
//! - **Declarative YAML chains** - Define generation pipelines as ordered steps
//! - **Typed step kinds** - text-to-image, image-to-video, add-audio, upscale-video
//! - **Partial-failure semantics** - Stop on first failure, keep partial results
//! - **Cost telemetry** - Per-step and total cost, charged even for failed steps
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use genchain::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let chain_yaml = r#"
//! name: fox-clip
//! config:
//!   output_dir: out/fox
//! steps:
//!   - kind: text_to_image
//!     model: flux_schnell
//!   - kind: image_to_video
//!     model: hailuo
//!     params:
//!       duration: 6
//! "#;
//!
//!     let chain: Chain = serde_yaml::from_str(chain_yaml)?;
//!
//!     let image_backend = HttpGenerator::new(HttpGeneratorConfig {
//!         base_url: "https://api.example.com".into(),
//!         path: "/v1/images".into(),
//!         model: "flux_schnell".into(),
//!         auth: None,
//!         headers: Default::default(),
//!         timeout: 600_000,
//!         cost_per_call: 0.01,
//!         download: true,
//!     })?;
//!
//!     let executor = Executor::new()
//!         .with_generator(StepKind::TextToImage, Box::new(image_backend));
//!
//!     let result = executor.execute(&chain, "a red fox in snow").await;
//!     println!(
//!         "success={} steps={}/{} cost=${:.4}",
//!         result.success, result.steps_completed, result.total_steps, result.total_cost
//!     );
//!     Ok(())
//! }
//! ```
//!
//! Failures are returned as data, never thrown: `execute` always yields a
//! [`ChainResult`] and callers branch on its `success` flag.

pub mod backend;
pub mod chain;
pub mod engine;

// Re-export main types
pub use backend::{
    GenerationOutput, Generator, GeneratorError, HttpAuthConfig, HttpGenerator,
    HttpGeneratorConfig,
};
pub use chain::{Chain, ChainConfig, ChainLoader, LoadError, MediaType, Step, StepKind};
pub use engine::{ChainResult, Executor, ExecutorError, StepOutput, StepResult};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::backend::{
        GenerationOutput, Generator, GeneratorError, HttpAuthConfig, HttpGenerator,
        HttpGeneratorConfig,
    };
    pub use crate::chain::{Chain, ChainConfig, ChainLoader, LoadError, MediaType, Step, StepKind};
    pub use crate::engine::{ChainResult, Executor, ExecutorError, StepOutput, StepResult};
}
