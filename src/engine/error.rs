//! Executor error types

/// Internal faults that can interrupt a chain run.
///
/// These never cross [`Executor::execute`]'s boundary as `Err`: the
/// executor converts them into a failed `ChainResult` with an
/// `"Execution error: "` message, preserving partial progress.
///
/// [`Executor::execute`]: crate::engine::Executor::execute
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
