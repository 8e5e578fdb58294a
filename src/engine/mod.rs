//! Chain execution engine module
//!
//! This module contains:
//! - `executor` - The sequential chain executor
//! - `error` - Executor error types
//! - `result` - Step and chain result types

pub mod error;
pub mod executor;
pub mod result;

pub use error::ExecutorError;
pub use executor::Executor;
pub use result::{ChainResult, StepOutput, StepResult};
