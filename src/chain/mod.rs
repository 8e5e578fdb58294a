//! Chain types and definitions
//!
//! This module contains all types for defining and parsing chains:
//! - `kind` - StepKind and MediaType enums
//! - `step` - Chain, ChainConfig, and Step
//! - `loader` - Load chains from files and directories

pub mod kind;
pub mod loader;
pub mod step;

// Re-export all public types for convenience
pub use kind::{MediaType, StepKind};
pub use loader::{ChainLoader, LoadError};
pub use step::{Chain, ChainConfig, Step};
