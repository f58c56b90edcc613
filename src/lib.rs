//! hookline - a registry-driven data pipeline with inspection hooks

pub mod builtin;
pub mod cli;
pub mod core;

// Re-export commonly used types
pub use core::catalog::Catalog;
pub use core::config::{ComponentConfig, HookConfig, StepConfig};
pub use core::error::PipelineError;
pub use core::hook::Hook;
pub use core::pipeline::PipelineList;
pub use core::record::Record;
pub use core::registry::Registry;
pub use core::step::{Step, Transform};
