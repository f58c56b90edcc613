//! Built-in sample steps and hooks
//!
//! Nothing here registers itself; call [`install`] at startup (or start
//! from `Catalog::with_builtins`) to make the samples available.

pub mod hooks;
pub mod steps;

use crate::core::catalog::Catalog;

pub use hooks::{CountHook, RequireHook, TraceHook};
pub use steps::{EchoStep, FailStep, SetStep};

/// Register every built-in step and hook kind
pub fn install(catalog: &mut Catalog) {
    steps::install(catalog);
    hooks::install(catalog);
}
