//! The component factory
//!
//! A catalog owns one registry per capability family and assembles concrete
//! components from configuration records.

use crate::core::config::{HookConfig, StepConfig};
use crate::core::hook::Hook;
use crate::core::pipeline::PipelineList;
use crate::core::registry::Registry;
use crate::core::step::{Step, Transform};
use anyhow::Result;

/// Registries for every capability family, plus the build operations that
/// resolve configuration records against them.
///
/// Intended usage is single-writer-at-startup: register every kind up
/// front, then share the catalog read-only for the life of the process.
/// Registering from multiple threads needs external synchronization; the
/// catalog does not provide it.
#[derive(Debug)]
pub struct Catalog {
    /// Step kinds usable in a pipeline
    pub steps: Registry<StepConfig, Box<dyn Transform>>,

    /// Hook kinds usable as inspectors
    pub hooks: Registry<HookConfig, Box<dyn Hook>>,
}

impl Catalog {
    /// Create a catalog with only the PipelineList composite registered
    pub fn new() -> Self {
        let mut steps = Registry::new("steps");
        steps.register("PipelineList", |config: &StepConfig, catalog: &Catalog| {
            Ok(Box::new(PipelineList::from_config(config, catalog)?) as Box<dyn Transform>)
        });

        Catalog {
            steps,
            hooks: Registry::new("hooks"),
        }
    }

    /// Create a catalog with the built-in sample steps and hooks installed
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        crate::builtin::install(&mut catalog);
        catalog
    }

    /// Build a step from its configuration record.
    ///
    /// Resolves the kernel through the step registry, then every hook
    /// config through the hook registry in list order; list order is
    /// invocation order.
    pub fn build_step(&self, config: &StepConfig) -> Result<Step> {
        let name = config.instance_name().to_string();
        tracing::debug!(step = %name, kind = %config.name, "building step");

        let kernel = self.steps.build(config, self)?;

        let mut pre_hooks = Vec::with_capacity(config.forward_pre_hook.len());
        for hook_config in &config.forward_pre_hook {
            pre_hooks.push(self.build_hook(hook_config, &name)?);
        }

        let mut post_hooks = Vec::with_capacity(config.forward_post_hook.len());
        for hook_config in &config.forward_post_hook {
            post_hooks.push(self.build_hook(hook_config, &name)?);
        }

        Ok(Step::new(name, kernel, pre_hooks, post_hooks))
    }

    /// Build a hook from its configuration record, bound to its owning step
    pub fn build_hook(&self, config: &HookConfig, owner: &str) -> Result<Box<dyn Hook>> {
        let mut hook = self.hooks.build(config, self)?;
        hook.bind(owner);
        Ok(hook)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
