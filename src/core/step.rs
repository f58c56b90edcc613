//! Pipeline step
//!
//! A step is a named unit of work: a kernel implementing the forward
//! transformation, wrapped with ordered pre- and post-hooks and the
//! navigation links a pipeline list sets while wiring its sequence.

use crate::core::error::PipelineError;
use crate::core::hook::Hook;
use crate::core::record::Record;
use anyhow::Result;
use serde_json::Value;
use std::fmt;

/// The forward capability every step kind implements.
///
/// Kernels hold their own construction parameters and turn one record into
/// one output value; they never see hooks or neighbors.
pub trait Transform: Send + Sync {
    /// Consume a record, produce the step's output
    fn forward(&self, data: &Record) -> Result<Value>;
}

/// A single named unit of work with attached hooks
pub struct Step {
    name: String,
    kernel: Box<dyn Transform>,
    pre_hooks: Vec<Box<dyn Hook>>,
    post_hooks: Vec<Box<dyn Hook>>,
    prev: Option<usize>,
    post: Option<usize>,
}

impl Step {
    /// Assemble a step from its parts; navigation links start unset
    pub fn new(
        name: impl Into<String>,
        kernel: Box<dyn Transform>,
        pre_hooks: Vec<Box<dyn Hook>>,
        post_hooks: Vec<Box<dyn Hook>>,
    ) -> Self {
        Step {
            name: name.into(),
            kernel,
            pre_hooks,
            post_hooks,
            prev: None,
            post: None,
        }
    }

    /// Identifying name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index of the structurally previous step in the enclosing list
    pub fn prev(&self) -> Option<usize> {
        self.prev
    }

    /// Index of the structurally next step in the enclosing list
    pub fn post(&self) -> Option<usize> {
        self.post
    }

    pub(crate) fn set_prev(&mut self, index: usize) {
        self.prev = Some(index);
    }

    pub(crate) fn set_post(&mut self, index: usize) {
        self.post = Some(index);
    }

    /// Hooks invoked before forward, in invocation order
    pub fn pre_hooks(&self) -> &[Box<dyn Hook>] {
        &self.pre_hooks
    }

    /// Hooks invoked after forward, in invocation order
    pub fn post_hooks(&self) -> &[Box<dyn Hook>] {
        &self.post_hooks
    }

    /// Run the step: every pre-hook, then forward, then every post-hook.
    ///
    /// Post-hooks observe the original input record, not the transformed
    /// output. The first failing hook or forward aborts the invocation.
    pub fn invoke(&self, data: &Record) -> Result<Value> {
        tracing::debug!(step = %self.name, "invoking step");

        for hook in &self.pre_hooks {
            hook.inspect(data)
                .map_err(|source| PipelineError::step_failure(&self.name, source))?;
        }

        let output = self
            .kernel
            .forward(data)
            .map_err(|source| PipelineError::step_failure(&self.name, source))?;

        for hook in &self.post_hooks {
            hook.inspect(data)
                .map_err(|source| PipelineError::step_failure(&self.name, source))?;
        }

        Ok(output)
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("name", &self.name)
            .field("pre_hooks", &self.pre_hooks.len())
            .field("post_hooks", &self.post_hooks.len())
            .field("prev", &self.prev)
            .field("post", &self.post)
            .finish()
    }
}
