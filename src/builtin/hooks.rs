//! Sample hook kinds

use crate::core::catalog::Catalog;
use crate::core::config::HookConfig;
use crate::core::error::PipelineError;
use crate::core::hook::Hook;
use crate::core::record::Record;
use anyhow::Result;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Register the sample hook kinds
pub fn install(catalog: &mut Catalog) {
    catalog.hooks.register("Trace", |config: &HookConfig, _: &Catalog| {
        Ok(Box::new(TraceHook::new(config.instance_name())) as Box<dyn Hook>)
    });
    catalog.hooks.register("Require", |config: &HookConfig, _: &Catalog| {
        Ok(Box::new(RequireHook::from_config(config)?) as Box<dyn Hook>)
    });
}

/// Logs the record it observes
pub struct TraceHook {
    name: String,
    owner: Option<String>,
}

impl TraceHook {
    pub fn new(name: impl Into<String>) -> Self {
        TraceHook {
            name: name.into(),
            owner: None,
        }
    }
}

impl Hook for TraceHook {
    fn name(&self) -> &str {
        &self.name
    }

    fn inspect(&self, data: &Record) -> Result<()> {
        let owner = self.owner.as_deref().unwrap_or("<detached>");
        tracing::info!(
            hook = %self.name,
            step = %owner,
            record = %serde_json::Value::Object(data.clone()),
            "trace"
        );
        Ok(())
    }

    fn bind(&mut self, owner: &str) {
        self.owner = Some(owner.to_string());
    }
}

/// Asserts that a field is present in the record
#[derive(Debug)]
pub struct RequireHook {
    name: String,
    field: String,
    owner: Option<String>,
}

impl RequireHook {
    pub fn from_config(config: &HookConfig) -> Result<Self> {
        let field = config
            .params
            .get("field")
            .and_then(Value::as_str)
            .ok_or_else(|| PipelineError::MissingRequiredConfig {
                component: config.instance_name().to_string(),
                key: "field",
            })?
            .to_string();

        Ok(RequireHook {
            name: config.instance_name().to_string(),
            field,
            owner: None,
        })
    }
}

impl Hook for RequireHook {
    fn name(&self) -> &str {
        &self.name
    }

    fn inspect(&self, data: &Record) -> Result<()> {
        if data.contains_key(&self.field) {
            Ok(())
        } else {
            let owner = self.owner.as_deref().unwrap_or("<detached>");
            anyhow::bail!(
                "required field '{}' missing from the record entering '{}'",
                self.field,
                owner
            )
        }
    }

    fn bind(&mut self, owner: &str) {
        self.owner = Some(owner.to_string());
    }
}

/// Counts invocations through a counter supplied by the caller.
///
/// Shared state reaches a hook by closure capture in its registered
/// constructor, so several instances can tick the same counter:
///
/// ```
/// use hookline::builtin::CountHook;
/// use hookline::{Catalog, Hook};
/// use std::sync::atomic::AtomicU64;
/// use std::sync::Arc;
///
/// let mut catalog = Catalog::new();
/// let hits = Arc::new(AtomicU64::new(0));
/// let counter = hits.clone();
/// catalog.hooks.register("Counter", move |_, _| {
///     Ok(Box::new(CountHook::new(counter.clone())) as Box<dyn Hook>)
/// });
/// ```
pub struct CountHook {
    name: String,
    hits: Arc<AtomicU64>,
}

impl CountHook {
    pub fn new(hits: Arc<AtomicU64>) -> Self {
        CountHook {
            name: "Count".to_string(),
            hits,
        }
    }

    /// Invocations observed so far
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }
}

impl Hook for CountHook {
    fn name(&self) -> &str {
        &self.name
    }

    fn inspect(&self, _data: &Record) -> Result<()> {
        self.hits.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
