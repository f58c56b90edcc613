//! Component configuration records
//!
//! Declarative, data-only records that select a registered constructor by
//! name and carry its construction parameters. Known fields are typed;
//! everything else lands in the flattened `params` map and is forwarded to
//! the constructor verbatim.

use crate::core::catalog::Catalog;
use crate::core::pipeline::PIPELINE_KEY;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Anything a registry can build: a config record that names its constructor
pub trait ComponentConfig {
    /// The registered constructor this record selects
    fn kind(&self) -> &str;
}

/// Configuration for one pipeline step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepConfig {
    /// Registered step kind to construct; doubles as the instance name
    pub name: String,

    /// Optional display name override for diagnostics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Hooks invoked before forward, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub forward_pre_hook: Vec<HookConfig>,

    /// Hooks invoked after forward, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub forward_post_hook: Vec<HookConfig>,

    /// Kind-specific fields, forwarded to the constructor untouched
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

/// Configuration for one hook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookConfig {
    /// Registered hook kind to construct; doubles as the instance name
    pub name: String,

    /// Optional display name override for diagnostics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Kind-specific fields, forwarded to the constructor untouched
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl ComponentConfig for StepConfig {
    fn kind(&self) -> &str {
        &self.name
    }
}

impl ComponentConfig for HookConfig {
    fn kind(&self) -> &str {
        &self.name
    }
}

impl StepConfig {
    /// Shorthand for a config carrying nothing but a kind name
    pub fn named(name: impl Into<String>) -> Self {
        StepConfig {
            name: name.into(),
            label: None,
            forward_pre_hook: Vec::new(),
            forward_post_hook: Vec::new(),
            params: Map::new(),
        }
    }

    /// The identifying name for instances built from this config
    pub fn instance_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// Load a step configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.as_ref().display()))?;
        Self::from_yaml(&content)
    }

    /// Parse a step configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: StepConfig = serde_yaml::from_str(yaml).context("invalid pipeline config")?;
        Ok(config)
    }

    /// Parse a step configuration from a JSON value
    pub fn from_json(value: Value) -> Result<Self> {
        let config: StepConfig =
            serde_json::from_value(value).context("invalid pipeline config")?;
        Ok(config)
    }

    /// Check that every step and hook kind this config references is
    /// registered, without constructing anything.
    ///
    /// Recurses through nested `pipeline` arrays so a composite config is
    /// checked to the leaves before any constructor side effects run.
    pub fn validate(&self, catalog: &Catalog) -> Result<()> {
        catalog.steps.ensure(&self.name)?;

        for hook in self
            .forward_pre_hook
            .iter()
            .chain(&self.forward_post_hook)
        {
            catalog.hooks.ensure(&hook.name)?;
        }

        if let Some(value) = self.params.get(PIPELINE_KEY) {
            let nested: Vec<StepConfig> = serde_json::from_value(value.clone())
                .with_context(|| {
                    format!(
                        "{}: '{}' must be a list of step configs",
                        self.instance_name(),
                        PIPELINE_KEY
                    )
                })?;
            for step in &nested {
                step.validate(catalog)?;
            }
        }

        Ok(())
    }
}

impl HookConfig {
    /// Shorthand for a config carrying nothing but a kind name
    pub fn named(name: impl Into<String>) -> Self {
        HookConfig {
            name: name.into(),
            label: None,
            params: Map::new(),
        }
    }

    /// The identifying name for instances built from this config
    pub fn instance_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}
