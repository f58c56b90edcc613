//! Capability registries
//!
//! One registry per capability family, each an isolated catalog of named
//! constructors. Registration is expected to happen once at startup from a
//! single thread; after that the registry is read-only and may be shared
//! freely.

use crate::core::catalog::Catalog;
use crate::core::config::ComponentConfig;
use crate::core::error::PipelineError;
use anyhow::Result;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A factory producing a component from its configuration record.
///
/// The catalog rides along so composite constructors can resolve the
/// components they contain.
pub type Constructor<C, T> = Arc<dyn Fn(&C, &Catalog) -> Result<T> + Send + Sync>;

/// A keyed catalog of constructors, scoped to one capability family
pub struct Registry<C, T> {
    family: &'static str,
    entries: HashMap<String, Constructor<C, T>>,
}

impl<C, T> Registry<C, T> {
    /// Create an empty registry for the given family
    pub fn new(family: &'static str) -> Self {
        Registry {
            family,
            entries: HashMap::new(),
        }
    }

    /// The capability family this registry serves
    pub fn family(&self) -> &'static str {
        self.family
    }

    /// Associate `name` with a constructor.
    ///
    /// Re-registering an existing name replaces the prior entry: the last
    /// registration wins. The overwrite is logged at warn level.
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn(&C, &Catalog) -> Result<T> + Send + Sync + 'static,
    {
        let name = name.into();
        if self
            .entries
            .insert(name.clone(), Arc::new(constructor))
            .is_some()
        {
            tracing::warn!(
                family = self.family,
                name = %name,
                "constructor re-registered, previous entry replaced"
            );
        }
    }

    /// Whether `name` has a registered constructor
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, sorted for stable listings
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Fail with UnregisteredComponent unless `name` is registered
    pub fn ensure(&self, name: &str) -> Result<(), PipelineError> {
        if self.contains(name) {
            Ok(())
        } else {
            Err(PipelineError::UnregisteredComponent {
                family: self.family,
                name: name.to_string(),
            })
        }
    }
}

impl<C: ComponentConfig, T> Registry<C, T> {
    /// Resolve the config's kind to a constructor and invoke it.
    ///
    /// The constructor receives the entire config, selector key included,
    /// plus the catalog so composite kinds can build their members.
    pub fn build(&self, config: &C, catalog: &Catalog) -> Result<T> {
        let name = config.kind();
        let constructor =
            self.entries
                .get(name)
                .ok_or_else(|| PipelineError::UnregisteredComponent {
                    family: self.family,
                    name: name.to_string(),
                })?;
        constructor(config, catalog)
    }
}

impl<C, T> fmt::Debug for Registry<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("family", &self.family)
            .field("names", &self.names())
            .finish()
    }
}
