//! Hook contract
//!
//! Hooks observe the record flowing through a step; steps transform it.
//! A hook receives the record by shared reference and cannot mutate it.

use crate::core::record::Record;
use anyhow::Result;
use std::fmt;

/// A non-mutating inspection unit invoked around a step's forward.
///
/// Implementations exist for side effects such as logging or counting;
/// any value a hook computes is discarded. A returned error is programmer
/// error rather than control flow, and aborts the owning step's invocation.
pub trait Hook: Send + Sync {
    /// Identifying name, defaulting to the registered kind name
    fn name(&self) -> &str;

    /// Observe the record the owning step is about to see (or just saw)
    fn inspect(&self, data: &Record) -> Result<()>;

    /// Remember the owning step's name.
    ///
    /// Called once while the step is assembled. The name is kept for
    /// diagnostics only; it plays no part in ownership or lifecycle.
    fn bind(&mut self, _owner: &str) {}
}

impl fmt::Debug for dyn Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook").field("name", &self.name()).finish()
    }
}
