pub mod fs;

use crate::preview::Preview;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Result of loading one task module: the component it exports as its
/// default value, if any. A module may load cleanly and still export
/// nothing usable.
#[derive(Debug, Clone, Default)]
pub struct LoadedModule {
    pub default: Option<Arc<dyn Preview>>,
}

/// Provider of task modules matching a discovery pattern. The loader only
/// needs enumerable keys and a per-key asynchronous load; how discovery is
/// implemented (filesystem walk, static map in tests) is up to the source.
#[async_trait]
pub trait TaskSource: Send + Sync {
    /// Relative paths of every module matching the discovery pattern.
    fn paths(&self) -> Vec<String>;

    /// Load one module by path. `Err` means the module is broken (unreadable
    /// or malformed); `Ok` with `default: None` means it loaded but exports
    /// no usable component.
    async fn load(&self, path: &str) -> Result<LoadedModule>;
}
