//! Plugin registry for stream filters
//!
//! This module provides the [`FilterRegistry`] that maps filter names (or
//! "any matching filter") to concrete [`StreamFilter`] instances during
//! chain construction.

use std::sync::{Arc, OnceLock, RwLock};

use crate::stream::StreamHandle;
use crate::{Error, Result};

use super::{FilterPlugin, StreamFilter};

/// Global singleton filter registry
static GLOBAL_REGISTRY: OnceLock<FilterRegistry> = OnceLock::new();

/// Get the global filter registry
///
/// The registry is lazily initialized with built-in plugins on first
/// access: the `gzip` decompression filter and the `record` tee filter.
///
/// # Example
///
/// ```
/// use streamstack_core::filter::global_filter_registry;
///
/// let registry = global_filter_registry();
/// assert!(registry.list().contains(&"gzip".to_string()));
/// ```
pub fn global_filter_registry() -> &'static FilterRegistry {
    GLOBAL_REGISTRY.get_or_init(|| {
        let registry = FilterRegistry::new();

        if let Err(e) = registry.register(Arc::new(super::gzip::GzipPlugin)) {
            tracing::warn!("Failed to register gzip filter: {}", e);
        }
        if let Err(e) = registry.register(Arc::new(super::record::RecordPlugin::default())) {
            tracing::warn!("Failed to register record filter: {}", e);
        }

        registry
    })
}

/// Registry of filter plugins
///
/// Resolution is either by exact name or by probing every auto-probe
/// eligible plugin in registration order and binding the first that
/// accepts the stream.
///
/// # Thread Safety
///
/// The registry uses `RwLock` internally; registration is write-locked,
/// resolution snapshots the plugin list so no lock is held across probes.
#[derive(Default)]
pub struct FilterRegistry {
    /// Plugins in registration order (probe order)
    plugins: RwLock<Vec<Arc<dyn FilterPlugin>>>,
}

impl std::fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("plugins", &self.list())
            .finish()
    }
}

impl FilterRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            plugins: RwLock::new(Vec::new()),
        }
    }

    /// Register a plugin
    ///
    /// Registration order is probe order for automatic resolution.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyRegistered`] if a plugin with the same name
    /// is already present.
    pub fn register(&self, plugin: Arc<dyn FilterPlugin>) -> Result<()> {
        let mut plugins = self
            .plugins
            .write()
            .map_err(|e| Error::Config(format!("Failed to acquire plugins lock: {}", e)))?;

        if plugins.iter().any(|p| p.name() == plugin.name()) {
            return Err(Error::AlreadyRegistered(plugin.name().to_string()));
        }

        plugins.push(plugin);
        Ok(())
    }

    /// Resolve a filter for `source`
    ///
    /// With a name, the named plugin alone is consulted. Without one, every
    /// auto-probe eligible plugin is tried in registration order and the
    /// first that accepts the stream is bound. A plugin error counts as a
    /// decline and is logged at debug level only.
    pub fn resolve(
        &self,
        source: &mut StreamHandle,
        name: Option<&str>,
    ) -> Option<Box<dyn StreamFilter>> {
        let plugins: Vec<_> = match self.plugins.read() {
            Ok(plugins) => plugins.iter().cloned().collect(),
            Err(e) => {
                tracing::warn!("Failed to acquire plugins lock: {}", e);
                return None;
            }
        };

        match name {
            Some(name) => {
                let plugin = plugins.iter().find(|p| p.name() == name)?;
                match plugin.open(source) {
                    Ok(filter) => Some(filter),
                    Err(e) => {
                        tracing::debug!(filter = name, error = %e, "filter declined stream");
                        None
                    }
                }
            }
            None => {
                for plugin in plugins.iter().filter(|p| p.auto_probe()) {
                    match plugin.open(source) {
                        Ok(filter) => return Some(filter),
                        Err(e) => {
                            tracing::debug!(
                                filter = plugin.name(),
                                error = %e,
                                "filter declined stream"
                            );
                        }
                    }
                }
                None
            }
        }
    }

    /// Get a plugin by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn FilterPlugin>> {
        self.plugins
            .read()
            .ok()
            .and_then(|plugins| plugins.iter().find(|p| p.name() == name).cloned())
    }

    /// List all registered filter names, in registration order
    pub fn list(&self) -> Vec<String> {
        self.plugins
            .read()
            .map(|plugins| plugins.iter().map(|p| p.name().to_string()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::stream::MemoryStream;
    use crate::SessionContext;

    struct NullFilter(&'static str);

    impl StreamFilter for NullFilter {
        fn name(&self) -> &'static str {
            self.0
        }

        fn read(&mut self, source: &mut StreamHandle, buf: &mut [u8]) -> Result<usize> {
            source.read(buf)
        }
    }

    struct MockPlugin {
        name: &'static str,
        accepts: bool,
        auto: bool,
    }

    impl FilterPlugin for MockPlugin {
        fn name(&self) -> &'static str {
            self.name
        }

        fn auto_probe(&self) -> bool {
            self.auto
        }

        fn open(&self, _source: &mut StreamHandle) -> Result<Box<dyn StreamFilter>> {
            if self.accepts {
                Ok(Box::new(NullFilter(self.name)))
            } else {
                Err(Error::Config("mock plugin declines".to_string()))
            }
        }
    }

    fn handle() -> StreamHandle {
        let session = Arc::new(SessionContext::new("registry-test"));
        StreamHandle::from_source(&session, None, Box::new(MemoryStream::new(Vec::new())))
    }

    #[test]
    fn test_register_and_lookup_by_name() {
        let registry = FilterRegistry::new();
        registry
            .register(Arc::new(MockPlugin {
                name: "mock",
                accepts: true,
                auto: true,
            }))
            .unwrap();

        assert!(registry.get("mock").is_some());
        assert!(registry.get("nonexistent").is_none());
        assert_eq!(registry.list(), ["mock"]);
    }

    #[test]
    fn test_duplicate_registration_returns_error() {
        let registry = FilterRegistry::new();
        registry
            .register(Arc::new(MockPlugin {
                name: "duplicate",
                accepts: true,
                auto: true,
            }))
            .unwrap();

        let result = registry.register(Arc::new(MockPlugin {
            name: "duplicate",
            accepts: false,
            auto: false,
        }));

        assert!(matches!(result, Err(Error::AlreadyRegistered(name)) if name == "duplicate"));
    }

    #[test]
    fn test_named_resolution_ignores_other_plugins() {
        let registry = FilterRegistry::new();
        registry
            .register(Arc::new(MockPlugin {
                name: "yes",
                accepts: true,
                auto: true,
            }))
            .unwrap();
        registry
            .register(Arc::new(MockPlugin {
                name: "no",
                accepts: false,
                auto: true,
            }))
            .unwrap();

        let mut source = handle();
        assert!(registry.resolve(&mut source, Some("no")).is_none());
        assert!(registry.resolve(&mut source, Some("unknown")).is_none());

        let filter = registry.resolve(&mut source, Some("yes")).unwrap();
        assert_eq!(filter.name(), "yes");
    }

    #[test]
    fn test_probe_binds_first_accepting_plugin() {
        let registry = FilterRegistry::new();
        registry
            .register(Arc::new(MockPlugin {
                name: "declines",
                accepts: false,
                auto: true,
            }))
            .unwrap();
        registry
            .register(Arc::new(MockPlugin {
                name: "first",
                accepts: true,
                auto: true,
            }))
            .unwrap();
        registry
            .register(Arc::new(MockPlugin {
                name: "second",
                accepts: true,
                auto: true,
            }))
            .unwrap();

        let mut source = handle();
        let filter = registry.resolve(&mut source, None).unwrap();
        assert_eq!(filter.name(), "first");
    }

    #[test]
    fn test_probe_skips_non_auto_plugins() {
        let registry = FilterRegistry::new();
        registry
            .register(Arc::new(MockPlugin {
                name: "explicit-only",
                accepts: true,
                auto: false,
            }))
            .unwrap();

        let mut source = handle();
        assert!(registry.resolve(&mut source, None).is_none());

        // Still reachable by name
        assert!(registry.resolve(&mut source, Some("explicit-only")).is_some());
    }
}
