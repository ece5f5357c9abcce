//! Configuration surface for chain construction

use serde::{Deserialize, Serialize};

use crate::stream::StreamHandle;

use super::chain::build_filter_chain;
use super::registry::FilterRegistry;

/// Configuration for building a filter chain
///
/// This is the whole external configuration surface of chain construction:
/// an optional `:`-separated list of filter names and the record flag.
///
/// # Example
///
/// ```
/// use streamstack_core::filter::FilterChainConfig;
///
/// let config = FilterChainConfig::from_list("gzip").with_record(true);
/// assert_eq!(config.filters.as_deref(), Some("gzip"));
/// assert!(config.record);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterChainConfig {
    /// `:`-separated filter names, applied innermost-first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<String>,

    /// Append the recording filter after the named ones
    #[serde(default)]
    pub record: bool,
}

impl FilterChainConfig {
    /// Create a config with just a filter name list
    pub fn from_list(list: impl Into<String>) -> Self {
        Self {
            filters: Some(list.into()),
            ..Default::default()
        }
    }

    /// Set the record flag
    pub fn with_record(mut self, record: bool) -> Self {
        self.record = record;
        self
    }

    /// Build a filter chain over `source` per this configuration
    pub fn apply(&self, registry: &FilterRegistry, source: StreamHandle) -> StreamHandle {
        build_filter_chain(registry, source, self.filters.as_deref(), self.record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_defaults() {
        let config: FilterChainConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.filters, None);
        assert!(!config.record);
    }

    #[test]
    fn test_deserialize_full() {
        let config: FilterChainConfig =
            serde_json::from_str(r#"{"filters": "gzip:record", "record": true}"#).unwrap();
        assert_eq!(config.filters.as_deref(), Some("gzip:record"));
        assert!(config.record);
    }
}
