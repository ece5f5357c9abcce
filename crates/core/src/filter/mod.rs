//! Stream filter chains
//!
//! This module provides the pluggable filter layer that sits between a
//! base [`ByteStream`](crate::stream::ByteStream) source and its consumer.
//! Filters intercept read/seek/control operations and may alter, interpret,
//! or re-expose the underlying byte stream (decompression, recording, ...).
//!
//! # Architecture
//!
//! 1. **[`FilterPlugin`]** - Factory for filters. Registered with a
//!    [`FilterRegistry`] under a unique name; probes a stream and opens a
//!    filter over it.
//!
//! 2. **[`StreamFilter`]** - A bound filter instance. Receives the wrapped
//!    inner handle on every operation and forwards, transforms, or rejects
//!    as appropriate.
//!
//! 3. **Chain construction** - [`insert_filter`] wraps one node,
//!    [`probe_filters`] grows the longest automatically-detected chain, and
//!    [`build_filter_chain`] applies an explicit `:`-separated name list.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use streamstack_core::filter::{build_filter_chain, global_filter_registry};
//! use streamstack_core::stream::{MemoryStream, StreamHandle};
//! use streamstack_core::SessionContext;
//!
//! let session = Arc::new(SessionContext::new("demo"));
//! let source = StreamHandle::from_source(
//!     &session,
//!     None,
//!     Box::new(MemoryStream::new(b"plain bytes".to_vec())),
//! );
//!
//! // No names, no record filter: the source comes back untouched.
//! let chain = build_filter_chain(global_filter_registry(), source, None, false);
//! assert_eq!(chain.depth(), 0);
//! ```
//!
//! ## Implementing a Custom Filter
//!
//! ```ignore
//! use streamstack_core::filter::{FilterPlugin, StreamFilter};
//! use streamstack_core::stream::StreamHandle;
//!
//! pub struct UpperPlugin;
//!
//! impl FilterPlugin for UpperPlugin {
//!     fn name(&self) -> &'static str { "upper" }
//!
//!     fn open(&self, source: &mut StreamHandle) -> Result<Box<dyn StreamFilter>, Error> {
//!         Ok(Box::new(UpperFilter))
//!     }
//! }
//!
//! // Register with a registry
//! registry.register(Arc::new(UpperPlugin))?;
//! ```
//!
//! # Built-in Filters
//!
//! The following filters are registered with the global registry:
//!
//! | Filter | Auto-probed | Description |
//! |--------|-------------|-------------|
//! | `gzip` | yes | Transparent gzip decompression |
//! | `record` | no | Tee of every byte read into a dump file |

use crate::stream::{DirEntry, StreamHandle};
use crate::Result;

// Sub-modules
pub mod chain;
pub mod config;
pub mod gzip;
pub mod record;
pub mod registry;

// Re-export all public types
pub use chain::{build_filter_chain, insert_filter, probe_filters, RECORD_FILTER};
pub use config::FilterChainConfig;
pub use gzip::GzipPlugin;
pub use record::RecordPlugin;
pub use registry::{global_filter_registry, FilterRegistry};

/// Factory for stream filters
///
/// Plugins are registered with a [`FilterRegistry`] and asked, one by one,
/// whether they can wrap a given stream. Opening is the capability probe:
/// a plugin that cannot improve the stream returns an error and the stream
/// is left for the next candidate.
pub trait FilterPlugin: Send + Sync {
    /// Filter name (e.g., "gzip", "record")
    ///
    /// Must be unique across all registered plugins.
    fn name(&self) -> &'static str;

    /// Whether this plugin participates in automatic probing
    ///
    /// Filters that only make sense when explicitly requested (the record
    /// filter) return `false` so [`probe_filters`] never binds them.
    fn auto_probe(&self) -> bool {
        true
    }

    /// Probe `source` and open a filter over it
    ///
    /// Probing may peek or read from `source`; implementations that peek
    /// leave the bytes available for the filter's own reads. An error means
    /// "this stream is not for me" and must leave `source` usable.
    fn open(&self, source: &mut StreamHandle) -> Result<Box<dyn StreamFilter>>;
}

/// A filter bound to one chain node
///
/// Every operation receives the wrapped inner handle, so filters hold only
/// their own state. All operations except [`read`](StreamFilter::read)
/// default to verbatim delegation to the inner handle.
pub trait StreamFilter: Send {
    /// Name of this filter (matches the plugin that opened it)
    fn name(&self) -> &'static str;

    /// Read up to `buf.len()` transformed bytes from the inner handle
    fn read(&mut self, source: &mut StreamHandle, buf: &mut [u8]) -> Result<usize>;

    /// Seek to an absolute position in the transformed stream
    fn seek(&mut self, source: &mut StreamHandle, position: u64) -> Result<()> {
        source.seek(position)
    }

    /// Whether seeking the transformed stream can succeed
    fn can_seek(&self, source: &StreamHandle) -> bool {
        source.can_seek()
    }

    /// Size of the transformed stream, if known
    fn size(&self, source: &StreamHandle) -> Option<u64> {
        source.size()
    }

    /// List directory entries
    ///
    /// Filters without a listing of their own delegate verbatim to the
    /// inner handle.
    fn read_dir(&mut self, source: &mut StreamHandle) -> Result<Vec<DirEntry>> {
        source.read_dir()
    }

    /// Release filter resources
    ///
    /// Called exactly once, during chain teardown, while `source` is still
    /// alive. Infallible from the caller's perspective.
    fn close(&mut self, source: &mut StreamHandle) {
        let _ = source;
    }
}
