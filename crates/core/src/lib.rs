//! StreamStack Core - Layered byte-stream filter chains
//!
//! This crate builds and tears down linear chains of transforming stream
//! wrappers ("filters") on top of a base readable-stream source. Each
//! filter intercepts read/seek/control operations and may alter, interpret,
//! or re-expose the underlying byte stream (decompression, recording, ...).
//!
//! # Architecture
//!
//! - [`stream`] - base [`ByteStream`](stream::ByteStream) sources and the
//!   [`StreamHandle`](stream::StreamHandle) chain node. A chain is a
//!   singly-linked list of handles; each node exclusively owns its inner
//!   predecessor, and dropping the outermost handle unwinds the whole chain
//!   in strict outer-to-inner order.
//! - [`filter`] - the pluggable filter layer:
//!   [`FilterPlugin`](filter::FilterPlugin) factories in a
//!   [`FilterRegistry`](filter::FilterRegistry), plus the chain builders
//!   ([`insert_filter`](filter::insert_filter),
//!   [`probe_filters`](filter::probe_filters),
//!   [`build_filter_chain`](filter::build_filter_chain)).
//! - [`session`] - the [`SessionContext`] every chain node points back to,
//!   without owning it.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use streamstack_core::filter::{global_filter_registry, probe_filters};
//! use streamstack_core::stream::{MemoryStream, StreamHandle};
//! use streamstack_core::SessionContext;
//!
//! let session = Arc::new(SessionContext::new("example"));
//! let source = StreamHandle::from_source(
//!     &session,
//!     Some("mem://example".to_string()),
//!     Box::new(MemoryStream::new(b"raw bytes".to_vec())),
//! );
//!
//! // Probe for filters; plain bytes match none, so the source comes back.
//! let mut chain = probe_filters(global_filter_registry(), source);
//! assert_eq!(chain.depth(), 0);
//!
//! let mut out = Vec::new();
//! chain.read_to_end(&mut out).unwrap();
//! assert_eq!(out, b"raw bytes");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod filter;
pub mod session;
pub mod stream;

pub use error::{Error, Result};
pub use session::SessionContext;
