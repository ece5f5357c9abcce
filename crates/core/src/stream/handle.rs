//! The chain node handle
//!
//! A [`StreamHandle`] is one node of a filter chain. The innermost handle
//! wraps a [`ByteStream`] base source; every other handle wraps a bound
//! [`StreamFilter`] plus the handle it filters. The outermost handle is the
//! only one the caller ever holds; inner nodes are reachable exclusively
//! through their owner, so the ownership chain is what guarantees ordered
//! teardown.

use std::fmt;
use std::sync::{Arc, Weak};

use crate::filter::StreamFilter;
use crate::session::SessionContext;
use crate::Result;

use super::{ByteStream, DirEntry};

/// One node of a stream filter chain
///
/// Operations on a handle recurse inward: a filter node forwards to its
/// bound filter, which in turn reads from the wrapped inner handle, until
/// the base stream is reached.
///
/// Dropping a handle tears the chain down outermost-first: the node's
/// filter releases its resources while the inner handle is still alive,
/// then the inner handle is dropped the same way, down to the base stream.
pub struct StreamHandle {
    /// Source URL, if known. Owned copy, duplicated into every wrapping node.
    url: Option<String>,

    /// Back-reference to the owning session. Never owned by the handle.
    session: Weak<SessionContext>,

    /// Bytes pulled ahead of the backend by [`peek`](StreamHandle::peek),
    /// replayed by subsequent reads. Invalidated by seeks.
    peeked: Vec<u8>,

    backend: Backend,
}

enum Backend {
    /// Base stream, end of the chain
    Source(Box<dyn ByteStream>),

    /// Filter node. `filter` is released before `inner` on drop.
    Filter {
        filter: Box<dyn StreamFilter>,
        inner: Box<StreamHandle>,
    },
}

impl StreamHandle {
    /// Create the base handle of a chain from a byte-stream source
    pub fn from_source(
        session: &Arc<SessionContext>,
        url: Option<String>,
        stream: Box<dyn ByteStream>,
    ) -> Self {
        Self {
            url,
            session: Arc::downgrade(session),
            peeked: Vec::new(),
            backend: Backend::Source(stream),
        }
    }

    /// Wrap `inner` with a bound filter, propagating its identifying
    /// metadata into the new node. The new node takes ownership of `inner`.
    pub(crate) fn from_filter(filter: Box<dyn StreamFilter>, inner: Box<StreamHandle>) -> Self {
        Self {
            url: inner.url.clone(),
            session: inner.session.clone(),
            peeked: Vec::new(),
            backend: Backend::Filter { filter, inner },
        }
    }

    /// Source URL this stream was opened from, if known
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// The owning session's context, if it is still alive
    pub fn session(&self) -> Option<Arc<SessionContext>> {
        self.session.upgrade()
    }

    /// Name of the filter bound to this node, or `None` for a base handle
    pub fn filter_name(&self) -> Option<&str> {
        match &self.backend {
            Backend::Source(_) => None,
            Backend::Filter { filter, .. } => Some(filter.name()),
        }
    }

    /// The wrapped inner handle, or `None` for a base handle
    pub fn inner(&self) -> Option<&StreamHandle> {
        match &self.backend {
            Backend::Source(_) => None,
            Backend::Filter { inner, .. } => Some(inner),
        }
    }

    /// Number of filter nodes above the base stream (0 for a base handle)
    pub fn depth(&self) -> usize {
        match &self.backend {
            Backend::Source(_) => 0,
            Backend::Filter { inner, .. } => 1 + inner.depth(),
        }
    }

    /// Read up to `buf.len()` bytes, returning the count read
    ///
    /// Previously peeked bytes are drained before the backend is consulted.
    /// `Ok(0)` means end of stream.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if !self.peeked.is_empty() {
            let n = self.peeked.len().min(buf.len());
            buf[..n].copy_from_slice(&self.peeked[..n]);
            self.peeked.drain(..n);
            return Ok(n);
        }
        self.backend_read(buf)
    }

    /// Look at the next `want` bytes without consuming them
    ///
    /// Returns fewer than `want` bytes only when the stream ends early.
    /// The bytes remain available to subsequent reads.
    pub fn peek(&mut self, want: usize) -> Result<&[u8]> {
        while self.peeked.len() < want {
            let mut chunk = [0u8; 512];
            let missing = (want - self.peeked.len()).min(chunk.len());
            let n = self.backend_read(&mut chunk[..missing])?;
            if n == 0 {
                break;
            }
            self.peeked.extend_from_slice(&chunk[..n]);
        }
        let n = self.peeked.len().min(want);
        Ok(&self.peeked[..n])
    }

    /// Seek to an absolute byte position
    pub fn seek(&mut self, position: u64) -> Result<()> {
        self.peeked.clear();
        match &mut self.backend {
            Backend::Source(stream) => stream.seek(position),
            Backend::Filter { filter, inner } => filter.seek(inner, position),
        }
    }

    /// Whether [`seek`](StreamHandle::seek) can succeed on this handle
    pub fn can_seek(&self) -> bool {
        match &self.backend {
            Backend::Source(stream) => stream.can_seek(),
            Backend::Filter { filter, inner } => filter.can_seek(inner),
        }
    }

    /// Total stream size in bytes, if known
    pub fn size(&self) -> Option<u64> {
        match &self.backend {
            Backend::Source(stream) => stream.size(),
            Backend::Filter { filter, inner } => filter.size(inner),
        }
    }

    /// List the entries of a directory stream
    ///
    /// Filters without a listing of their own delegate verbatim to their
    /// inner handle.
    pub fn read_dir(&mut self) -> Result<Vec<DirEntry>> {
        match &mut self.backend {
            Backend::Source(stream) => stream.read_dir(),
            Backend::Filter { filter, inner } => filter.read_dir(inner),
        }
    }

    /// Read the remainder of the stream into `out`, returning the count read
    pub fn read_to_end(&mut self, out: &mut Vec<u8>) -> Result<usize> {
        let mut total = 0;
        let mut chunk = [0u8; 8192];
        loop {
            let n = self.read(&mut chunk)?;
            if n == 0 {
                return Ok(total);
            }
            out.extend_from_slice(&chunk[..n]);
            total += n;
        }
    }

    fn backend_read(&mut self, buf: &mut [u8]) -> Result<usize> {
        match &mut self.backend {
            Backend::Source(stream) => stream.read(buf),
            Backend::Filter { filter, inner } => filter.read(inner, buf),
        }
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        if let Backend::Filter { filter, inner } = &mut self.backend {
            // The filter releases its resources while the inner handle is
            // still alive; the inner chain then drops the same way.
            filter.close(inner);
        }
    }
}

impl fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamHandle")
            .field("url", &self.url)
            .field("filter", &self.filter_name())
            .field("depth", &self.depth())
            .finish()
    }
}
