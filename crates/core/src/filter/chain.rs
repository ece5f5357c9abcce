//! Filter chain construction
//!
//! A chain is built by repeatedly wrapping a [`StreamHandle`] with filter
//! nodes, either from an explicit `:`-separated name list or by probing
//! every registered filter until none claims the stream. Construction never
//! fails: at worst the caller gets the original source back untouched.
//! Teardown is the handle's drop glue and runs strictly outermost-first.

use crate::stream::StreamHandle;

use super::registry::FilterRegistry;

/// Name of the recording filter appended by [`build_filter_chain`]
pub const RECORD_FILTER: &str = "record";

/// Outcome of a single link attempt
///
/// `Ok` carries the new outer node, which now owns the source. `Err`
/// carries the unchanged source back to the caller; a failed attempt never
/// consumes it.
pub type LinkResult = std::result::Result<StreamHandle, StreamHandle>;

/// Wrap `source` with one filter node
///
/// A new node is allocated with `source`'s identifying metadata (url,
/// session back-reference) and `source` as its inner handle, then the
/// registry is asked to bind a filter: the named one, or with `name =
/// None` the first auto-probed plugin that accepts the stream.
///
/// On resolution failure the partial node is discarded and ownership of
/// the untouched `source` returns to the caller through the `Err` arm, so
/// callers can keep using it: no double release, no side effects.
pub fn insert_filter(
    registry: &FilterRegistry,
    source: StreamHandle,
    name: Option<&str>,
) -> LinkResult {
    let mut inner = Box::new(source);
    match registry.resolve(&mut inner, name) {
        Some(filter) => Ok(StreamHandle::from_filter(filter, inner)),
        None => Err(*inner),
    }
}

/// Grow the longest automatically-detected filter chain over `source`
///
/// Repeatedly asks the registry for "any matching filter" and keeps the
/// wrapped result until no plugin claims the stream. Never fails; returns
/// at least `source` itself.
///
/// Termination relies on the registered plugins: a probing plugin must
/// decline a stream it cannot improve, otherwise the loop would wrap
/// indefinitely. There is deliberately no depth guard here.
pub fn probe_filters(registry: &FilterRegistry, source: StreamHandle) -> StreamHandle {
    let mut current = source;
    loop {
        match insert_filter(registry, current, None) {
            Ok(filtered) => {
                tracing::debug!(
                    filter = filtered.filter_name().unwrap_or_default(),
                    url = filtered.url().unwrap_or_default(),
                    depth = filtered.depth(),
                    "stream filter added"
                );
                current = filtered;
            }
            Err(unchanged) => return unchanged,
        }
    }
}

/// Build a filter chain from an explicit name list
///
/// `list` is split on `':'`; tokens are applied in order, the first one
/// wrapping `source` directly. A token that fails to resolve is skipped
/// with a warning and the remaining tokens still apply; earlier successes
/// are kept, there is no rollback. With `record` set, the
/// [`RECORD_FILTER`] is appended best-effort after all named filters.
///
/// Always returns a usable handle; identity when every step failed.
pub fn build_filter_chain(
    registry: &FilterRegistry,
    source: StreamHandle,
    list: Option<&str>,
    record: bool,
) -> StreamHandle {
    let mut current = source;

    if let Some(list) = list {
        for token in list.split(':').filter(|t| !t.is_empty()) {
            match insert_filter(registry, current, Some(token)) {
                Ok(filtered) => current = filtered,
                Err(unchanged) => {
                    tracing::warn!(filter = token, "failed to insert stream filter");
                    current = unchanged;
                }
            }
        }
    }

    if record {
        current = match insert_filter(registry, current, Some(RECORD_FILTER)) {
            Ok(filtered) => filtered,
            Err(unchanged) => unchanged,
        };
    }

    current
}
