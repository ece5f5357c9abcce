//! Session context shared by every node of a filter chain.

use uuid::Uuid;

/// Context owned by the session that opened a stream.
///
/// Every [`StreamHandle`](crate::stream::StreamHandle) in a chain keeps a
/// `Weak` back-reference to the context of the session it belongs to. The
/// session holds the owning `Arc` and must keep it alive for as long as any
/// chain built under it exists; the chain itself never owns the context.
#[derive(Debug)]
pub struct SessionContext {
    /// Unique session id
    id: Uuid,

    /// Human-readable session label (shown in diagnostics)
    label: String,
}

impl SessionContext {
    /// Create a new session context with a random id
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
        }
    }

    /// Unique id of this session
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Session label
    pub fn label(&self) -> &str {
        &self.label
    }
}
