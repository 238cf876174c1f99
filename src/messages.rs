//! The status log: an append-only list of human-readable outcome lines.

use parking_lot::Mutex;
use std::sync::Arc;

/// Shared handle to a status log. Clones see the same lines; a fresh
/// `MessageLog::new()` is an isolated instance.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, message: impl Into<String>) {
        self.lines.lock().push(message.into());
    }

    /// Snapshot of the current contents, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    pub fn last(&self) -> Option<String> {
        self.lines.lock().last().cloned()
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}
