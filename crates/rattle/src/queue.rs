use serde_json::Value;
use shared::{domain::WidgetId, protocol::Mutation};

/// Receives field changes from widgets as they are written.
pub trait MutationSink {
    fn notify(&mut self, id: &WidgetId, key: &str, value: &Value);
}

/// Field changes collected while one event is dispatched, in write order.
#[derive(Debug, Default)]
pub struct MutationQueue {
    pending: Vec<Mutation>,
}

impl MutationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn as_slice(&self) -> &[Mutation] {
        &self.pending
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Hands out everything queued so far and leaves the queue empty.
    pub fn take(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.pending)
    }
}

impl MutationSink for MutationQueue {
    fn notify(&mut self, id: &WidgetId, key: &str, value: &Value) {
        self.pending
            .push(Mutation::new(id.clone(), key, value.clone()));
    }
}

#[cfg(test)]
#[path = "tests/queue_tests.rs"]
mod tests;
