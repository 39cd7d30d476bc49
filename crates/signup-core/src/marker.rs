//! Pending Signup Markers
//!
//! Bridges "buyer checked the signup box at checkout" to "signup was
//! attempted at completion". The marker is consumed on the first completion
//! event, so a re-fired event does not dispatch again.

use std::collections::HashSet;
use std::sync::RwLock;

/// Per-order pending-signup marker storage
///
/// The host may back this with its own persistent metadata store; markers
/// must survive until the completion event fires.
pub trait PendingSignupStore: Send + Sync {
    /// Record that the order requested signup at checkout
    fn mark_pending(&self, order_id: &str);

    /// Whether the order still has an unconsumed signup request
    fn is_pending(&self, order_id: &str) -> bool;

    /// Consume the marker (called on both success and failure)
    fn clear_pending(&self, order_id: &str);
}

/// In-memory marker store (for development and tests)
pub struct MemoryPendingStore {
    pending: RwLock<HashSet<String>>,
}

impl Default for MemoryPendingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPendingStore {
    pub fn new() -> Self {
        Self {
            pending: RwLock::new(HashSet::new()),
        }
    }
}

impl PendingSignupStore for MemoryPendingStore {
    fn mark_pending(&self, order_id: &str) {
        self.pending.write().unwrap().insert(order_id.to_string());
    }

    fn is_pending(&self, order_id: &str) -> bool {
        self.pending.read().unwrap().contains(order_id)
    }

    fn clear_pending(&self, order_id: &str) {
        self.pending.write().unwrap().remove(order_id);
    }
}
