//! Observable sync status.
//!
//! Each engine instance owns its own [`StatusCell`]; there is no ambient
//! global sync state. UI collaborators read a snapshot or subscribe for
//! change notifications.

use liftlog_model::Timestamp;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A snapshot of the engine's sync state for status display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStatus {
    /// Whether the device currently has connectivity.
    pub is_online: bool,
    /// Whether a full sync is in flight.
    pub is_syncing: bool,
    /// When the last full sync completed successfully.
    pub last_synced_at: Option<Timestamp>,
    /// Records waiting to be uploaded (dirty, tombstoned, or pending
    /// measurement deletions).
    pub pending_uploads: u64,
    /// The most recent sync error, cleared on the next success.
    pub error: Option<String>,
}

/// Handle returned by [`StatusCell::subscribe`], used to unsubscribe.
pub type SubscriptionId = u64;

type StatusCallback = Arc<dyn Fn(&SyncStatus) + Send + Sync>;

/// Interior-mutable holder for the status plus its subscribers.
pub struct StatusCell {
    status: Mutex<SyncStatus>,
    subscribers: Mutex<Vec<(SubscriptionId, StatusCallback)>>,
    next_subscription: AtomicU64,
}

impl StatusCell {
    /// Creates a cell with the given initial status.
    pub fn new(initial: SyncStatus) -> Self {
        Self {
            status: Mutex::new(initial),
            subscribers: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
        }
    }

    /// Returns a snapshot of the current status.
    pub fn get(&self) -> SyncStatus {
        self.status.lock().clone()
    }

    /// Mutates the status and notifies all subscribers with the new value.
    pub fn update(&self, apply: impl FnOnce(&mut SyncStatus)) {
        let snapshot = {
            let mut status = self.status.lock();
            apply(&mut status);
            status.clone()
        };
        // Callbacks run outside both locks so a subscriber may read the
        // cell or subscribe/unsubscribe from inside its callback.
        let subscribers: Vec<StatusCallback> = self
            .subscribers
            .lock()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in subscribers {
            callback(&snapshot);
        }
    }

    /// Registers a callback invoked on every status change.
    pub fn subscribe(&self, callback: impl Fn(&SyncStatus) + Send + Sync + 'static) -> SubscriptionId {
        let id = self.next_subscription.fetch_add(1, Ordering::SeqCst);
        self.subscribers.lock().push((id, Arc::new(callback)));
        id
    }

    /// Removes a subscription. Returns false if the id was unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.lock();
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }
}

impl Default for StatusCell {
    fn default() -> Self {
        Self::new(SyncStatus::default())
    }
}
