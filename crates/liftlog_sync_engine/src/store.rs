//! Store adapter and collaborator traits.
//!
//! The engine never talks to a concrete datastore. The embedded local store
//! and the cloud document store are abstracted behind these traits, which
//! also makes the engine fully testable with the in-memory adapters in
//! [`crate::memory`].

use liftlog_model::{AccountId, Record, RecordId, RecordKind, Timestamp};
use thiserror::Error;

/// Result type for store adapter calls.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors reported by store adapters.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The underlying backend failed (I/O, network, serialization).
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A record expected to exist was not found.
    #[error("{kind} {id} not found")]
    NotFound {
        /// The record's collection.
        kind: RecordKind,
        /// The record's id.
        id: RecordId,
    },

    /// An active exercise with this name already exists for the owner.
    ///
    /// The merger resolves this locally by renaming; it is never surfaced
    /// to the caller of a sync.
    #[error("exercise name already in use: {name}")]
    NameConflict {
        /// The conflicting name.
        name: String,
    },
}

/// The device-local record store.
///
/// Writes are per-record atomic: a record's fields are always replaced
/// wholesale, never partially, so a concurrent reader never observes a
/// half-merged record.
pub trait LocalStore: Send + Sync {
    /// All non-deleted records of a kind.
    fn list_active(&self, kind: RecordKind) -> StoreResult<Vec<Record>>;

    /// Non-deleted records with no remote acknowledgment (`synced_at` unset).
    fn list_unsynced(&self, kind: RecordKind) -> StoreResult<Vec<Record>>;

    /// Soft-deleted records awaiting delete upload.
    fn list_tombstones(&self, kind: RecordKind) -> StoreResult<Vec<Record>>;

    /// Looks up a record by id, tombstoned or not.
    fn get(&self, kind: RecordKind, id: RecordId) -> StoreResult<Option<Record>>;

    /// Inserts or wholesale-replaces a record.
    fn upsert(&self, record: Record) -> StoreResult<()>;

    /// Turns a record into a tombstone.
    fn soft_delete(&self, kind: RecordKind, id: RecordId, deleted_at: Timestamp)
        -> StoreResult<()>;

    /// Removes a record entirely. Only called after the remote store has
    /// acknowledged the deletion, or when the remote copy is itself deleted.
    fn hard_purge(&self, kind: RecordKind, id: RecordId) -> StoreResult<()>;

    /// Measurement ids deleted locally but not yet deleted remotely.
    ///
    /// Measurements track deletions through this id list instead of the
    /// tombstone flag the other kinds use.
    fn pending_measurement_deletions(&self) -> StoreResult<Vec<RecordId>>;

    /// Queues a measurement deletion for the next upload cycle.
    fn queue_measurement_deletion(&self, id: RecordId) -> StoreResult<()>;

    /// Drops a measurement id from the pending-deletion list after the
    /// remote store acknowledged the deletion.
    fn clear_measurement_deletion(&self, id: RecordId) -> StoreResult<()>;
}

/// The cloud-hosted, per-account document store.
pub trait RemoteStore: Send + Sync {
    /// Records of a kind changed since the given marker (all when `None`).
    ///
    /// The boundary is inclusive; re-downloading a record the device has
    /// already merged is safe because merging is idempotent.
    fn list_since(
        &self,
        account: AccountId,
        kind: RecordKind,
        since: Option<Timestamp>,
    ) -> StoreResult<Vec<Record>>;

    /// Inserts or replaces a record by id.
    fn upsert(&self, account: AccountId, record: &Record) -> StoreResult<()>;

    /// Flags a record as deleted by id.
    fn mark_deleted(
        &self,
        account: AccountId,
        kind: RecordKind,
        id: RecordId,
        deleted_at: Timestamp,
    ) -> StoreResult<()>;
}

/// Supplies the currently signed-in account, if any.
pub trait IdentityProvider: Send + Sync {
    /// The current account id, or `None` when signed out.
    fn current_account(&self) -> Option<AccountId>;
}

/// Reports network connectivity.
pub trait ConnectivityProvider: Send + Sync {
    /// True when the device can reach the remote store.
    fn is_connected(&self) -> bool;
}
