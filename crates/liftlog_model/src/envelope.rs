//! Sync envelope shared by every record kind.

use crate::ids::{AccountId, RecordId, Timestamp};
use serde::{Deserialize, Serialize};

/// Sync bookkeeping carried by every record.
///
/// Lifecycle: created dirty (`synced_at = None`) → mutated any number of
/// times (stays dirty) → uploaded (`synced_at = Some(now)`) → mutated again
/// (dirty) or soft-deleted (tombstone) → delete acknowledged remotely →
/// hard-purged locally.
///
/// # Invariants
///
/// - `id` is immutable for the record's whole lifecycle.
/// - Every local mutation must clear `synced_at` before the next upload
///   cycle can re-set it; a record is never considered synced while stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncEnvelope {
    /// Globally unique record identifier, generated on the authoring device.
    pub id: RecordId,
    /// Owning account; `None` until associated with an account.
    pub owner_id: Option<AccountId>,
    /// When the remote store last acknowledged this record.
    pub synced_at: Option<Timestamp>,
    /// Soft-delete flag.
    pub deleted: bool,
    /// When the record was soft-deleted.
    pub deleted_at: Option<Timestamp>,
}

impl SyncEnvelope {
    /// Creates a fresh envelope for a newly authored record (dirty).
    pub fn new(owner_id: Option<AccountId>) -> Self {
        Self {
            id: RecordId::new(),
            owner_id,
            synced_at: None,
            deleted: false,
            deleted_at: None,
        }
    }

    /// Returns true if the record has local changes the remote has not seen.
    pub fn is_dirty(&self) -> bool {
        self.synced_at.is_none()
    }

    /// Returns true if the record is a soft-deleted tombstone.
    pub fn is_tombstone(&self) -> bool {
        self.deleted
    }

    /// Marks the record as mutated locally, clearing the sync acknowledgment.
    pub fn mark_dirty(&mut self) {
        self.synced_at = None;
    }

    /// Records a remote acknowledgment.
    pub fn mark_synced(&mut self, at: Timestamp) {
        self.synced_at = Some(at);
    }

    /// Turns the record into a tombstone awaiting delete upload.
    pub fn mark_deleted(&mut self, at: Timestamp) {
        self.deleted = true;
        self.deleted_at = Some(at);
        self.synced_at = None;
    }

    /// Reverts a tombstone back to an active record (zombie revival).
    ///
    /// The id is kept; the record comes back dirty so the revival is
    /// uploaded on the next cycle.
    pub fn revive(&mut self) {
        self.deleted = false;
        self.deleted_at = None;
        self.synced_at = None;
    }
}
