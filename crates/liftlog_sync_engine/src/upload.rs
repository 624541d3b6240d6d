//! Upload reconciler: pushes dirty records and tombstones to the remote
//! store.

use crate::error::{SyncError, SyncResult};
use crate::store::{ConnectivityProvider, LocalStore, RemoteStore};
use liftlog_model::{now_millis, AccountId, Record, RecordKind};
use std::sync::Arc;
use tracing::{debug, warn};

/// Counts from one upload pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadReport {
    /// Dirty records acknowledged by the remote store.
    pub uploaded: u64,
    /// Tombstones acknowledged remotely and purged locally.
    pub purged: u64,
    /// Records whose upload failed and which stay queued for retry.
    pub failed: u64,
}

/// Pushes local changes to the remote store.
///
/// Each record's upload is independent and idempotent: one record's failure
/// never aborts the rest of the batch, and a crash between the remote
/// acknowledgment and the local bookkeeping write is repaired by the next
/// pass re-uploading the same record.
pub struct UploadReconciler<L, R, C> {
    local: Arc<L>,
    remote: Arc<R>,
    connectivity: Arc<C>,
}

impl<L: LocalStore, R: RemoteStore, C: ConnectivityProvider> UploadReconciler<L, R, C> {
    /// Creates a reconciler over the given adapters.
    pub fn new(local: Arc<L>, remote: Arc<R>, connectivity: Arc<C>) -> Self {
        Self {
            local,
            remote,
            connectivity,
        }
    }

    /// Runs a full upload pass for the account.
    ///
    /// Returns [`SyncError::Offline`] without touching any record when there
    /// is no connectivity.
    pub fn run(&self, account: AccountId) -> SyncResult<UploadReport> {
        if !self.connectivity.is_connected() {
            return Err(SyncError::Offline);
        }

        let mut report = UploadReport::default();

        // Dirty records first, then tombstones, then the measurement
        // pending-deletion list.
        for kind in RecordKind::all() {
            for record in self.local.list_unsynced(kind)? {
                match self.push_record(account, record) {
                    Ok(()) => report.uploaded += 1,
                    Err(err) => {
                        warn!(%kind, error = %err, "upload failed; record stays dirty");
                        report.failed += 1;
                    }
                }
            }
        }

        for kind in RecordKind::all() {
            for tombstone in self.local.list_tombstones(kind)? {
                let Some(deleted_at) = tombstone.sync().deleted_at else {
                    // A tombstone without a deletion time is not uploadable;
                    // leave it for inspection rather than guessing.
                    warn!(%kind, id = %tombstone.id(), "tombstone missing deleted_at");
                    continue;
                };
                match self
                    .remote
                    .mark_deleted(account, kind, tombstone.id(), deleted_at)
                {
                    Ok(()) => {
                        // Purge strictly after the remote acknowledged the
                        // deletion, so a crash here re-uploads the tombstone
                        // instead of dropping it.
                        self.local.hard_purge(kind, tombstone.id())?;
                        report.purged += 1;
                    }
                    Err(err) => {
                        warn!(%kind, id = %tombstone.id(), error = %err, "delete upload failed");
                        report.failed += 1;
                    }
                }
            }
        }

        let now = now_millis();
        for id in self.local.pending_measurement_deletions()? {
            match self
                .remote
                .mark_deleted(account, RecordKind::Measurement, id, now)
            {
                Ok(()) => {
                    self.local.clear_measurement_deletion(id)?;
                    report.purged += 1;
                }
                Err(err) => {
                    warn!(%id, error = %err, "measurement delete upload failed");
                    report.failed += 1;
                }
            }
        }

        debug!(
            uploaded = report.uploaded,
            purged = report.purged,
            failed = report.failed,
            "upload pass complete"
        );
        Ok(report)
    }

    /// Uploads one record right after a local mutation.
    ///
    /// Returns `Ok(false)` when offline or when the record is already
    /// synced (re-uploading an unchanged record is a no-op).
    pub fn upload_single(&self, account: AccountId, record: &Record) -> SyncResult<bool> {
        if !self.connectivity.is_connected() {
            return Ok(false);
        }
        if record.sync().is_tombstone() {
            let Some(deleted_at) = record.sync().deleted_at else {
                return Ok(false);
            };
            self.remote
                .mark_deleted(account, record.kind(), record.id(), deleted_at)
                .map_err(|err| SyncError::RemoteRejected {
                    kind: record.kind(),
                    id: record.id(),
                    message: err.to_string(),
                })?;
            self.local.hard_purge(record.kind(), record.id())?;
            return Ok(true);
        }
        if !record.sync().is_dirty() {
            return Ok(false);
        }
        self.push_record(account, record.clone())?;
        Ok(true)
    }

    fn push_record(&self, account: AccountId, mut record: Record) -> SyncResult<()> {
        // Records authored before sign-in adopt the account on first upload.
        record.sync_mut().owner_id.get_or_insert(account);

        self.remote
            .upsert(account, &record)
            .map_err(|err| SyncError::RemoteRejected {
                kind: record.kind(),
                id: record.id(),
                message: err.to_string(),
            })?;

        record.sync_mut().mark_synced(now_millis());
        self.local.upsert(record)?;
        Ok(())
    }
}
