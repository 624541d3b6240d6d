//! Download merger: pulls remote collections and merges them into the
//! local store through the per-kind conflict resolution policies.

use crate::error::SyncResult;
use crate::store::{LocalStore, RemoteStore, StoreError};
use liftlog_merge::{
    disambiguated_name, resolve_exercise, resolve_measurement, resolve_personal_record,
    resolve_session, resolve_template, revived_name, LocalView, Resolution,
};
use liftlog_model::{
    canonicalize_name, now_millis, AccountId, CustomExercise, Record, RecordId, RecordKind,
    Timestamp,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Counts from one merge pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Remote records inserted that did not exist locally.
    pub added: u64,
    /// Records that existed on both sides and were reconciled.
    pub conflicts_resolved: u64,
    /// Local copies purged because the remote copy is deleted.
    pub purged: u64,
}

/// Applies remote state to the local store.
pub struct DownloadMerger<L, R> {
    local: Arc<L>,
    remote: Arc<R>,
}

impl<L: LocalStore, R: RemoteStore> DownloadMerger<L, R> {
    /// Creates a merger over the given adapters.
    pub fn new(local: Arc<L>, remote: Arc<R>) -> Self {
        Self { local, remote }
    }

    /// Fetches every collection changed since `since` and merges it.
    pub fn run(&self, account: AccountId, since: Option<Timestamp>) -> SyncResult<MergeReport> {
        let mut report = MergeReport::default();
        let pending_deletions: HashSet<RecordId> = self
            .local
            .pending_measurement_deletions()?
            .into_iter()
            .collect();
        let now = now_millis();

        for kind in RecordKind::all() {
            for remote_record in self.remote.list_since(account, kind, since)? {
                let id = remote_record.id();
                let local_record = self.local.get(kind, id)?;
                let resolution =
                    resolve(local_record.as_ref(), &remote_record, &pending_deletions);

                match resolution {
                    Resolution::Insert => {
                        self.upsert_merged(remote_record, now)?;
                        report.added += 1;
                    }
                    Resolution::AcceptRemote => {
                        self.upsert_merged(remote_record, now)?;
                        report.conflicts_resolved += 1;
                    }
                    Resolution::KeepLocal | Resolution::SkipTombstoned => {
                        debug!(%kind, %id, ?resolution, "remote record skipped");
                    }
                    Resolution::PurgeLocal => {
                        self.local.hard_purge(kind, id)?;
                        report.purged += 1;
                    }
                    Resolution::Revive => {
                        if let Record::Exercise(remote_exercise) = remote_record {
                            self.revive_exercise(remote_exercise, now)?;
                            report.conflicts_resolved += 1;
                        }
                    }
                }
            }
        }

        info!(
            added = report.added,
            conflicts_resolved = report.conflicts_resolved,
            purged = report.purged,
            "merge pass complete"
        );
        Ok(report)
    }

    /// Stores a record that arrived from the remote side.
    ///
    /// The merged copy is stamped synced (it matches the cloud) unless a
    /// name conflict forces a local rename, which must be re-uploaded.
    fn upsert_merged(&self, mut record: Record, now: Timestamp) -> SyncResult<()> {
        record.sync_mut().mark_synced(now);
        match self.local.upsert(record.clone()) {
            Err(StoreError::NameConflict { name }) => {
                let Record::Exercise(mut exercise) = record else {
                    // Only exercises carry the uniqueness constraint.
                    return Err(StoreError::NameConflict { name }.into());
                };
                let taken = self.active_exercise_names(exercise.sync.id)?;
                let renamed = disambiguated_name(&exercise.name, &taken);
                debug!(id = %exercise.sync.id, from = %exercise.name, to = %renamed,
                    "renaming merged exercise to resolve name conflict");
                exercise.name = renamed;
                exercise.updated_at = now;
                exercise.sync.mark_dirty();
                self.local.upsert(Record::Exercise(exercise))?;
                Ok(())
            }
            result => Ok(result?),
        }
    }

    /// Revives a zombie exercise, renaming it first if its name now
    /// collides with another active local exercise.
    fn revive_exercise(&self, remote: CustomExercise, now: Timestamp) -> SyncResult<()> {
        let taken = self.active_exercise_names(remote.sync.id)?;
        let mut revived = remote;
        revived.sync.revive();

        if taken.contains(&revived.canonical_name()) {
            let renamed = revived_name(&revived.name, &taken);
            debug!(id = %revived.sync.id, to = %renamed, "renaming revived exercise");
            revived.name = renamed;
            revived.updated_at = now;
            // Stays dirty so the rename reaches the remote store.
        } else {
            revived.sync.mark_synced(now);
        }

        self.local.upsert(Record::Exercise(revived))?;
        Ok(())
    }

    /// Canonical names of active local exercises, excluding the given id.
    fn active_exercise_names(&self, exclude: RecordId) -> SyncResult<HashSet<String>> {
        Ok(self
            .local
            .list_active(RecordKind::Exercise)?
            .iter()
            .filter(|record| record.id() != exclude)
            .filter_map(Record::as_exercise)
            .map(|exercise| canonicalize_name(&exercise.name))
            .collect())
    }
}

/// Builds the policy input view and dispatches to the record kind's policy.
fn resolve(
    local: Option<&Record>,
    remote: &Record,
    pending_deletions: &HashSet<RecordId>,
) -> Resolution {
    match remote {
        Record::Session(r) => resolve_session(local_view(local, Record::as_session), r),
        Record::Template(r) => resolve_template(local_view(local, Record::as_template), r),
        Record::Exercise(r) => resolve_exercise(local_view(local, Record::as_exercise), r),
        Record::PersonalRecord(r) => {
            resolve_personal_record(local_view(local, Record::as_personal_record), r)
        }
        Record::Measurement(r) => resolve_measurement(
            local_view(local, Record::as_measurement),
            pending_deletions.contains(&remote.id()),
            r,
        ),
    }
}

fn local_view<'a, T>(
    record: Option<&'a Record>,
    project: fn(&'a Record) -> Option<&'a T>,
) -> LocalView<'a, T> {
    match record {
        None => LocalView::Absent,
        Some(r) if r.sync().is_tombstone() => LocalView::Tombstoned,
        Some(r) => project(r).map_or(LocalView::Absent, LocalView::Active),
    }
}
