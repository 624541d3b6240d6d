//! The sync engine: orchestrates upload and download passes, recomputes
//! personal records, and publishes observable status.

use crate::config::SyncConfig;
use crate::download::DownloadMerger;
use crate::error::{SyncError, SyncResult};
use crate::status::{StatusCell, SubscriptionId, SyncStatus};
use crate::store::{ConnectivityProvider, IdentityProvider, LocalStore, RemoteStore};
use crate::upload::UploadReconciler;
use liftlog_merge::{rebuild_records, recalculate, session_new_bests, PrCandidate};
use liftlog_model::{
    now_millis, ExerciseId, Record, RecordId, RecordKind, Timestamp, WorkoutSession,
};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{debug, info, warn};

/// Which half of a full sync is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// No sync in flight.
    Idle,
    /// Pushing local changes to the remote store.
    Uploading,
    /// Merging remote state into the local store.
    Downloading,
}

impl SyncPhase {
    /// True while a sync pass is running.
    pub fn is_active(self) -> bool {
        self != SyncPhase::Idle
    }
}

/// Outcome of one `trigger_full_sync` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Whether the pass ran to completion.
    pub success: bool,
    /// True when another sync was already in flight and this trigger
    /// deferred to it instead of starting a second pass.
    pub coalesced: bool,
    /// Dirty records acknowledged by the remote store.
    pub uploaded: u64,
    /// Records whose upload failed; they stay queued for the next pass.
    pub failed: u64,
    /// Remote records inserted locally.
    pub added: u64,
    /// Records reconciled through a conflict policy.
    pub conflicts_resolved: u64,
    /// Local and remote tombstones settled (purged or acknowledged).
    pub purged: u64,
    /// Why the pass did not complete, when it did not.
    pub error: Option<String>,
}

impl SyncReport {
    fn coalesced() -> Self {
        Self {
            success: true,
            coalesced: true,
            ..Self::default()
        }
    }

    fn failed(error: &SyncError) -> Self {
        let mut report = Self {
            success: false,
            error: Some(error.to_string()),
            ..Self::default()
        };
        if let SyncError::PartialFailure { uploaded, .. } = error {
            report.uploaded = *uploaded;
        }
        report
    }
}

/// Offline-first sync engine over pluggable store adapters.
///
/// Uploads always run before downloads so the remote store sees local
/// changes before they can be overwritten by stale remote copies. A
/// single-flight guard coalesces concurrent triggers into one pass.
pub struct SyncEngine<L, R, I, C> {
    config: SyncConfig,
    local: Arc<L>,
    remote: Arc<R>,
    identity: Arc<I>,
    connectivity: Arc<C>,
    status: StatusCell,
    phase: RwLock<SyncPhase>,
    in_flight: AtomicBool,
    was_online: AtomicBool,
}

impl<L, R, I, C> SyncEngine<L, R, I, C>
where
    L: LocalStore,
    R: RemoteStore,
    I: IdentityProvider,
    C: ConnectivityProvider,
{
    /// Creates an engine over the given adapters.
    pub fn new(
        config: SyncConfig,
        local: Arc<L>,
        remote: Arc<R>,
        identity: Arc<I>,
        connectivity: Arc<C>,
    ) -> Self {
        let online = connectivity.is_connected();
        let status = StatusCell::new(SyncStatus {
            is_online: online,
            ..SyncStatus::default()
        });
        Self {
            config,
            local,
            remote,
            identity,
            connectivity,
            status,
            phase: RwLock::new(SyncPhase::Idle),
            in_flight: AtomicBool::new(false),
            was_online: AtomicBool::new(online),
        }
    }

    /// Runs a full upload-then-download sync pass.
    ///
    /// Safe to call from any thread at any time; a trigger that arrives
    /// while a pass is in flight returns immediately with a coalesced
    /// report instead of starting a second pass.
    pub fn trigger_full_sync(&self) -> SyncReport {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("sync already in flight; trigger coalesced");
            return SyncReport::coalesced();
        }

        let report = self.run_full_sync();

        *self.phase.write() = SyncPhase::Idle;
        self.in_flight.store(false, Ordering::SeqCst);
        report
    }

    /// Runs `trigger_full_sync` with the configured retry backoff until it
    /// succeeds or the attempt budget is exhausted.
    pub fn sync_with_retry(&self) -> SyncReport {
        let retry = &self.config.retry;
        let mut report = SyncReport::default();
        for attempt in 0..retry.max_attempts {
            let delay = retry.delay_for_attempt(attempt);
            if !delay.is_zero() {
                thread::sleep(delay);
            }
            report = self.trigger_full_sync();
            if report.success {
                return report;
            }
            debug!(attempt, error = ?report.error, "sync attempt failed");
        }
        report
    }

    fn run_full_sync(&self) -> SyncReport {
        let Some(account) = self.identity.current_account() else {
            debug!("no account signed in; sync is a no-op");
            return SyncReport {
                success: true,
                ..SyncReport::default()
            };
        };

        let online = self.connectivity.is_connected();
        self.status.update(|s| s.is_online = online);
        if !online {
            let report = SyncReport::failed(&SyncError::Offline);
            self.finish(&report);
            return report;
        }

        self.status.update(|s| {
            s.is_syncing = true;
            s.error = None;
        });

        *self.phase.write() = SyncPhase::Uploading;
        let reconciler = UploadReconciler::new(
            Arc::clone(&self.local),
            Arc::clone(&self.remote),
            Arc::clone(&self.connectivity),
        );
        let upload = match reconciler.run(account) {
            Ok(upload) => upload,
            Err(err) => {
                let report = SyncReport::failed(&err);
                self.finish(&report);
                return report;
            }
        };

        *self.phase.write() = SyncPhase::Downloading;
        let since = if self.config.incremental_download {
            self.status.get().last_synced_at
        } else {
            None
        };
        let merger = DownloadMerger::new(Arc::clone(&self.local), Arc::clone(&self.remote));
        let merge = match merger.run(account, since) {
            Ok(merge) => merge,
            Err(err) => {
                let partial = SyncError::PartialFailure {
                    uploaded: upload.uploaded,
                    message: err.to_string(),
                };
                let report = SyncReport::failed(&partial);
                self.finish(&report);
                return report;
            }
        };

        // Merged sessions may shift the best lift per exercise.
        if let Err(err) = self.recalculate_personal_records() {
            warn!(error = %err, "personal record recalculation failed");
        }

        let report = SyncReport {
            success: true,
            coalesced: false,
            uploaded: upload.uploaded,
            failed: upload.failed,
            added: merge.added,
            conflicts_resolved: merge.conflicts_resolved,
            purged: upload.purged + merge.purged,
            error: None,
        };
        let now = now_millis();
        let pending = self.pending_uploads().unwrap_or(0);
        self.status.update(|s| {
            s.is_syncing = false;
            s.last_synced_at = Some(now);
            s.pending_uploads = pending;
            s.error = None;
        });
        info!(
            uploaded = report.uploaded,
            failed = report.failed,
            added = report.added,
            conflicts_resolved = report.conflicts_resolved,
            purged = report.purged,
            "full sync complete"
        );
        report
    }

    fn finish(&self, report: &SyncReport) {
        let pending = self.pending_uploads().unwrap_or(0);
        let error = report.error.clone();
        self.status.update(|s| {
            s.is_syncing = false;
            s.pending_uploads = pending;
            s.error = error;
        });
    }

    /// Saves a locally mutated record and opportunistically uploads it.
    ///
    /// The record is always persisted dirty first; the upload is best
    /// effort and a failure leaves it queued for the next full sync.
    pub fn record_local_mutation(&self, mut record: Record) -> SyncResult<()> {
        record.sync_mut().mark_dirty();
        self.local.upsert(record.clone())?;
        self.refresh_pending();

        if let Err(err) = self.upload_single_record(&record) {
            warn!(kind = %record.kind(), id = %record.id(), error = %err,
                "immediate upload failed; record stays queued");
        }
        Ok(())
    }

    /// Uploads one record right away, outside a full sync.
    ///
    /// Returns `Ok(false)` when signed out, offline, or the record is
    /// already synced; the record stays queued for the next full sync in
    /// the first two cases.
    pub fn upload_single_record(&self, record: &Record) -> SyncResult<bool> {
        let Some(account) = self.identity.current_account() else {
            return Ok(false);
        };
        let reconciler = UploadReconciler::new(
            Arc::clone(&self.local),
            Arc::clone(&self.remote),
            Arc::clone(&self.connectivity),
        );
        let uploaded = reconciler.upload_single(account, record)?;
        if uploaded {
            self.refresh_pending();
        }
        Ok(uploaded)
    }

    /// Finishes an in-progress session and flags its personal-record sets.
    ///
    /// Compares the session's sets against the stored bests, marks the
    /// winning set per improved exercise, stamps completion time, duration,
    /// and total volume, then saves the session like any local mutation.
    /// The stored personal records are rebuilt afterwards. Returns the new
    /// best per improved exercise.
    pub fn complete_session(
        &self,
        mut session: WorkoutSession,
        completed_at: Timestamp,
    ) -> SyncResult<Vec<PrCandidate>> {
        let current: BTreeMap<ExerciseId, PrCandidate> = self
            .local
            .list_active(RecordKind::PersonalRecord)?
            .into_iter()
            .filter_map(|record| match record {
                Record::PersonalRecord(pr) => Some((
                    pr.exercise_id,
                    PrCandidate {
                        exercise_id: pr.exercise_id,
                        weight_kg: pr.weight_kg,
                        reps: pr.reps,
                        achieved_at: pr.achieved_at,
                        session_id: pr.session_id,
                    },
                )),
                _ => None,
            })
            .collect();

        let new_bests = session_new_bests(&session, &current);
        for best in &new_bests {
            for log in session
                .logs
                .iter_mut()
                .filter(|log| log.exercise_id == best.exercise_id)
            {
                for set in &mut log.sets {
                    set.is_pr = set.weight_kg == best.weight_kg
                        && set.reps == best.reps
                        && set.logged_at == best.achieved_at;
                }
            }
        }

        session.complete(completed_at);
        self.record_local_mutation(session.into())?;
        self.recalculate_personal_records()?;
        Ok(new_bests)
    }

    /// Deletes a record locally and queues the deletion for upload.
    ///
    /// Measurements are purged immediately and tracked through the
    /// pending-deletion id list; every other kind becomes a tombstone that
    /// survives until the remote store acknowledges the deletion.
    pub fn delete_record(&self, kind: RecordKind, id: RecordId) -> SyncResult<()> {
        if kind == RecordKind::Measurement {
            self.local.hard_purge(kind, id)?;
            self.local.queue_measurement_deletion(id)?;
        } else {
            self.local.soft_delete(kind, id, now_millis())?;
        }
        self.refresh_pending();
        Ok(())
    }

    /// Rebuilds personal records from full session history.
    ///
    /// Record ids are stable across recomputation; only records whose best
    /// actually changed come out dirty, and records for exercises with no
    /// remaining history are soft-deleted.
    pub fn recalculate_personal_records(&self) -> SyncResult<()> {
        let sessions: Vec<WorkoutSession> = self
            .local
            .list_active(RecordKind::Session)?
            .into_iter()
            .filter_map(|record| match record {
                Record::Session(session) => Some(session),
                _ => None,
            })
            .collect();
        let existing: Vec<_> = self
            .local
            .list_active(RecordKind::PersonalRecord)?
            .into_iter()
            .filter_map(|record| match record {
                Record::PersonalRecord(pr) => Some(pr),
                _ => None,
            })
            .collect();

        let candidates = recalculate(&sessions);
        let outcome = rebuild_records(&candidates, &existing, self.identity.current_account());

        for record in outcome.records {
            if record.sync.is_dirty() {
                self.local.upsert(record.into())?;
            }
        }
        let now = now_millis();
        for id in outcome.stale {
            self.local.soft_delete(RecordKind::PersonalRecord, id, now)?;
        }
        Ok(())
    }

    /// Tells the engine the device's connectivity changed.
    ///
    /// An offline-to-online transition triggers a full sync to drain the
    /// queue; the report is returned when one ran.
    pub fn notify_connectivity(&self, online: bool) -> Option<SyncReport> {
        self.status.update(|s| s.is_online = online);
        let was_online = self.was_online.swap(online, Ordering::SeqCst);
        if online && !was_online {
            info!("connectivity restored; draining sync queue");
            return Some(self.trigger_full_sync());
        }
        None
    }

    /// A snapshot of the current sync status.
    pub fn status(&self) -> SyncStatus {
        self.status.get()
    }

    /// The phase of the sync pass currently in flight, if any.
    pub fn phase(&self) -> SyncPhase {
        *self.phase.read()
    }

    /// Registers a callback invoked on every status change.
    pub fn subscribe_status(
        &self,
        callback: impl Fn(&SyncStatus) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.status.subscribe(callback)
    }

    /// Removes a status subscription.
    pub fn unsubscribe_status(&self, id: SubscriptionId) -> bool {
        self.status.unsubscribe(id)
    }

    /// Counts everything waiting to reach the remote store.
    pub fn pending_uploads(&self) -> SyncResult<u64> {
        let mut pending = 0u64;
        for kind in RecordKind::all() {
            pending += self.local.list_unsynced(kind)?.len() as u64;
            pending += self.local.list_tombstones(kind)?.len() as u64;
        }
        pending += self.local.pending_measurement_deletions()?.len() as u64;
        Ok(pending)
    }

    fn refresh_pending(&self) {
        if let Ok(pending) = self.pending_uploads() {
            self.status.update(|s| s.pending_uploads = pending);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryConfig;
    use crate::memory::{MemoryLocalStore, MemoryRemoteStore, MockConnectivity, StaticIdentity};
    use liftlog_model::{AccountId, ExerciseId, ExerciseLog, SetEntry};

    type TestEngine =
        SyncEngine<MemoryLocalStore, MemoryRemoteStore, StaticIdentity, MockConnectivity>;

    fn engine(
        identity: StaticIdentity,
        online: bool,
    ) -> (TestEngine, Arc<MemoryLocalStore>, Arc<MemoryRemoteStore>) {
        engine_with(identity, online, Arc::new(MemoryRemoteStore::new()))
    }

    fn engine_with(
        identity: StaticIdentity,
        online: bool,
        remote: Arc<MemoryRemoteStore>,
    ) -> (TestEngine, Arc<MemoryLocalStore>, Arc<MemoryRemoteStore>) {
        let local = Arc::new(MemoryLocalStore::new());
        let engine = SyncEngine::new(
            SyncConfig::new().with_retry(RetryConfig::no_retry()),
            Arc::clone(&local),
            Arc::clone(&remote),
            Arc::new(identity),
            Arc::new(MockConnectivity::new(online)),
        );
        (engine, local, remote)
    }

    fn session_with_set(account: AccountId, weight_kg: f64, reps: u32) -> WorkoutSession {
        let mut session = WorkoutSession::start(Some(account), "Legs", 1_000);
        let mut log = ExerciseLog::new(ExerciseId::from_bytes([7; 16]), 1_500);
        log.sets.push(SetEntry::new(1, weight_kg, reps, 1_500));
        session.logs.push(log);
        session
    }

    #[test]
    fn signed_out_sync_is_a_successful_no_op() {
        let (engine, local, remote) = engine(StaticIdentity::signed_out(), true);
        local
            .upsert(WorkoutSession::start(None, "A", 0).into())
            .unwrap();

        let report = engine.trigger_full_sync();
        assert!(report.success);
        assert_eq!(report.uploaded, 0);
        assert_eq!(remote.active_count(AccountId::new(), RecordKind::Session), 0);
    }

    #[test]
    fn offline_sync_fails_and_keeps_records_queued() {
        let account = AccountId::new();
        let (engine, local, _) = engine(StaticIdentity::signed_in(account), false);
        local
            .upsert(WorkoutSession::start(None, "A", 0).into())
            .unwrap();

        let report = engine.trigger_full_sync();
        assert!(!report.success);
        assert!(report.error.is_some());

        let status = engine.status();
        assert!(!status.is_online);
        assert!(!status.is_syncing);
        assert_eq!(status.pending_uploads, 1);
    }

    #[test]
    fn full_sync_uploads_then_downloads() {
        let account = AccountId::new();
        let remote = Arc::new(MemoryRemoteStore::new());
        let (device_a, local_a, _) =
            engine_with(StaticIdentity::signed_in(account), true, Arc::clone(&remote));
        let (device_b, local_b, _) =
            engine_with(StaticIdentity::signed_in(account), true, remote);

        local_a
            .upsert(WorkoutSession::start(None, "Legs", 0).into())
            .unwrap();
        let report = device_a.trigger_full_sync();
        assert!(report.success);
        assert_eq!(report.uploaded, 1);

        let report = device_b.trigger_full_sync();
        assert!(report.success);
        assert!(report.added >= 1);
        assert_eq!(local_b.list_active(RecordKind::Session).unwrap().len(), 1);

        let status = device_a.status();
        assert!(status.last_synced_at.is_some());
        assert_eq!(status.pending_uploads, 0);
        assert_eq!(local_a.list_unsynced(RecordKind::Session).unwrap().len(), 0);
    }

    #[test]
    fn sync_recomputes_personal_records_from_merged_sessions() {
        let account = AccountId::new();
        let (engine, local, remote) = engine(StaticIdentity::signed_in(account), true);
        remote
            .upsert(account, &session_with_set(account, 120.0, 3).into())
            .unwrap();

        engine.trigger_full_sync();

        let prs = local.list_active(RecordKind::PersonalRecord).unwrap();
        assert_eq!(prs.len(), 1);
        let pr = prs[0].as_personal_record().unwrap();
        assert_eq!(pr.weight_kg, 120.0);
        assert_eq!(pr.reps, 3);
    }

    #[test]
    fn complete_session_flags_the_record_set() {
        let account = AccountId::new();
        let (engine, local, _) = engine(StaticIdentity::signed_in(account), false);
        let bench = ExerciseId::from_bytes([9; 16]);

        let mut session = WorkoutSession::start(None, "Chest", 1_000);
        let mut log = ExerciseLog::new(bench, 2_000);
        log.sets.push(SetEntry::new(1, 80.0, 5, 1_100));
        log.sets.push(SetEntry::new(2, 80.0, 8, 1_200));
        log.sets.push(SetEntry::new(3, 75.0, 10, 1_300));
        session.logs.push(log);
        let id = session.sync.id;

        let bests = engine.complete_session(session, 3_000).unwrap();
        assert_eq!(bests.len(), 1);
        assert_eq!(bests[0].weight_kg, 80.0);
        assert_eq!(bests[0].reps, 8);

        let stored = local.get(RecordKind::Session, id).unwrap().unwrap();
        let stored = stored.as_session().unwrap();
        assert_eq!(stored.completed_at, Some(3_000));
        assert_eq!(stored.duration_secs, 2);
        let flags: Vec<bool> = stored.logs[0].sets.iter().map(|s| s.is_pr).collect();
        assert_eq!(flags, vec![false, true, false]);

        // A weaker follow-up session sets no records.
        let mut weaker = WorkoutSession::start(None, "Chest", 4_000);
        let mut log = ExerciseLog::new(bench, 5_000);
        log.sets.push(SetEntry::new(1, 70.0, 5, 4_100));
        weaker.logs.push(log);
        assert!(engine.complete_session(weaker, 6_000).unwrap().is_empty());

        let prs = local.list_active(RecordKind::PersonalRecord).unwrap();
        assert_eq!(prs.len(), 1);
        assert_eq!(prs[0].as_personal_record().unwrap().reps, 8);
    }

    #[test]
    fn measurement_delete_purges_and_queues() {
        let account = AccountId::new();
        let (engine, local, _) = engine(StaticIdentity::signed_in(account), false);
        let measurement = liftlog_model::BodyMeasurement::new(Some(account), 1_000);
        let id = measurement.sync.id;
        local.upsert(measurement.into()).unwrap();

        engine.delete_record(RecordKind::Measurement, id).unwrap();
        assert!(local.get(RecordKind::Measurement, id).unwrap().is_none());
        assert_eq!(local.pending_measurement_deletions().unwrap(), vec![id]);
        assert_eq!(engine.status().pending_uploads, 1);
    }

    #[test]
    fn reconnect_triggers_a_drain() {
        let account = AccountId::new();
        let connectivity = Arc::new(MockConnectivity::new(false));
        let local = Arc::new(MemoryLocalStore::new());
        let remote = Arc::new(MemoryRemoteStore::new());
        let engine = SyncEngine::new(
            SyncConfig::new(),
            Arc::clone(&local),
            Arc::clone(&remote),
            Arc::new(StaticIdentity::signed_in(account)),
            Arc::clone(&connectivity),
        );
        local
            .upsert(WorkoutSession::start(None, "A", 0).into())
            .unwrap();
        assert!(!engine.trigger_full_sync().success);

        // Still offline: no drain.
        assert!(engine.notify_connectivity(false).is_none());

        connectivity.set_online(true);
        let report = engine.notify_connectivity(true).expect("drain should run");
        assert!(report.success);
        assert_eq!(report.uploaded, 1);
        assert_eq!(remote.active_count(account, RecordKind::Session), 1);
        assert_eq!(local.list_unsynced(RecordKind::Session).unwrap().len(), 0);
    }

    #[test]
    fn concurrent_trigger_is_coalesced() {
        let account = AccountId::new();
        let remote = Arc::new(MemoryRemoteStore::new());
        let local = Arc::new(MemoryLocalStore::new());
        let engine = Arc::new(SyncEngine::new(
            SyncConfig::new(),
            Arc::clone(&local),
            remote,
            Arc::new(StaticIdentity::signed_in(account)),
            Arc::new(MockConnectivity::new(true)),
        ));

        // Re-enter from a status callback while the first pass holds the
        // single-flight guard.
        let engine_clone = Arc::clone(&engine);
        let saw_coalesced = Arc::new(AtomicBool::new(false));
        let saw_clone = Arc::clone(&saw_coalesced);
        engine.subscribe_status(move |status| {
            if status.is_syncing && engine_clone.trigger_full_sync().coalesced {
                saw_clone.store(true, Ordering::SeqCst);
            }
        });

        let report = engine.trigger_full_sync();
        assert!(report.success);
        assert!(!report.coalesced);
        assert!(saw_coalesced.load(Ordering::SeqCst));
    }

    #[test]
    fn retry_stops_on_first_success() {
        let account = AccountId::new();
        let (engine, local, remote) = engine(StaticIdentity::signed_in(account), true);
        local
            .upsert(WorkoutSession::start(None, "A", 0).into())
            .unwrap();

        let report = engine.sync_with_retry();
        assert!(report.success);
        assert_eq!(report.uploaded, 1);
        assert_eq!(remote.active_count(account, RecordKind::Session), 1);
    }

    #[test]
    fn record_local_mutation_uploads_immediately_when_online() {
        let account = AccountId::new();
        let (engine, local, remote) = engine(StaticIdentity::signed_in(account), true);

        let session = WorkoutSession::start(None, "A", 0);
        let id = session.sync.id;
        engine.record_local_mutation(session.into()).unwrap();

        assert_eq!(remote.active_count(account, RecordKind::Session), 1);
        let stored = local.get(RecordKind::Session, id).unwrap().unwrap();
        assert!(!stored.sync().is_dirty());
        assert_eq!(engine.status().pending_uploads, 0);
    }

    #[test]
    fn upload_single_record_pushes_exactly_one_record() {
        let account = AccountId::new();
        let (engine, local, remote) = engine(StaticIdentity::signed_in(account), true);
        let session = WorkoutSession::start(None, "A", 0);
        let id = session.sync.id;
        local.upsert(session.clone().into()).unwrap();

        assert!(engine.upload_single_record(&session.into()).unwrap());
        assert_eq!(remote.active_count(account, RecordKind::Session), 1);

        // The now-synced copy is a no-op on a second call.
        let synced = local.get(RecordKind::Session, id).unwrap().unwrap();
        assert!(!engine.upload_single_record(&synced).unwrap());
        assert_eq!(engine.status().pending_uploads, 0);
    }

    #[test]
    fn upload_single_record_requires_an_account() {
        let (engine, local, remote) = engine(StaticIdentity::signed_out(), true);
        let session = WorkoutSession::start(None, "A", 0);
        local.upsert(session.clone().into()).unwrap();

        assert!(!engine.upload_single_record(&session.into()).unwrap());
        assert_eq!(remote.active_count(AccountId::new(), RecordKind::Session), 0);
    }

    #[test]
    fn record_local_mutation_stays_queued_offline() {
        let account = AccountId::new();
        let (engine, local, remote) = engine(StaticIdentity::signed_in(account), false);

        engine
            .record_local_mutation(WorkoutSession::start(None, "A", 0).into())
            .unwrap();

        assert_eq!(remote.active_count(account, RecordKind::Session), 0);
        assert_eq!(local.list_unsynced(RecordKind::Session).unwrap().len(), 1);
        assert_eq!(engine.status().pending_uploads, 1);
    }
}
