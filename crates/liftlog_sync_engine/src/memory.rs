//! In-memory store adapters for tests and embedding.

use crate::store::{
    ConnectivityProvider, IdentityProvider, LocalStore, RemoteStore, StoreError, StoreResult,
};
use liftlog_model::{now_millis, AccountId, Record, RecordId, RecordKind, Timestamp};
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

/// An in-memory [`LocalStore`].
///
/// Backs the engine's unit and integration tests; also usable as the local
/// store of an embedding that persists elsewhere.
#[derive(Default)]
pub struct MemoryLocalStore {
    records: RwLock<HashMap<RecordKind, BTreeMap<RecordId, Record>>>,
    pending_measurement_deletions: RwLock<Vec<RecordId>>,
}

impl MemoryLocalStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn check_exercise_name(&self, record: &Record) -> StoreResult<()> {
        let Record::Exercise(exercise) = record else {
            return Ok(());
        };
        if exercise.sync.is_tombstone() {
            return Ok(());
        }
        let canonical = exercise.canonical_name();
        let records = self.records.read();
        let taken = records
            .get(&RecordKind::Exercise)
            .map(|map| {
                map.values().any(|other| {
                    other.id() != record.id()
                        && !other.sync().is_tombstone()
                        && other
                            .as_exercise()
                            .is_some_and(|e| e.canonical_name() == canonical)
                })
            })
            .unwrap_or(false);
        if taken {
            return Err(StoreError::NameConflict {
                name: exercise.name.clone(),
            });
        }
        Ok(())
    }
}

impl LocalStore for MemoryLocalStore {
    fn list_active(&self, kind: RecordKind) -> StoreResult<Vec<Record>> {
        Ok(self
            .records
            .read()
            .get(&kind)
            .map(|map| {
                map.values()
                    .filter(|r| !r.sync().is_tombstone())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_unsynced(&self, kind: RecordKind) -> StoreResult<Vec<Record>> {
        Ok(self
            .records
            .read()
            .get(&kind)
            .map(|map| {
                map.values()
                    .filter(|r| !r.sync().is_tombstone() && r.sync().is_dirty())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_tombstones(&self, kind: RecordKind) -> StoreResult<Vec<Record>> {
        Ok(self
            .records
            .read()
            .get(&kind)
            .map(|map| {
                map.values()
                    .filter(|r| r.sync().is_tombstone())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn get(&self, kind: RecordKind, id: RecordId) -> StoreResult<Option<Record>> {
        Ok(self
            .records
            .read()
            .get(&kind)
            .and_then(|map| map.get(&id))
            .cloned())
    }

    fn upsert(&self, record: Record) -> StoreResult<()> {
        self.check_exercise_name(&record)?;
        self.records
            .write()
            .entry(record.kind())
            .or_default()
            .insert(record.id(), record);
        Ok(())
    }

    fn soft_delete(
        &self,
        kind: RecordKind,
        id: RecordId,
        deleted_at: Timestamp,
    ) -> StoreResult<()> {
        let mut records = self.records.write();
        let record = records
            .get_mut(&kind)
            .and_then(|map| map.get_mut(&id))
            .ok_or(StoreError::NotFound { kind, id })?;
        record.sync_mut().mark_deleted(deleted_at);
        Ok(())
    }

    fn hard_purge(&self, kind: RecordKind, id: RecordId) -> StoreResult<()> {
        // Idempotent; purging an already-absent record is a no-op.
        if let Some(map) = self.records.write().get_mut(&kind) {
            map.remove(&id);
        }
        Ok(())
    }

    fn pending_measurement_deletions(&self) -> StoreResult<Vec<RecordId>> {
        Ok(self.pending_measurement_deletions.read().clone())
    }

    fn queue_measurement_deletion(&self, id: RecordId) -> StoreResult<()> {
        let mut pending = self.pending_measurement_deletions.write();
        if !pending.contains(&id) {
            pending.push(id);
        }
        Ok(())
    }

    fn clear_measurement_deletion(&self, id: RecordId) -> StoreResult<()> {
        self.pending_measurement_deletions
            .write()
            .retain(|pending| *pending != id);
        Ok(())
    }
}

struct StoredRecord {
    record: Record,
    stored_at: Timestamp,
}

/// An in-memory [`RemoteStore`] usable as a shared "cloud" between several
/// engines in tests.
///
/// Supports per-record failure injection so per-record retry behavior can be
/// exercised.
#[derive(Default)]
pub struct MemoryRemoteStore {
    accounts: RwLock<HashMap<AccountId, HashMap<RecordKind, BTreeMap<RecordId, StoredRecord>>>>,
    failing_records: Mutex<HashSet<RecordId>>,
}

impl MemoryRemoteStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every upsert or delete of this record fail until cleared.
    pub fn fail_record(&self, id: RecordId) {
        self.failing_records.lock().insert(id);
    }

    /// Clears all injected failures.
    pub fn clear_failures(&self) {
        self.failing_records.lock().clear();
    }

    fn check_failure(&self, id: RecordId) -> StoreResult<()> {
        if self.failing_records.lock().contains(&id) {
            return Err(StoreError::Backend(format!("injected failure for {id}")));
        }
        Ok(())
    }

    /// Fetches a stored record, tombstoned or not. Test helper.
    pub fn record(&self, account: AccountId, kind: RecordKind, id: RecordId) -> Option<Record> {
        self.accounts
            .read()
            .get(&account)
            .and_then(|kinds| kinds.get(&kind))
            .and_then(|map| map.get(&id))
            .map(|stored| stored.record.clone())
    }

    /// Number of active (non-deleted) records in a collection. Test helper.
    pub fn active_count(&self, account: AccountId, kind: RecordKind) -> usize {
        self.accounts
            .read()
            .get(&account)
            .and_then(|kinds| kinds.get(&kind))
            .map(|map| {
                map.values()
                    .filter(|stored| !stored.record.sync().is_tombstone())
                    .count()
            })
            .unwrap_or(0)
    }
}

impl RemoteStore for MemoryRemoteStore {
    fn list_since(
        &self,
        account: AccountId,
        kind: RecordKind,
        since: Option<Timestamp>,
    ) -> StoreResult<Vec<Record>> {
        Ok(self
            .accounts
            .read()
            .get(&account)
            .and_then(|kinds| kinds.get(&kind))
            .map(|map| {
                map.values()
                    .filter(|stored| since.is_none_or(|since| stored.stored_at >= since))
                    .map(|stored| stored.record.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    fn upsert(&self, account: AccountId, record: &Record) -> StoreResult<()> {
        self.check_failure(record.id())?;
        self.accounts
            .write()
            .entry(account)
            .or_default()
            .entry(record.kind())
            .or_default()
            .insert(
                record.id(),
                StoredRecord {
                    record: record.clone(),
                    stored_at: now_millis(),
                },
            );
        Ok(())
    }

    fn mark_deleted(
        &self,
        account: AccountId,
        kind: RecordKind,
        id: RecordId,
        deleted_at: Timestamp,
    ) -> StoreResult<()> {
        self.check_failure(id)?;
        let mut accounts = self.accounts.write();
        let map = accounts.entry(account).or_default().entry(kind).or_default();
        // Deleting an id the store never saw still succeeds; there is
        // nothing to propagate to other devices in that case.
        if let Some(stored) = map.get_mut(&id) {
            stored.record.sync_mut().mark_deleted(deleted_at);
            stored.stored_at = now_millis();
        }
        Ok(())
    }
}

/// An [`IdentityProvider`] with a fixed answer.
#[derive(Default)]
pub struct StaticIdentity {
    account: Option<AccountId>,
}

impl StaticIdentity {
    /// A provider that is signed in as the given account.
    pub fn signed_in(account: AccountId) -> Self {
        Self {
            account: Some(account),
        }
    }

    /// A provider that is signed out.
    pub fn signed_out() -> Self {
        Self::default()
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_account(&self) -> Option<AccountId> {
        self.account
    }
}

/// A [`ConnectivityProvider`] toggled from tests.
pub struct MockConnectivity {
    online: AtomicBool,
}

impl MockConnectivity {
    /// Creates a provider in the given state.
    pub fn new(online: bool) -> Self {
        Self {
            online: AtomicBool::new(online),
        }
    }

    /// Flips the connectivity state.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }
}

impl Default for MockConnectivity {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ConnectivityProvider for MockConnectivity {
    fn is_connected(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liftlog_model::{CustomExercise, ExerciseCategory, WorkoutSession};

    #[test]
    fn unsynced_excludes_tombstones() {
        let store = MemoryLocalStore::new();
        let session = WorkoutSession::start(None, "A", 1_000);
        let id = session.sync.id;
        store.upsert(session.into()).unwrap();

        assert_eq!(store.list_unsynced(RecordKind::Session).unwrap().len(), 1);

        store.soft_delete(RecordKind::Session, id, 2_000).unwrap();
        assert!(store.list_unsynced(RecordKind::Session).unwrap().is_empty());
        assert_eq!(store.list_tombstones(RecordKind::Session).unwrap().len(), 1);
    }

    #[test]
    fn duplicate_active_exercise_name_is_rejected() {
        let store = MemoryLocalStore::new();
        store
            .upsert(CustomExercise::new(None, "Squat", ExerciseCategory::Strength, 0).into())
            .unwrap();

        let duplicate = CustomExercise::new(None, "  SQUAT ", ExerciseCategory::Strength, 0);
        let result = store.upsert(duplicate.into());
        assert!(matches!(result, Err(StoreError::NameConflict { .. })));
    }

    #[test]
    fn tombstoned_exercise_does_not_reserve_its_name() {
        let store = MemoryLocalStore::new();
        let first = CustomExercise::new(None, "Squat", ExerciseCategory::Strength, 0);
        let first_id = first.sync.id;
        store.upsert(first.into()).unwrap();
        store
            .soft_delete(RecordKind::Exercise, first_id, 1_000)
            .unwrap();

        let second = CustomExercise::new(None, "Squat", ExerciseCategory::Strength, 0);
        assert!(store.upsert(second.into()).is_ok());
    }

    #[test]
    fn remote_failure_injection_is_per_record() {
        let remote = MemoryRemoteStore::new();
        let account = AccountId::new();
        let good = WorkoutSession::start(Some(account), "good", 0);
        let bad = WorkoutSession::start(Some(account), "bad", 0);
        remote.fail_record(bad.sync.id);

        assert!(remote.upsert(account, &good.clone().into()).is_ok());
        assert!(remote.upsert(account, &bad.into()).is_err());
        assert_eq!(remote.active_count(account, RecordKind::Session), 1);
    }

    #[test]
    fn list_since_filters_by_stored_time() {
        let remote = MemoryRemoteStore::new();
        let account = AccountId::new();
        let session = WorkoutSession::start(Some(account), "A", 0);
        remote.upsert(account, &session.into()).unwrap();

        let all = remote
            .list_since(account, RecordKind::Session, None)
            .unwrap();
        assert_eq!(all.len(), 1);

        let future = remote
            .list_since(account, RecordKind::Session, Some(now_millis() + 60_000))
            .unwrap();
        assert!(future.is_empty());
    }
}
