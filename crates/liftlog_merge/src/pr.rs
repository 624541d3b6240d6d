//! Personal-record recalculation.
//!
//! A deterministic reducer over the full set history. Sessions are scanned
//! in chronological order (start time, record id as tie-break), logs and
//! sets in their stored order. A candidate replaces the current best for
//! the same exercise only if it strictly beats it, so full ties keep the
//! earlier-achieved record and recomputation is idempotent.

use liftlog_model::{
    AccountId, ExerciseId, PersonalRecord, RecordId, Timestamp, WorkoutSession,
};
use std::collections::BTreeMap;

/// One set considered as a potential personal record.
#[derive(Debug, Clone, PartialEq)]
pub struct PrCandidate {
    /// The exercise the set belongs to.
    pub exercise_id: ExerciseId,
    /// Weight lifted, in kilograms.
    pub weight_kg: f64,
    /// Repetitions completed.
    pub reps: u32,
    /// When the set was logged.
    pub achieved_at: Timestamp,
    /// The session the set was logged in.
    pub session_id: RecordId,
}

impl PrCandidate {
    /// Selection rule: heavier wins; at equal weight, more reps wins.
    pub fn beats(&self, best: &PrCandidate) -> bool {
        self.weight_kg > best.weight_kg
            || (self.weight_kg == best.weight_kg && self.reps > best.reps)
    }
}

/// Derives the current best per exercise from full session history.
///
/// Running this twice over unchanged input yields an identical mapping.
pub fn recalculate(sessions: &[WorkoutSession]) -> BTreeMap<ExerciseId, PrCandidate> {
    let mut ordered: Vec<&WorkoutSession> = sessions.iter().collect();
    ordered.sort_by_key(|s| (s.started_at, s.sync.id));

    let mut best = BTreeMap::new();
    for session in ordered {
        fold_session(&mut best, session);
    }
    best
}

/// Folds one session's sets into the running best-per-exercise map.
fn fold_session(best: &mut BTreeMap<ExerciseId, PrCandidate>, session: &WorkoutSession) {
    for log in &session.logs {
        for set in &log.sets {
            let candidate = PrCandidate {
                exercise_id: log.exercise_id,
                weight_kg: set.weight_kg,
                reps: set.reps,
                achieved_at: set.logged_at,
                session_id: session.sync.id,
            };
            match best.get(&log.exercise_id) {
                Some(current) if !candidate.beats(current) => {}
                _ => {
                    best.insert(log.exercise_id, candidate);
                }
            }
        }
    }
}

/// Incremental check: which sets of this session beat the given bests?
///
/// Returns the new best per exercise for exercises this session improved.
pub fn session_new_bests(
    session: &WorkoutSession,
    current: &BTreeMap<ExerciseId, PrCandidate>,
) -> Vec<PrCandidate> {
    let mut merged = current.clone();
    fold_session(&mut merged, session);
    merged
        .into_iter()
        .filter(|(exercise_id, candidate)| {
            current.get(exercise_id) != Some(candidate) && candidate.session_id == session.sync.id
        })
        .map(|(_, candidate)| candidate)
        .collect()
}

/// Result of materializing candidates back into PersonalRecord rows.
#[derive(Debug, Default)]
pub struct RebuildOutcome {
    /// One record per exercise with history. Records whose best changed (or
    /// which are new) come back dirty; unchanged records are untouched.
    pub records: Vec<PersonalRecord>,
    /// Ids of existing records whose exercise no longer has any history.
    pub stale: Vec<RecordId>,
}

/// Turns a best-per-exercise map into PersonalRecord rows.
///
/// Existing record ids are reused per exercise so an id never changes across
/// recomputation.
pub fn rebuild_records(
    candidates: &BTreeMap<ExerciseId, PrCandidate>,
    existing: &[PersonalRecord],
    owner_id: Option<AccountId>,
) -> RebuildOutcome {
    let mut outcome = RebuildOutcome::default();

    for (exercise_id, candidate) in candidates {
        let current = existing.iter().find(|pr| pr.exercise_id == *exercise_id);
        match current {
            Some(pr)
                if pr.weight_kg == candidate.weight_kg
                    && pr.reps == candidate.reps
                    && pr.achieved_at == candidate.achieved_at
                    && pr.session_id == candidate.session_id =>
            {
                outcome.records.push(pr.clone());
            }
            Some(pr) => {
                let mut updated = pr.clone();
                updated.weight_kg = candidate.weight_kg;
                updated.reps = candidate.reps;
                updated.achieved_at = candidate.achieved_at;
                updated.session_id = candidate.session_id;
                updated.sync.mark_dirty();
                outcome.records.push(updated);
            }
            None => {
                outcome.records.push(PersonalRecord::new(
                    owner_id,
                    *exercise_id,
                    candidate.weight_kg,
                    candidate.reps,
                    candidate.achieved_at,
                    candidate.session_id,
                ));
            }
        }
    }

    for pr in existing {
        if !candidates.contains_key(&pr.exercise_id) {
            outcome.stale.push(pr.sync.id);
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use liftlog_model::{ExerciseLog, SetEntry};

    fn session_with_sets(
        started_at: Timestamp,
        exercise_id: ExerciseId,
        sets: &[(f64, u32)],
    ) -> WorkoutSession {
        let mut session = WorkoutSession::start(None, "S", started_at);
        let mut log = ExerciseLog::new(exercise_id, started_at);
        for (i, (weight, reps)) in sets.iter().enumerate() {
            log.sets.push(SetEntry::new(
                i as u32 + 1,
                *weight,
                *reps,
                started_at + i as i64,
            ));
        }
        session.logs.push(log);
        session
    }

    #[test]
    fn same_weight_more_reps_wins() {
        // {80x5, 80x8, 75x10} -> 80x8
        let exercise = ExerciseId::new();
        let sessions = vec![session_with_sets(
            1_000,
            exercise,
            &[(80.0, 5), (80.0, 8), (75.0, 10)],
        )];

        let best = recalculate(&sessions);
        let pr = &best[&exercise];
        assert_eq!(pr.weight_kg, 80.0);
        assert_eq!(pr.reps, 8);
    }

    #[test]
    fn full_tie_keeps_earlier_record() {
        let exercise = ExerciseId::new();
        let first = session_with_sets(1_000, exercise, &[(100.0, 5)]);
        let second = session_with_sets(2_000, exercise, &[(100.0, 5)]);
        let first_id = first.sync.id;

        let best = recalculate(&vec![second, first]);
        assert_eq!(best[&exercise].session_id, first_id);
    }

    #[test]
    fn recalculation_is_idempotent() {
        let a = ExerciseId::new();
        let b = ExerciseId::new();
        let sessions = vec![
            session_with_sets(1_000, a, &[(60.0, 10), (70.0, 6)]),
            session_with_sets(2_000, b, &[(120.0, 3)]),
            session_with_sets(3_000, a, &[(70.0, 8)]),
        ];

        assert_eq!(recalculate(&sessions), recalculate(&sessions));
    }

    #[test]
    fn session_new_bests_reports_only_improvements() {
        let exercise = ExerciseId::new();
        let history = vec![session_with_sets(1_000, exercise, &[(100.0, 5)])];
        let current = recalculate(&history);

        let better = session_with_sets(2_000, exercise, &[(105.0, 3)]);
        let worse = session_with_sets(3_000, exercise, &[(90.0, 8)]);

        let improvements = session_new_bests(&better, &current);
        assert_eq!(improvements.len(), 1);
        assert_eq!(improvements[0].weight_kg, 105.0);

        assert!(session_new_bests(&worse, &current).is_empty());
    }

    #[test]
    fn rebuild_reuses_ids_and_marks_changes_dirty() {
        let exercise = ExerciseId::new();
        let sessions = vec![session_with_sets(1_000, exercise, &[(100.0, 5)])];
        let best = recalculate(&sessions);

        let first = rebuild_records(&best, &[], None);
        assert_eq!(first.records.len(), 1);
        assert!(first.records[0].sync.is_dirty());
        let id = first.records[0].sync.id;

        // Unchanged history keeps the record untouched.
        let mut synced = first.records.clone();
        synced[0].sync.mark_synced(5_000);
        let unchanged = rebuild_records(&best, &synced, None);
        assert_eq!(unchanged.records[0].sync.id, id);
        assert!(!unchanged.records[0].sync.is_dirty());

        // A better lift reuses the id but dirties the record.
        let more = vec![
            session_with_sets(1_000, exercise, &[(100.0, 5)]),
            session_with_sets(2_000, exercise, &[(110.0, 2)]),
        ];
        let rebuilt = rebuild_records(&recalculate(&more), &synced, None);
        assert_eq!(rebuilt.records[0].sync.id, id);
        assert_eq!(rebuilt.records[0].weight_kg, 110.0);
        assert!(rebuilt.records[0].sync.is_dirty());
    }

    #[test]
    fn rebuild_flags_stale_records() {
        let exercise = ExerciseId::new();
        let sessions = vec![session_with_sets(1_000, exercise, &[(100.0, 5)])];
        let existing = rebuild_records(&recalculate(&sessions), &[], None).records;

        // All history gone: the record is stale.
        let outcome = rebuild_records(&BTreeMap::new(), &existing, None);
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.stale, vec![existing[0].sync.id]);
    }
}
