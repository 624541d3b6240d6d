//! Workout sessions, exercise logs, and sets.

use crate::envelope::SyncEnvelope;
use crate::ids::{AccountId, ExerciseId, RecordId, Timestamp};
use serde::{Deserialize, Serialize};

/// A single logged set within an exercise log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetEntry {
    /// 1-based position within the exercise log.
    pub set_number: u32,
    /// Weight lifted, in kilograms.
    pub weight_kg: f64,
    /// Repetitions completed.
    pub reps: u32,
    /// Whether this set was a personal record when logged.
    pub is_pr: bool,
    /// When the set was logged.
    pub logged_at: Timestamp,
}

impl SetEntry {
    /// Creates a set entry with the PR flag unset.
    pub fn new(set_number: u32, weight_kg: f64, reps: u32, logged_at: Timestamp) -> Self {
        Self {
            set_number,
            weight_kg,
            reps,
            is_pr: false,
            logged_at,
        }
    }

    /// Volume contributed by this set (weight × reps).
    pub fn volume_kg(&self) -> f64 {
        self.weight_kg * f64::from(self.reps)
    }
}

/// All sets performed for one exercise within a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseLog {
    /// The exercise performed.
    pub exercise_id: ExerciseId,
    /// When the exercise was completed.
    pub completed_at: Timestamp,
    /// Sets in the order they were performed.
    pub sets: Vec<SetEntry>,
}

impl ExerciseLog {
    /// Creates an empty log for an exercise.
    pub fn new(exercise_id: ExerciseId, completed_at: Timestamp) -> Self {
        Self {
            exercise_id,
            completed_at,
            sets: Vec::new(),
        }
    }
}

/// A workout session: header plus the exercise logs it exclusively owns.
///
/// Logs and sets live inside the session record and are replaced wholesale
/// with it; deleting the session cascades to everything it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    /// Sync bookkeeping.
    pub sync: SyncEnvelope,
    /// Template this session was started from, if any.
    pub template_id: Option<RecordId>,
    /// Display name.
    pub name: String,
    /// When the session started. Used for recency comparisons.
    pub started_at: Timestamp,
    /// When the session was completed; `None` while in progress.
    pub completed_at: Option<Timestamp>,
    /// Total duration in seconds.
    pub duration_secs: u32,
    /// Total volume across all sets, in kilograms.
    pub total_volume_kg: f64,
    /// Exercise logs in display order.
    pub logs: Vec<ExerciseLog>,
}

impl WorkoutSession {
    /// Starts a new, empty session.
    pub fn start(owner_id: Option<AccountId>, name: impl Into<String>, started_at: Timestamp) -> Self {
        Self {
            sync: SyncEnvelope::new(owner_id),
            template_id: None,
            name: name.into(),
            started_at,
            completed_at: None,
            duration_secs: 0,
            total_volume_kg: 0.0,
            logs: Vec::new(),
        }
    }

    /// Recomputes total volume from the owned sets.
    pub fn total_volume(&self) -> f64 {
        self.logs
            .iter()
            .flat_map(|log| log.sets.iter())
            .map(SetEntry::volume_kg)
            .sum()
    }

    /// Completes the session, stamping duration and total volume.
    pub fn complete(&mut self, completed_at: Timestamp) {
        self.completed_at = Some(completed_at);
        self.duration_secs =
            u32::try_from((completed_at - self.started_at) / 1_000).unwrap_or(0);
        self.total_volume_kg = self.total_volume();
        self.sync.mark_dirty();
    }
}
