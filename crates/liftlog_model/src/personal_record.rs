//! Personal records.

use crate::envelope::SyncEnvelope;
use crate::ids::{AccountId, ExerciseId, RecordId, Timestamp};
use serde::{Deserialize, Serialize};

/// The current best lift for one exercise.
///
/// Derived data: always recomputable by scanning the full set history, so a
/// remote copy may safely overwrite a local one. Exactly one record exists
/// per exercise at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalRecord {
    /// Sync bookkeeping.
    pub sync: SyncEnvelope,
    /// The exercise this record is for.
    pub exercise_id: ExerciseId,
    /// Best weight, in kilograms.
    pub weight_kg: f64,
    /// Reps performed at that weight.
    pub reps: u32,
    /// When the record was achieved.
    pub achieved_at: Timestamp,
    /// The session the record was set in.
    pub session_id: RecordId,
}

impl PersonalRecord {
    /// Creates a personal record entry.
    pub fn new(
        owner_id: Option<AccountId>,
        exercise_id: ExerciseId,
        weight_kg: f64,
        reps: u32,
        achieved_at: Timestamp,
        session_id: RecordId,
    ) -> Self {
        Self {
            sync: SyncEnvelope::new(owner_id),
            exercise_id,
            weight_kg,
            reps,
            achieved_at,
            session_id,
        }
    }
}
