//! Workout templates.

use crate::envelope::SyncEnvelope;
use crate::ids::{AccountId, ExerciseId, Timestamp};
use serde::{Deserialize, Serialize};

/// A reusable workout template: a named, ordered list of exercises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutTemplate {
    /// Sync bookkeeping.
    pub sync: SyncEnvelope,
    /// Display name.
    pub name: String,
    /// Exercises in display order.
    pub exercise_ids: Vec<ExerciseId>,
    /// True for bundled presets, false for user-authored templates.
    pub is_preset: bool,
    /// Last local edit time. Used for last-write-wins merging.
    pub updated_at: Timestamp,
}

impl WorkoutTemplate {
    /// Creates a custom (non-preset) template.
    pub fn new(
        owner_id: Option<AccountId>,
        name: impl Into<String>,
        exercise_ids: Vec<ExerciseId>,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            sync: SyncEnvelope::new(owner_id),
            name: name.into(),
            exercise_ids,
            is_preset: false,
            updated_at,
        }
    }

    /// Applies a local edit, bumping `updated_at` and dirtying the record.
    pub fn touch(&mut self, updated_at: Timestamp) {
        self.updated_at = updated_at;
        self.sync.mark_dirty();
    }
}
