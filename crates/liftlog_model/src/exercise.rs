//! User-defined exercises.

use crate::envelope::SyncEnvelope;
use crate::ids::{AccountId, Timestamp};
use serde::{Deserialize, Serialize};

/// Broad movement category of an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExerciseCategory {
    /// Compound or isolation strength work.
    Strength,
    /// Cardiovascular work.
    Cardio,
    /// Mobility and stretching.
    Mobility,
    /// Anything else.
    Other,
}

/// A custom exercise authored by the user.
///
/// Names must be unique case-insensitively among *active* exercises for an
/// owner; tombstoned exercises do not reserve their name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomExercise {
    /// Sync bookkeeping.
    pub sync: SyncEnvelope,
    /// Display name.
    pub name: String,
    /// Movement category.
    pub category: ExerciseCategory,
    /// Equipment used, free-form.
    pub equipment: Option<String>,
    /// Optional description.
    pub description: Option<String>,
    /// Last local edit time.
    pub updated_at: Timestamp,
}

impl CustomExercise {
    /// Creates a new custom exercise.
    pub fn new(
        owner_id: Option<AccountId>,
        name: impl Into<String>,
        category: ExerciseCategory,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            sync: SyncEnvelope::new(owner_id),
            name: name.into(),
            category,
            equipment: None,
            description: None,
            updated_at,
        }
    }

    /// Name normalized for case-insensitive uniqueness checks.
    pub fn canonical_name(&self) -> String {
        canonicalize_name(&self.name)
    }
}

/// Normalizes an exercise name for uniqueness comparison.
pub fn canonicalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_name_ignores_case_and_whitespace() {
        let exercise =
            CustomExercise::new(None, "  Bulgarian Split Squat ", ExerciseCategory::Strength, 0);
        assert_eq!(exercise.canonical_name(), "bulgarian split squat");
        assert_eq!(canonicalize_name("SQUAT"), canonicalize_name("squat"));
    }
}
