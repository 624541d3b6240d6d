//! Kind-erased record wrapper used by the store adapters and the engine.

use crate::envelope::SyncEnvelope;
use crate::exercise::CustomExercise;
use crate::ids::{AccountId, RecordId, Timestamp};
use crate::measurement::BodyMeasurement;
use crate::personal_record::PersonalRecord;
use crate::session::WorkoutSession;
use crate::template::WorkoutTemplate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The five syncable record collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    /// Workout sessions with their logs and sets.
    Session,
    /// Workout templates.
    Template,
    /// User-defined exercises.
    Exercise,
    /// Derived personal records.
    PersonalRecord,
    /// Body measurements.
    Measurement,
}

impl RecordKind {
    /// All kinds in upload/merge order.
    pub fn all() -> [RecordKind; 5] {
        [
            RecordKind::Session,
            RecordKind::Template,
            RecordKind::Exercise,
            RecordKind::PersonalRecord,
            RecordKind::Measurement,
        ]
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Session => "session",
            RecordKind::Template => "template",
            RecordKind::Exercise => "exercise",
            RecordKind::PersonalRecord => "personal_record",
            RecordKind::Measurement => "measurement",
        };
        f.write_str(name)
    }
}

/// A record of any kind.
///
/// Store adapters and the sync engine move records around without caring
/// which kind they are; the conflict policies match on the concrete variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Record {
    /// A workout session.
    Session(WorkoutSession),
    /// A workout template.
    Template(WorkoutTemplate),
    /// A custom exercise.
    Exercise(CustomExercise),
    /// A personal record.
    PersonalRecord(PersonalRecord),
    /// A body measurement.
    Measurement(BodyMeasurement),
}

impl Record {
    /// The collection this record belongs to.
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Session(_) => RecordKind::Session,
            Record::Template(_) => RecordKind::Template,
            Record::Exercise(_) => RecordKind::Exercise,
            Record::PersonalRecord(_) => RecordKind::PersonalRecord,
            Record::Measurement(_) => RecordKind::Measurement,
        }
    }

    /// The record's sync envelope.
    pub fn sync(&self) -> &SyncEnvelope {
        match self {
            Record::Session(r) => &r.sync,
            Record::Template(r) => &r.sync,
            Record::Exercise(r) => &r.sync,
            Record::PersonalRecord(r) => &r.sync,
            Record::Measurement(r) => &r.sync,
        }
    }

    /// Mutable access to the sync envelope.
    pub fn sync_mut(&mut self) -> &mut SyncEnvelope {
        match self {
            Record::Session(r) => &mut r.sync,
            Record::Template(r) => &mut r.sync,
            Record::Exercise(r) => &mut r.sync,
            Record::PersonalRecord(r) => &mut r.sync,
            Record::Measurement(r) => &mut r.sync,
        }
    }

    /// The record id.
    pub fn id(&self) -> RecordId {
        self.sync().id
    }

    /// The owning account, if any.
    pub fn owner_id(&self) -> Option<AccountId> {
        self.sync().owner_id
    }

    /// The kind-specific timestamp used for recency comparisons.
    pub fn recency(&self) -> Timestamp {
        match self {
            Record::Session(r) => r.started_at,
            Record::Template(r) => r.updated_at,
            Record::Exercise(r) => r.updated_at,
            Record::PersonalRecord(r) => r.achieved_at,
            Record::Measurement(r) => r.measured_at,
        }
    }

    /// The inner session, if this is one.
    pub fn as_session(&self) -> Option<&WorkoutSession> {
        match self {
            Record::Session(r) => Some(r),
            _ => None,
        }
    }

    /// The inner template, if this is one.
    pub fn as_template(&self) -> Option<&WorkoutTemplate> {
        match self {
            Record::Template(r) => Some(r),
            _ => None,
        }
    }

    /// The inner exercise, if this is one.
    pub fn as_exercise(&self) -> Option<&CustomExercise> {
        match self {
            Record::Exercise(r) => Some(r),
            _ => None,
        }
    }

    /// The inner personal record, if this is one.
    pub fn as_personal_record(&self) -> Option<&PersonalRecord> {
        match self {
            Record::PersonalRecord(r) => Some(r),
            _ => None,
        }
    }

    /// The inner measurement, if this is one.
    pub fn as_measurement(&self) -> Option<&BodyMeasurement> {
        match self {
            Record::Measurement(r) => Some(r),
            _ => None,
        }
    }
}

impl From<WorkoutSession> for Record {
    fn from(value: WorkoutSession) -> Self {
        Record::Session(value)
    }
}

impl From<WorkoutTemplate> for Record {
    fn from(value: WorkoutTemplate) -> Self {
        Record::Template(value)
    }
}

impl From<CustomExercise> for Record {
    fn from(value: CustomExercise) -> Self {
        Record::Exercise(value)
    }
}

impl From<PersonalRecord> for Record {
    fn from(value: PersonalRecord) -> Self {
        Record::PersonalRecord(value)
    }
}

impl From<BodyMeasurement> for Record {
    fn from(value: BodyMeasurement) -> Self {
        Record::Measurement(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::ExerciseCategory;

    #[test]
    fn kind_matches_variant() {
        let record: Record = WorkoutSession::start(None, "A", 0).into();
        assert_eq!(record.kind(), RecordKind::Session);

        let record: Record = CustomExercise::new(None, "Row", ExerciseCategory::Strength, 0).into();
        assert_eq!(record.kind(), RecordKind::Exercise);
        assert!(record.as_exercise().is_some());
        assert!(record.as_session().is_none());
    }

    #[test]
    fn recency_uses_kind_specific_timestamp() {
        let mut template = WorkoutTemplate::new(None, "T", vec![], 1_234);
        template.touch(5_678);
        let record: Record = template.into();
        assert_eq!(record.recency(), 5_678);
    }

    #[test]
    fn record_serde_preserves_envelope() {
        let record: Record = BodyMeasurement::new(None, 42).into();
        let json = serde_json::to_string(&record).unwrap();
        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id(), record.id());
        assert_eq!(back, record);
    }
}
