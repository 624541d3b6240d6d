//! # LiftLog Model
//!
//! Record types for the LiftLog sync engine.
//!
//! Five record kinds share a common [`SyncEnvelope`]: workout sessions,
//! workout templates, custom exercises, personal records, and body
//! measurements. The envelope carries the id, owner, dirty marker
//! (`synced_at`), and soft-delete tombstone state that the sync engine
//! operates on.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod envelope;
mod exercise;
mod ids;
mod measurement;
mod personal_record;
mod record;
mod session;
mod template;

pub use envelope::SyncEnvelope;
pub use exercise::{canonicalize_name, CustomExercise, ExerciseCategory};
pub use ids::{now_millis, AccountId, ExerciseId, RecordId, Timestamp};
pub use measurement::BodyMeasurement;
pub use personal_record::PersonalRecord;
pub use record::{Record, RecordKind};
pub use session::{ExerciseLog, SetEntry, WorkoutSession};
pub use template::WorkoutTemplate;
