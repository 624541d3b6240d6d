//! Body measurements.

use crate::envelope::SyncEnvelope;
use crate::ids::{AccountId, Timestamp};
use serde::{Deserialize, Serialize};

/// A dated snapshot of body metrics.
///
/// Unlike the other kinds, measurement deletions are tracked through a
/// separate pending-deletion id list in the local store rather than the
/// tombstone flag on the record itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyMeasurement {
    /// Sync bookkeeping.
    pub sync: SyncEnvelope,
    /// When the measurement was taken. Used for recency comparisons.
    pub measured_at: Timestamp,
    /// Body weight, in kilograms.
    pub weight_kg: Option<f64>,
    /// Body fat percentage.
    pub body_fat_pct: Option<f64>,
    /// Waist circumference, in centimeters.
    pub waist_cm: Option<f64>,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl BodyMeasurement {
    /// Creates an empty measurement snapshot.
    pub fn new(owner_id: Option<AccountId>, measured_at: Timestamp) -> Self {
        Self {
            sync: SyncEnvelope::new(owner_id),
            measured_at,
            weight_kg: None,
            body_fat_pct: None,
            waist_cm: None,
            notes: None,
        }
    }
}
