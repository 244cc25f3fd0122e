//! Service-time record model.
//!
//! # Invariants
//! - `time` is a duration in milliseconds.
//! - Offset counters are user-entered and never derived.

use crate::clock::{Moment, HOUR_MS, MINUTE_MS};
use crate::model::entity::{Entity, EntityId, Timestamps};
use serde::{Deserialize, Serialize};

/// Logged block of service time plus manual counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    pub id: EntityId,
    pub date: Moment,
    /// Duration in milliseconds.
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub placements: i64,
    #[serde(default)]
    pub video_placements: i64,
    /// Added to the automated return-visit count.
    #[serde(default)]
    pub return_visit_offset: i64,
    /// Added to the automated study count.
    #[serde(default)]
    pub study_offset: i64,
    #[serde(flatten)]
    pub stamps: Timestamps,
}

impl ServiceRecord {
    /// Creates an unsaved record with zeroed counters.
    pub fn new(date: Moment, time_ms: i64) -> Self {
        Self {
            id: EntityId::generate(),
            date,
            time: time_ms,
            placements: 0,
            video_placements: 0,
            return_visit_offset: 0,
            study_offset: 0,
            stamps: Timestamps::default(),
        }
    }

    /// Creates a record from an hours + minutes entry.
    ///
    /// Returns `None` when the duration does not fit in `i64` milliseconds.
    pub fn from_hours_minutes(date: Moment, hours: i64, minutes: i64) -> Option<Self> {
        duration_from_hours_minutes(hours, minutes).map(|time_ms| Self::new(date, time_ms))
    }

    /// Splits `time` into whole hours and remaining whole minutes.
    pub fn hours_and_minutes(&self) -> (i64, i64) {
        (
            self.time.div_euclid(HOUR_MS),
            self.time.rem_euclid(HOUR_MS).div_euclid(MINUTE_MS),
        )
    }
}

/// Milliseconds for `hours` + `minutes`, or `None` on overflow.
pub fn duration_from_hours_minutes(hours: i64, minutes: i64) -> Option<i64> {
    hours
        .checked_mul(HOUR_MS)?
        .checked_add(minutes.checked_mul(MINUTE_MS)?)
}

impl Entity for ServiceRecord {
    const STORAGE_KEY: &'static str = "serviceRecordStore";
    const KIND: &'static str = "service_record";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn timestamps(&self) -> &Timestamps {
        &self.stamps
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.stamps
    }
}
