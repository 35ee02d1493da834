use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_duration() -> u32 {
    30
}

/// Query parameters for the open-slot listing.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SlotQuery {
    /// Calendar date in the tutor's timezone.
    pub date: NaiveDate,
    /// Requested session length in minutes.
    #[serde(default = "default_duration")]
    pub duration: u32,
}

/// Bookable start instants for one tutor, date and session length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotsResponse {
    pub tutor_id: Uuid,
    pub date: NaiveDate,
    pub duration_minutes: u32,
    /// Timezone the slots were generated against.
    pub timezone: String,
    pub slots: Vec<DateTime<Utc>>,
}
