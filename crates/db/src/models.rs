use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tutorsync_core::errors::ScheduleError;
use tutorsync_core::models::booking::{Booking, BookingStatus};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTutorSchedule {
    pub tutor_id: Uuid,
    pub timezone: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAvailabilityWindow {
    pub id: Uuid,
    pub tutor_id: Uuid,
    /// 0 = Monday through 6 = Sunday.
    pub weekday: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub tutor_id: Uuid,
    pub student_id: Uuid,
    pub subject: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub notes: Option<String>,
    pub meeting_url: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbBooking> for Booking {
    type Error = ScheduleError;

    fn try_from(row: DbBooking) -> Result<Self, Self::Error> {
        let status: BookingStatus = row
            .status
            .parse()
            .map_err(|e: String| ScheduleError::Database(eyre::eyre!("corrupt booking row: {e}")))?;
        Ok(Booking {
            id: row.id,
            tutor_id: row.tutor_id,
            student_id: row.student_id,
            subject: row.subject,
            start_time: row.start_time,
            end_time: row.end_time,
            notes: row.notes,
            meeting_url: row.meeting_url,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
