use chrono::{DateTime, Duration, Utc};

use crate::errors::{ScheduleError, ScheduleResult};

/// Tunable scheduling rules. One instance is shared across slot generation,
/// booking admission and cancellation checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulingPolicy {
    /// Spacing between candidate slot starts, in minutes.
    pub slot_granularity_minutes: u32,
    pub min_session_minutes: u32,
    pub max_session_minutes: u32,
    /// Cancellations must happen at least this many hours before the session.
    pub cancellation_notice_hours: u32,
    /// Gap required after an existing session before the next slot is offered.
    /// Applied when listing slots, never when admitting a booking.
    pub booking_buffer_minutes: u32,
}

impl Default for SchedulingPolicy {
    fn default() -> Self {
        SchedulingPolicy {
            slot_granularity_minutes: 15,
            min_session_minutes: 30,
            max_session_minutes: 240,
            cancellation_notice_hours: 24,
            booking_buffer_minutes: 0,
        }
    }
}

impl SchedulingPolicy {
    pub fn granularity(&self) -> Duration {
        Duration::minutes(self.slot_granularity_minutes as i64)
    }

    pub fn buffer(&self) -> Duration {
        Duration::minutes(self.booking_buffer_minutes as i64)
    }

    /// Bounds check for a slot-listing request. Slot queries may ask for any
    /// positive length up to the session maximum.
    pub fn validate_slot_duration(&self, minutes: u32) -> ScheduleResult<()> {
        if minutes == 0 {
            return Err(ScheduleError::Validation(
                "slot duration must be positive".to_string(),
            ));
        }
        if minutes > self.max_session_minutes {
            return Err(ScheduleError::Validation(format!(
                "slot duration must not exceed {} minutes",
                self.max_session_minutes
            )));
        }
        Ok(())
    }

    /// Admission checks for a requested booking interval: well-formed,
    /// not in the past, and within the session length bounds.
    pub fn validate_booking_time(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> ScheduleResult<()> {
        if end <= start {
            return Err(ScheduleError::InvalidInterval(
                "end time must be after start time".to_string(),
            ));
        }
        if start < now {
            return Err(ScheduleError::Validation(
                "sessions cannot be booked in the past".to_string(),
            ));
        }
        let length = end - start;
        if length < Duration::minutes(self.min_session_minutes as i64) {
            return Err(ScheduleError::Validation(format!(
                "session length must be at least {} minutes",
                self.min_session_minutes
            )));
        }
        if length > Duration::minutes(self.max_session_minutes as i64) {
            return Err(ScheduleError::Validation(format!(
                "session length must not exceed {} minutes",
                self.max_session_minutes
            )));
        }
        Ok(())
    }

    /// True when `now` is already inside the protected window before `start`,
    /// i.e. a cancellation at `now` would come too late.
    pub fn violates_cancellation_notice(
        &self,
        now: DateTime<Utc>,
        start: DateTime<Utc>,
    ) -> bool {
        now + Duration::hours(self.cancellation_notice_hours as i64) > start
    }
}
