//! Admission checks for candidate booking intervals.
//!
//! All intervals are half-open `[start, end)`: a session ending at 10:00
//! never collides with one starting at 10:00. These functions are pure and
//! advisory; the ledger re-validates overlap atomically on write.

use chrono::{DateTime, Datelike, Duration, Utc};

use crate::errors::{ConflictReason, ScheduleError, ScheduleResult};
use crate::models::availability::WeeklyAvailability;
use crate::models::booking::Booking;

/// Half-open overlap test for two UTC intervals.
pub fn intervals_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Rejects degenerate intervals. Zero-length sessions are not bookable.
pub fn validate_interval(start: DateTime<Utc>, end: DateTime<Utc>) -> ScheduleResult<()> {
    if end <= start {
        return Err(ScheduleError::InvalidInterval(
            "end time must be after start time".to_string(),
        ));
    }
    Ok(())
}

/// Checks that `[start, end)`, rendered in the tutor's timezone, falls on a
/// single local calendar day and lies entirely inside one availability
/// window. An interval that spills past a window edge is rejected whole,
/// never truncated.
pub fn check_availability(
    availability: &WeeklyAvailability,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> ScheduleResult<()> {
    let tz = availability.timezone();
    let local_start = start.with_timezone(&tz);
    let local_end = end.with_timezone(&tz);
    if local_start.date_naive() == local_end.date_naive() {
        let s = local_start.time();
        let e = local_end.time();
        let contained = availability
            .windows_for(local_start.weekday())
            .iter()
            .any(|w| w.start <= s && e <= w.end);
        if contained {
            return Ok(());
        }
    }
    Err(ScheduleError::Conflict(ConflictReason::OutsideAvailability))
}

/// Checks `[start, end)` against the tutor's bookings. Only pending and
/// confirmed bookings block; terminal ones never do.
pub fn check_overlaps(
    bookings: &[Booking],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> ScheduleResult<()> {
    let collision = bookings
        .iter()
        .any(|b| b.status.is_active() && intervals_overlap(start, end, b.start_time, b.end_time));
    if collision {
        return Err(ScheduleError::Conflict(ConflictReason::BookingOverlap));
    }
    Ok(())
}

/// Drops candidate slot starts that would collide with an active booking.
/// Each booking's interval is extended by `buffer` at its end, so a slot
/// cannot start inside the wind-down gap after a session.
pub fn filter_available(
    slots: Vec<DateTime<Utc>>,
    duration: Duration,
    bookings: &[Booking],
    buffer: Duration,
) -> Vec<DateTime<Utc>> {
    slots
        .into_iter()
        .filter(|&slot_start| {
            let slot_end = slot_start + duration;
            !bookings.iter().any(|b| {
                b.status.is_active()
                    && intervals_overlap(slot_start, slot_end, b.start_time, b.end_time + buffer)
            })
        })
        .collect()
}
