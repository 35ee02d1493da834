//! Discrete slot generation from a weekly availability pattern.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::models::availability::WeeklyAvailability;

/// Resolves a wall-clock time in `tz` to a UTC instant. Ambiguous local
/// times (DST fall-back) take the earlier instant; nonexistent ones
/// (spring-forward gap) resolve to `None` and the slot is skipped.
fn resolve_local(tz: Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(instant) => Some(instant.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}

/// Generates every bookable start instant of `duration` on `date`: each
/// availability window is walked from its start in `granularity` steps for
/// as long as the whole session still fits inside the window. Output is
/// ascending UTC. Deterministic for identical inputs.
pub fn generate_slots(
    availability: &WeeklyAvailability,
    date: NaiveDate,
    duration: Duration,
    granularity: Duration,
) -> Vec<DateTime<Utc>> {
    let dur_s = duration.num_seconds();
    let gran_s = granularity.num_seconds();
    if dur_s <= 0 || gran_s <= 0 {
        return Vec::new();
    }

    let tz = availability.timezone();
    let mut slots: Vec<DateTime<Utc>> = Vec::new();
    for window in availability.windows_for(date.weekday()) {
        // NaiveTime addition wraps at midnight, so the walk stays on whole
        // seconds from midnight.
        let start_s = i64::from(window.start.num_seconds_from_midnight());
        let end_s = i64::from(window.end.num_seconds_from_midnight());
        let mut cursor = start_s;
        while cursor + dur_s <= end_s {
            if let Some(wall) = NaiveTime::from_num_seconds_from_midnight_opt(cursor as u32, 0) {
                if let Some(instant) = resolve_local(tz, date.and_time(wall)) {
                    slots.push(instant);
                }
            }
            cursor += gran_s;
        }
    }
    slots.sort_unstable();
    slots
}
