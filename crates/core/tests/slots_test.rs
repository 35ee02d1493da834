use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use pretty_assertions::assert_eq;
use tutorsync_core::models::availability::{TimeWindow, WeeklyAvailability};
use tutorsync_core::slots::generate_slots;

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid wall-clock time")
}

fn window(start: (u32, u32), end: (u32, u32)) -> TimeWindow {
    TimeWindow::new(hm(start.0, start.1), hm(end.0, end.1)).expect("valid window")
}

/// Availability with windows on a single weekday (0 = Monday).
fn availability_on(tz: Tz, weekday: usize, windows: Vec<TimeWindow>) -> WeeklyAvailability {
    let mut days: [Vec<TimeWindow>; 7] = Default::default();
    days[weekday] = windows;
    WeeklyAvailability::new(tz, days).expect("valid availability")
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("valid instant")
}

#[test]
fn test_monday_morning_slots() {
    let availability = availability_on(Tz::UTC, 0, vec![window((9, 0), (12, 0))]);
    // 2026-08-24 is a Monday.
    let slots = generate_slots(
        &availability,
        date(2026, 8, 24),
        Duration::minutes(60),
        Duration::minutes(30),
    );

    assert_eq!(
        slots,
        vec![
            utc(2026, 8, 24, 9, 0),
            utc(2026, 8, 24, 9, 30),
            utc(2026, 8, 24, 10, 0),
            utc(2026, 8, 24, 10, 30),
            utc(2026, 8, 24, 11, 0),
        ]
    );
}

#[test]
fn test_generation_is_deterministic() {
    let availability = availability_on(
        Tz::Europe__Berlin,
        2,
        vec![window((8, 0), (11, 0)), window((13, 0), (18, 0))],
    );
    let day = date(2026, 9, 16);

    let first = generate_slots(&availability, day, Duration::minutes(45), Duration::minutes(15));
    let second = generate_slots(&availability, day, Duration::minutes(45), Duration::minutes(15));

    assert_eq!(first, second);
    assert!(first.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn test_day_without_windows_yields_nothing() {
    let availability = availability_on(Tz::UTC, 0, vec![window((9, 0), (12, 0))]);
    // 2026-08-25 is a Tuesday; only Monday has windows.
    let slots = generate_slots(
        &availability,
        date(2026, 8, 25),
        Duration::minutes(30),
        Duration::minutes(15),
    );
    assert!(slots.is_empty());
}

#[test]
fn test_duration_longer_than_every_window_yields_nothing() {
    let availability = availability_on(Tz::UTC, 0, vec![window((9, 0), (10, 0))]);
    let slots = generate_slots(
        &availability,
        date(2026, 8, 24),
        Duration::minutes(120),
        Duration::minutes(15),
    );
    assert!(slots.is_empty());
}

#[test]
fn test_non_dividing_duration_keeps_latest_fitting_slot() {
    let availability = availability_on(Tz::UTC, 0, vec![window((9, 0), (10, 45))]);
    let slots = generate_slots(
        &availability,
        date(2026, 8, 24),
        Duration::minutes(45),
        Duration::minutes(30),
    );

    // 10:00 + 45min lands exactly on the window end; 10:30 would spill past.
    assert_eq!(
        slots,
        vec![
            utc(2026, 8, 24, 9, 0),
            utc(2026, 8, 24, 9, 30),
            utc(2026, 8, 24, 10, 0),
        ]
    );
}

#[test]
fn test_slots_from_multiple_windows_are_ascending() {
    let availability = availability_on(
        Tz::UTC,
        0,
        vec![window((14, 0), (15, 0)), window((9, 0), (10, 0))],
    );
    let slots = generate_slots(
        &availability,
        date(2026, 8, 24),
        Duration::minutes(60),
        Duration::minutes(60),
    );

    assert_eq!(slots, vec![utc(2026, 8, 24, 9, 0), utc(2026, 8, 24, 14, 0)]);
}

#[test]
fn test_spring_forward_gap_slots_are_skipped() {
    // America/New_York jumps from 02:00 EST to 03:00 EDT on 2026-03-08,
    // a Sunday. Wall-clock starts inside the gap do not exist.
    let availability = availability_on(Tz::America__New_York, 6, vec![window((1, 0), (4, 0))]);
    let slots = generate_slots(
        &availability,
        date(2026, 3, 8),
        Duration::minutes(60),
        Duration::minutes(30),
    );

    // 01:00 and 01:30 are EST (UTC-5); 02:00 and 02:30 never occur;
    // 03:00 is EDT (UTC-4).
    assert_eq!(
        slots,
        vec![
            utc(2026, 3, 8, 6, 0),
            utc(2026, 3, 8, 6, 30),
            utc(2026, 3, 8, 7, 0),
        ]
    );
}

#[test]
fn test_fall_back_ambiguity_takes_earlier_instant() {
    // On 2026-11-01 the hour 01:00-02:00 happens twice in America/New_York.
    let availability = availability_on(Tz::America__New_York, 6, vec![window((1, 0), (2, 0))]);
    let slots = generate_slots(
        &availability,
        date(2026, 11, 1),
        Duration::minutes(30),
        Duration::minutes(30),
    );

    // Earlier occurrences are still EDT (UTC-4).
    assert_eq!(slots, vec![utc(2026, 11, 1, 5, 0), utc(2026, 11, 1, 5, 30)]);
}

#[test]
fn test_non_positive_lengths_yield_nothing() {
    let availability = availability_on(Tz::UTC, 0, vec![window((9, 0), (12, 0))]);
    let day = date(2026, 8, 24);

    assert!(generate_slots(&availability, day, Duration::zero(), Duration::minutes(15)).is_empty());
    assert!(generate_slots(&availability, day, Duration::minutes(30), Duration::zero()).is_empty());
}
