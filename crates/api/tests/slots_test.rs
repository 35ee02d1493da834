mod common;

use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use tutorsync_core::models::booking::BookingStatus;
use tutorsync_core::models::slot::SlotsResponse;
use tutorsync_core::policy::SchedulingPolicy;
use tutorsync_core::ports::BookingLedger;
use uuid::Uuid;

use common::{seed_booking, spawn_app, spawn_app_with_policy, TestApp};

// 2026-09-14 is a Monday.
const MONDAY: &str = "2026-09-14";

async fn seed_monday_morning(app: &TestApp, timezone: &str) -> Uuid {
    let tutor_id = Uuid::new_v4();
    let payload = json!({
        "monday": [{ "start": "09:00", "end": "12:00" }],
        "timezone": timezone,
    });
    let response = app
        .server
        .put(&format!("/api/tutors/{}/availability", tutor_id))
        .json(&payload)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    tutor_id
}

#[tokio::test]
async fn test_slots_walk_the_window_at_granularity() {
    let app = spawn_app();
    let tutor_id = seed_monday_morning(&app, "UTC").await;

    let response = app
        .server
        .get(&format!("/api/tutors/{}/slots", tutor_id))
        .add_query_param("date", MONDAY)
        .add_query_param("duration", "60")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: SlotsResponse = response.json();
    assert_eq!(body.tutor_id, tutor_id);
    assert_eq!(body.duration_minutes, 60);
    assert_eq!(body.timezone, "UTC");
    // 09:00 through 11:00 inclusive, every 15 minutes.
    assert_eq!(body.slots.len(), 9);
    assert_eq!(
        body.slots[0],
        Utc.with_ymd_and_hms(2026, 9, 14, 9, 0, 0).unwrap()
    );
    assert_eq!(
        *body.slots.last().unwrap(),
        Utc.with_ymd_and_hms(2026, 9, 14, 11, 0, 0).unwrap()
    );
}

#[tokio::test]
async fn test_slots_are_reported_in_utc_for_zoned_tutors() {
    let app = spawn_app();
    let tutor_id = seed_monday_morning(&app, "America/New_York").await;

    let response = app
        .server
        .get(&format!("/api/tutors/{}/slots", tutor_id))
        .add_query_param("date", MONDAY)
        .add_query_param("duration", "60")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: SlotsResponse = response.json();
    assert_eq!(body.timezone, "America/New_York");
    // September in New York is UTC-4, so the 09:00 local start is 13:00 UTC.
    assert_eq!(
        body.slots[0],
        Utc.with_ymd_and_hms(2026, 9, 14, 13, 0, 0).unwrap()
    );
    assert_eq!(
        *body.slots.last().unwrap(),
        Utc.with_ymd_and_hms(2026, 9, 14, 15, 0, 0).unwrap()
    );
}

#[tokio::test]
async fn test_duration_defaults_to_thirty_minutes() {
    let app = spawn_app();
    let tutor_id = seed_monday_morning(&app, "UTC").await;

    let response = app
        .server
        .get(&format!("/api/tutors/{}/slots", tutor_id))
        .add_query_param("date", MONDAY)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: SlotsResponse = response.json();
    assert_eq!(body.duration_minutes, 30);
    // 09:00 through 11:30 inclusive, every 15 minutes.
    assert_eq!(body.slots.len(), 11);
}

#[tokio::test]
async fn test_zero_duration_is_rejected() {
    let app = spawn_app();
    let tutor_id = seed_monday_morning(&app, "UTC").await;

    let response = app
        .server
        .get(&format!("/api/tutors/{}/slots", tutor_id))
        .add_query_param("date", MONDAY)
        .add_query_param("duration", "0")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_oversized_duration_is_rejected() {
    let app = spawn_app();
    let tutor_id = seed_monday_morning(&app, "UTC").await;

    let response = app
        .server
        .get(&format!("/api/tutors/{}/slots", tutor_id))
        .add_query_param("date", MONDAY)
        .add_query_param("duration", "300")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_tutor_lists_no_slots() {
    let app = spawn_app();

    let response = app
        .server
        .get(&format!("/api/tutors/{}/slots", Uuid::new_v4()))
        .add_query_param("date", MONDAY)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: SlotsResponse = response.json();
    assert!(body.slots.is_empty());
}

#[tokio::test]
async fn test_booked_interval_is_carved_out() {
    let app = spawn_app();
    let tutor_id = seed_monday_morning(&app, "UTC").await;
    seed_booking(
        &app.store,
        tutor_id,
        Utc.with_ymd_and_hms(2026, 9, 14, 10, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 9, 14, 11, 0, 0).unwrap(),
    )
    .await;

    let response = app
        .server
        .get(&format!("/api/tutors/{}/slots", tutor_id))
        .add_query_param("date", MONDAY)
        .add_query_param("duration", "60")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: SlotsResponse = response.json();
    // Only the starts whose whole hour clears the 10:00-11:00 booking survive.
    assert_eq!(
        body.slots,
        vec![
            Utc.with_ymd_and_hms(2026, 9, 14, 9, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 9, 14, 11, 0, 0).unwrap(),
        ]
    );
}

#[tokio::test]
async fn test_cancelled_booking_frees_its_slots() {
    let app = spawn_app();
    let tutor_id = seed_monday_morning(&app, "UTC").await;
    let booking = seed_booking(
        &app.store,
        tutor_id,
        Utc.with_ymd_and_hms(2026, 9, 14, 10, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 9, 14, 11, 0, 0).unwrap(),
    )
    .await;
    app.store
        .update_status(booking.id, BookingStatus::Cancelled)
        .await
        .expect("Failed to cancel booking");

    let response = app
        .server
        .get(&format!("/api/tutors/{}/slots", tutor_id))
        .add_query_param("date", MONDAY)
        .add_query_param("duration", "60")
        .await;

    let body: SlotsResponse = response.json();
    assert_eq!(body.slots.len(), 9);
}

#[tokio::test]
async fn test_buffer_extends_the_blocked_interval() {
    let policy = SchedulingPolicy {
        booking_buffer_minutes: 15,
        ..SchedulingPolicy::default()
    };
    let app = spawn_app_with_policy(policy);
    let tutor_id = seed_monday_morning(&app, "UTC").await;
    seed_booking(
        &app.store,
        tutor_id,
        Utc.with_ymd_and_hms(2026, 9, 14, 10, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 9, 14, 11, 0, 0).unwrap(),
    )
    .await;

    let response = app
        .server
        .get(&format!("/api/tutors/{}/slots", tutor_id))
        .add_query_param("date", MONDAY)
        .add_query_param("duration", "60")
        .await;

    let body: SlotsResponse = response.json();
    // The wind-down gap pushes the 11:00 restart out to 11:15, which no
    // longer fits the window, so only the pre-booking start survives.
    assert_eq!(
        body.slots,
        vec![Utc.with_ymd_and_hms(2026, 9, 14, 9, 0, 0).unwrap()]
    );
}
