//! Common test utilities for the API surface.
//!
//! Every test runs the real router over the in-memory store, so requests
//! exercise the same orchestration path as production minus Postgres. The
//! collaborator doubles here let individual tests observe notifications or
//! force meeting-link failures.

// Not every test binary touches every helper.
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tokio::sync::mpsc;
use tutorsync_api::{router, ApiState};
use tutorsync_core::errors::{ScheduleError, ScheduleResult};
use tutorsync_core::models::booking::{Booking, NewBooking};
use tutorsync_core::policy::SchedulingPolicy;
use tutorsync_core::ports::{BookingEvent, BookingLedger, MeetingLinkProvider, Notifier};
use tutorsync_db::memory::MemoryStore;
use uuid::Uuid;

/// Notifier double that acknowledges every event silently.
pub struct QuietNotifier;

#[async_trait]
impl Notifier for QuietNotifier {
    async fn booking_event(&self, _event: BookingEvent) -> ScheduleResult<()> {
        Ok(())
    }
}

/// Notifier double that forwards events to a channel for assertions.
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<BookingEvent>,
}

impl ChannelNotifier {
    pub fn pair() -> (Self, mpsc::UnboundedReceiver<BookingEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn booking_event(&self, event: BookingEvent) -> ScheduleResult<()> {
        let _ = self.tx.send(event);
        Ok(())
    }
}

/// Notifier double that always fails delivery.
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn booking_event(&self, _event: BookingEvent) -> ScheduleResult<()> {
        Err(ScheduleError::Internal("notification channel down".into()))
    }
}

/// Meeting-link double that mints a URL from the booking ID.
pub struct FixedLinks;

#[async_trait]
impl MeetingLinkProvider for FixedLinks {
    async fn create_link(&self, booking: &Booking) -> ScheduleResult<String> {
        Ok(format!("https://meet.test/session/{}", booking.id))
    }
}

/// Meeting-link double that always fails.
pub struct BrokenLinks;

#[async_trait]
impl MeetingLinkProvider for BrokenLinks {
    async fn create_link(&self, _booking: &Booking) -> ScheduleResult<String> {
        Err(ScheduleError::Internal(
            "conferencing provider unavailable".into(),
        ))
    }
}

/// A running test server plus a handle on the store behind it.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<MemoryStore>,
}

pub fn spawn_app() -> TestApp {
    spawn_app_with(
        SchedulingPolicy::default(),
        Arc::new(QuietNotifier),
        Arc::new(FixedLinks),
    )
}

pub fn spawn_app_with_policy(policy: SchedulingPolicy) -> TestApp {
    spawn_app_with(policy, Arc::new(QuietNotifier), Arc::new(FixedLinks))
}

pub fn spawn_app_with(
    policy: SchedulingPolicy,
    notifier: Arc<dyn Notifier>,
    meeting_links: Arc<dyn MeetingLinkProvider>,
) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let state = Arc::new(ApiState {
        availability: store.clone(),
        ledger: store.clone(),
        notifier,
        meeting_links,
        policy,
    });
    let server = TestServer::new(router(state)).expect("Failed to start test server");
    TestApp { server, store }
}

/// Writes a pending booking straight into the store, bypassing the admission
/// pipeline. Lets tests stage bookings the API would refuse, like ones in
/// the past.
pub async fn seed_booking(
    store: &MemoryStore,
    tutor_id: Uuid,
    start: chrono::DateTime<Utc>,
    end: chrono::DateTime<Utc>,
) -> Booking {
    store
        .insert(NewBooking {
            tutor_id,
            student_id: Uuid::new_v4(),
            subject: "Algebra".to_string(),
            start_time: start,
            end_time: end,
            notes: None,
        })
        .await
        .expect("Failed to seed booking")
}

/// A one-hour session at 10:00 UTC, `days_ahead` days from now. Far enough
/// out to clear the default cancellation notice, and at a wall-clock time no
/// all-day availability pattern can miss.
pub fn future_session(days_ahead: i64) -> (DateTime<Utc>, DateTime<Utc>) {
    let date = (Utc::now() + Duration::days(days_ahead)).date_naive();
    let start = Utc.from_utc_datetime(
        &date
            .and_hms_opt(10, 0, 0)
            .expect("Failed to build session start"),
    );
    (start, start + Duration::hours(1))
}

/// Weekly schedule payload covering every day, in UTC.
pub fn open_all_week() -> serde_json::Value {
    let day = serde_json::json!([{ "start": "00:00", "end": "23:59" }]);
    serde_json::json!({
        "monday": day.clone(),
        "tuesday": day.clone(),
        "wednesday": day.clone(),
        "thursday": day.clone(),
        "friday": day.clone(),
        "saturday": day.clone(),
        "sunday": day,
        "timezone": "UTC",
    })
}
