//! Boundary contracts between the scheduling core and the outside world.
//!
//! Storage and collaborator services plug in behind these traits; the core
//! never talks to a database, a notification channel or a meeting provider
//! directly.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::errors::ScheduleResult;
use crate::models::availability::WeeklyAvailability;
use crate::models::booking::{Booking, BookingQuery, BookingStatus, NewBooking};

/// Storage for tutors' recurring weekly availability.
#[async_trait]
pub trait AvailabilityStore: Send + Sync {
    /// Replaces the tutor's whole weekly pattern. All-or-nothing.
    async fn set_weekly(
        &self,
        tutor_id: Uuid,
        availability: WeeklyAvailability,
    ) -> ScheduleResult<()>;

    /// The tutor's current pattern. A tutor with no stored pattern reads as
    /// empty (no windows, UTC).
    async fn weekly(&self, tutor_id: Uuid) -> ScheduleResult<WeeklyAvailability>;
}

/// Authoritative store of bookings.
#[async_trait]
pub trait BookingLedger: Send + Sync {
    /// Inserts a new `pending` booking, atomically re-checking that no
    /// active booking for the same tutor overlaps it. Of two racing
    /// overlapping inserts, exactly one succeeds.
    async fn insert(&self, booking: NewBooking) -> ScheduleResult<Booking>;

    async fn get(&self, id: Uuid) -> ScheduleResult<Option<Booking>>;

    /// Pending and confirmed bookings for a tutor intersecting
    /// `[from, to)`, ascending by start time.
    async fn active_for_tutor(
        &self,
        tutor_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> ScheduleResult<Vec<Booking>>;

    /// Moves a booking to `target`, re-checking the legality matrix against
    /// the current stored status so racing transitions cannot both win.
    async fn update_status(&self, id: Uuid, target: BookingStatus) -> ScheduleResult<Booking>;

    async fn attach_meeting_url(&self, id: Uuid, url: &str) -> ScheduleResult<Booking>;

    /// History view, newest first.
    async fn list(&self, query: BookingQuery) -> ScheduleResult<Vec<Booking>>;
}

/// A booking lifecycle event handed to the notification boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingEvent {
    pub booking_id: Uuid,
    pub status: BookingStatus,
}

/// Outbound notification channel. Delivery is fire-and-forget; scheduling
/// correctness never waits on it.
#[automock]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn booking_event(&self, event: BookingEvent) -> ScheduleResult<()>;
}

/// Issues a meeting link for a booking entering `confirmed`.
#[automock]
#[async_trait]
pub trait MeetingLinkProvider: Send + Sync {
    async fn create_link(&self, booking: &Booking) -> ScheduleResult<String>;
}
