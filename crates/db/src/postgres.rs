use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tutorsync_core::errors::ScheduleResult;
use tutorsync_core::models::availability::WeeklyAvailability;
use tutorsync_core::models::booking::{Booking, BookingQuery, BookingStatus, NewBooking};
use tutorsync_core::ports::{AvailabilityStore, BookingLedger};
use uuid::Uuid;

use crate::repositories::{availability, bookings};
use crate::DbPool;

/// Postgres-backed scheduling stores. Overlap safety rests on the bookings
/// exclusion constraint rather than application-side locks.
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        PgStore { pool }
    }
}

#[async_trait]
impl AvailabilityStore for PgStore {
    async fn set_weekly(
        &self,
        tutor_id: Uuid,
        availability: WeeklyAvailability,
    ) -> ScheduleResult<()> {
        availability::replace_schedule(&self.pool, tutor_id, &availability).await
    }

    async fn weekly(&self, tutor_id: Uuid) -> ScheduleResult<WeeklyAvailability> {
        availability::get_schedule(&self.pool, tutor_id).await
    }
}

#[async_trait]
impl BookingLedger for PgStore {
    async fn insert(&self, booking: NewBooking) -> ScheduleResult<Booking> {
        bookings::insert_booking(&self.pool, &booking).await?.try_into()
    }

    async fn get(&self, id: Uuid) -> ScheduleResult<Option<Booking>> {
        match bookings::get_booking(&self.pool, id).await? {
            Some(row) => Ok(Some(row.try_into()?)),
            None => Ok(None),
        }
    }

    async fn active_for_tutor(
        &self,
        tutor_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> ScheduleResult<Vec<Booking>> {
        bookings::get_active_for_tutor(&self.pool, tutor_id, from, to)
            .await?
            .into_iter()
            .map(Booking::try_from)
            .collect()
    }

    async fn update_status(&self, id: Uuid, target: BookingStatus) -> ScheduleResult<Booking> {
        bookings::update_booking_status(&self.pool, id, target)
            .await?
            .try_into()
    }

    async fn attach_meeting_url(&self, id: Uuid, url: &str) -> ScheduleResult<Booking> {
        bookings::set_meeting_url(&self.pool, id, url).await?.try_into()
    }

    async fn list(&self, query: BookingQuery) -> ScheduleResult<Vec<Booking>> {
        bookings::list_bookings(&self.pool, &query)
            .await?
            .into_iter()
            .map(Booking::try_from)
            .collect()
    }
}
