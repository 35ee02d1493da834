//! In-memory scheduling stores backed by [`dashmap`].
//!
//! The booking ledger shards by tutor: an insert holds the tutor's shard
//! entry for the whole check-then-insert, so two racing overlapping inserts
//! for one tutor serialize and exactly one wins. Writes for different
//! tutors never contend. Used as the router-test backend and as a
//! database-free dev backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use dashmap::DashMap;
use tracing::debug;
use tutorsync_core::conflict::intervals_overlap;
use tutorsync_core::errors::{ConflictReason, ScheduleError, ScheduleResult};
use tutorsync_core::models::availability::WeeklyAvailability;
use tutorsync_core::models::booking::{Booking, BookingQuery, BookingStatus, NewBooking};
use tutorsync_core::ports::{AvailabilityStore, BookingLedger};
use tutorsync_core::transitions::is_legal_transition;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    schedules: DashMap<Uuid, WeeklyAvailability>,
    /// Bookings sharded by tutor; a shard's entry guard is the per-tutor
    /// write lock.
    ledgers: DashMap<Uuid, Vec<Booking>>,
    /// Booking id to owning tutor. Guards on this map are always released
    /// before a ledger shard is touched.
    tutor_of: DashMap<Uuid, Uuid>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn owning_tutor(&self, id: Uuid) -> Option<Uuid> {
        self.tutor_of.get(&id).map(|tutor| *tutor)
    }
}

#[async_trait]
impl AvailabilityStore for MemoryStore {
    async fn set_weekly(
        &self,
        tutor_id: Uuid,
        availability: WeeklyAvailability,
    ) -> ScheduleResult<()> {
        debug!("Storing availability: tutor={}", tutor_id);
        self.schedules.insert(tutor_id, availability);
        Ok(())
    }

    async fn weekly(&self, tutor_id: Uuid) -> ScheduleResult<WeeklyAvailability> {
        Ok(self
            .schedules
            .get(&tutor_id)
            .map(|entry| entry.clone())
            .unwrap_or_else(|| WeeklyAvailability::empty(Tz::UTC)))
    }
}

#[async_trait]
impl BookingLedger for MemoryStore {
    async fn insert(&self, new: NewBooking) -> ScheduleResult<Booking> {
        // The entry guard is held across the check and the push.
        let mut shard = self.ledgers.entry(new.tutor_id).or_default();

        let collision = shard.iter().any(|b| {
            b.status.is_active()
                && intervals_overlap(new.start_time, new.end_time, b.start_time, b.end_time)
        });
        if collision {
            return Err(ScheduleError::Conflict(ConflictReason::BookingOverlap));
        }

        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4(),
            tutor_id: new.tutor_id,
            student_id: new.student_id,
            subject: new.subject,
            start_time: new.start_time,
            end_time: new.end_time,
            notes: new.notes,
            meeting_url: None,
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.tutor_of.insert(booking.id, booking.tutor_id);
        shard.push(booking.clone());

        debug!("Inserted booking: id={}, tutor={}", booking.id, booking.tutor_id);
        Ok(booking)
    }

    async fn get(&self, id: Uuid) -> ScheduleResult<Option<Booking>> {
        let Some(tutor_id) = self.owning_tutor(id) else {
            return Ok(None);
        };
        Ok(self
            .ledgers
            .get(&tutor_id)
            .and_then(|shard| shard.iter().find(|b| b.id == id).cloned()))
    }

    async fn active_for_tutor(
        &self,
        tutor_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> ScheduleResult<Vec<Booking>> {
        let mut bookings: Vec<Booking> = match self.ledgers.get(&tutor_id) {
            Some(shard) => shard
                .iter()
                .filter(|b| {
                    b.status.is_active()
                        && intervals_overlap(from, to, b.start_time, b.end_time)
                })
                .cloned()
                .collect(),
            None => Vec::new(),
        };
        bookings.sort_by_key(|b| b.start_time);
        Ok(bookings)
    }

    async fn update_status(&self, id: Uuid, target: BookingStatus) -> ScheduleResult<Booking> {
        let tutor_id = self
            .owning_tutor(id)
            .ok_or_else(|| ScheduleError::NotFound(format!("Booking with ID {id} not found")))?;
        let mut shard = self
            .ledgers
            .get_mut(&tutor_id)
            .ok_or_else(|| ScheduleError::NotFound(format!("Booking with ID {id} not found")))?;
        let booking = shard
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| ScheduleError::NotFound(format!("Booking with ID {id} not found")))?;

        if !is_legal_transition(booking.status, target) {
            return Err(ScheduleError::IllegalTransition {
                from: booking.status,
                to: target,
            });
        }

        booking.status = target;
        booking.updated_at = Utc::now();
        debug!("Booking status updated: id={}, status={}", id, target);
        Ok(booking.clone())
    }

    async fn attach_meeting_url(&self, id: Uuid, url: &str) -> ScheduleResult<Booking> {
        let tutor_id = self
            .owning_tutor(id)
            .ok_or_else(|| ScheduleError::NotFound(format!("Booking with ID {id} not found")))?;
        let mut shard = self
            .ledgers
            .get_mut(&tutor_id)
            .ok_or_else(|| ScheduleError::NotFound(format!("Booking with ID {id} not found")))?;
        let booking = shard
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| ScheduleError::NotFound(format!("Booking with ID {id} not found")))?;

        booking.meeting_url = Some(url.to_string());
        booking.updated_at = Utc::now();
        Ok(booking.clone())
    }

    async fn list(&self, query: BookingQuery) -> ScheduleResult<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self
            .ledgers
            .iter()
            .flat_map(|shard| shard.value().clone())
            .filter(|b| {
                query.tutor_id.map_or(true, |t| b.tutor_id == t)
                    && query.student_id.map_or(true, |s| b.student_id == s)
                    && query.status.map_or(true, |s| b.status == s)
                    && query.from.map_or(true, |from| b.end_time > from)
                    && query.to.map_or(true, |to| b.start_time < to)
            })
            .collect();
        bookings.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(bookings)
    }
}
