//! # Slot Discovery Handler
//!
//! Lists the start instants a student can actually book for one tutor on one
//! calendar date. The listing is availability minus active bookings: candidate
//! starts are generated from the tutor's weekly pattern, then every candidate
//! whose session would collide with a pending or confirmed booking (plus the
//! configured wind-down buffer) is dropped.
//!
//! The listing is advisory. A slot can be taken between the read and the
//! booking attempt; the ledger's atomic overlap check is what actually
//! arbitrates the race.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Duration;
use std::sync::Arc;
use tutorsync_core::{
    conflict::filter_available,
    models::slot::{SlotQuery, SlotsResponse},
    slots::generate_slots,
};
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

/// Lists open slots for a tutor on a given date.
///
/// # Endpoint
///
/// ```text
/// GET /api/tutors/:id/slots?date=2026-09-14&duration=60
/// ```
///
/// `date` is a calendar date in the tutor's timezone; `duration` is the
/// desired session length in minutes and defaults to 30. An unknown tutor has
/// no availability, so the response is an empty list rather than an error.
///
/// # Errors
///
/// * `ScheduleError::Validation` - `duration` is zero or exceeds the maximum
///   session length
/// * `ScheduleError::Database` - Storage error
#[axum::debug_handler]
pub async fn list_slots(
    State(state): State<Arc<ApiState>>,
    Path(tutor_id): Path<Uuid>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<SlotsResponse>, AppError> {
    state.policy.validate_slot_duration(query.duration)?;

    let availability = state.availability.weekly(tutor_id).await?;
    let duration = Duration::minutes(i64::from(query.duration));
    let slots = generate_slots(
        &availability,
        query.date,
        duration,
        state.policy.granularity(),
    );

    // Fetch bookings that could collide with any candidate, widened on the
    // left so a session ending just before the first slot still carries its
    // buffer into the listing.
    let slots = if let (Some(&first), Some(&last)) = (slots.first(), slots.last()) {
        let buffer = state.policy.buffer();
        let bookings = state
            .ledger
            .active_for_tutor(tutor_id, first - buffer, last + duration)
            .await?;
        filter_available(slots, duration, &bookings, buffer)
    } else {
        slots
    };

    Ok(Json(SlotsResponse {
        tutor_id,
        date: query.date,
        duration_minutes: query.duration,
        timezone: availability.timezone().name().to_string(),
        slots,
    }))
}
