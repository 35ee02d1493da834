//! # Availability Handlers
//!
//! Handlers for reading and replacing a tutor's recurring weekly availability.
//!
//! The stored pattern is the source of truth for slot generation and booking
//! admission. Replacement is wholesale: the submitted week overwrites whatever
//! was stored before, and a rejected submission leaves the previous pattern
//! untouched. Narrowing availability never cancels existing bookings; those
//! stay governed by the booking lifecycle.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tutorsync_core::models::availability::{WeeklyAvailability, WeeklySchedule};
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

/// Replaces the tutor's weekly availability pattern.
///
/// # Endpoint
///
/// ```text
/// PUT /api/tutors/:id/availability
/// ```
///
/// The payload is a week of wall-clock windows plus an IANA timezone. Days
/// absent from the payload mean "not available that day". The response echoes
/// the stored pattern with windows sorted by start time.
///
/// # Errors
///
/// * `ScheduleError::Validation` - Unknown timezone, a window with
///   `start >= end`, or overlapping windows within one day
/// * `ScheduleError::Database` - Storage error
#[axum::debug_handler]
pub async fn put_availability(
    State(state): State<Arc<ApiState>>,
    Path(tutor_id): Path<Uuid>,
    Json(payload): Json<WeeklySchedule>,
) -> Result<Json<WeeklySchedule>, AppError> {
    let availability = WeeklyAvailability::try_from(payload)?;
    state
        .availability
        .set_weekly(tutor_id, availability.clone())
        .await?;

    Ok(Json(WeeklySchedule::from(&availability)))
}

/// Returns the tutor's current weekly availability pattern.
///
/// # Endpoint
///
/// ```text
/// GET /api/tutors/:id/availability
/// ```
///
/// A tutor who never stored a pattern reads as an empty week in UTC.
#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<ApiState>>,
    Path(tutor_id): Path<Uuid>,
) -> Result<Json<WeeklySchedule>, AppError> {
    let availability = state.availability.weekly(tutor_id).await?;

    Ok(Json(WeeklySchedule::from(&availability)))
}
