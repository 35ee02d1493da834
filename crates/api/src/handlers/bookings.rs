//! # Booking Handlers
//!
//! Handlers for creating bookings, reading them back and driving the booking
//! lifecycle.
//!
//! Creation runs the full admission pipeline: interval and policy validation,
//! containment in the tutor's availability, an advisory overlap check against
//! active bookings, then the ledger insert which re-checks overlap atomically.
//! Status changes are authorized against the lifecycle rules before the ledger
//! applies them.
//!
//! Side effects never gate scheduling correctness. Notifications are spawned
//! fire-and-forget, and a failed meeting-link issuance downgrades a
//! confirmation to a success-with-warnings rather than rolling it back.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::warn;
use tutorsync_core::{
    conflict, transitions,
    errors::ScheduleError,
    models::booking::{
        Actor, Booking, BookingListResponse, BookingQuery, BookingResponse, BookingStatus,
        CreateBookingRequest, NewBooking, UpdateBookingStatusRequest, UpdateBookingStatusResponse,
    },
    ports::BookingEvent,
};
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

/// Hands the booking's latest state to the notifier without blocking the
/// response. Delivery failures are logged and dropped.
fn notify(state: &Arc<ApiState>, booking: &Booking) {
    let notifier = Arc::clone(&state.notifier);
    let event = BookingEvent {
        booking_id: booking.id,
        status: booking.status,
    };
    tokio::spawn(async move {
        if let Err(err) = notifier.booking_event(event).await {
            warn!(
                "Failed to deliver notification for booking {}: {}",
                event.booking_id, err
            );
        }
    });
}

/// Creates a new booking in `pending` status.
///
/// # Endpoint
///
/// ```text
/// POST /api/bookings
/// ```
///
/// The requested interval must be well-formed, in the future, within the
/// session length bounds, contained in one of the tutor's availability windows
/// and free of collisions with the tutor's active bookings. Of two racing
/// requests for overlapping intervals, exactly one succeeds; the loser gets a
/// conflict error from the ledger.
///
/// # Errors
///
/// * `ScheduleError::InvalidInterval` - `end_time` is not after `start_time`
/// * `ScheduleError::Validation` - Past start or out-of-bounds session length
/// * `ScheduleError::Conflict` - Outside availability, or overlapping an
///   active booking
#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    state
        .policy
        .validate_booking_time(payload.start_time, payload.end_time, Utc::now())?;

    let availability = state.availability.weekly(payload.tutor_id).await?;
    conflict::check_availability(&availability, payload.start_time, payload.end_time)?;

    // Advisory read-side check for a friendlier error; the ledger insert
    // below re-validates overlap atomically.
    let active = state
        .ledger
        .active_for_tutor(payload.tutor_id, payload.start_time, payload.end_time)
        .await?;
    conflict::check_overlaps(&active, payload.start_time, payload.end_time)?;

    let booking = state
        .ledger
        .insert(NewBooking {
            tutor_id: payload.tutor_id,
            student_id: payload.student_id,
            subject: payload.subject,
            start_time: payload.start_time,
            end_time: payload.end_time,
            notes: payload.notes,
        })
        .await?;

    notify(&state, &booking);

    Ok(Json(booking.into()))
}

/// Returns one booking by ID.
///
/// # Endpoint
///
/// ```text
/// GET /api/bookings/:id
/// ```
#[axum::debug_handler]
pub async fn get_booking(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state
        .ledger
        .get(id)
        .await?
        .ok_or_else(|| ScheduleError::NotFound(format!("Booking with ID {} not found", id)))?;

    Ok(Json(booking.into()))
}

/// Lists bookings, newest first, filtered by any combination of tutor,
/// student, status and time range.
///
/// # Endpoint
///
/// ```text
/// GET /api/bookings?tutor_id=&student_id=&status=&from=&to=
/// ```
#[axum::debug_handler]
pub async fn list_bookings(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<BookingQuery>,
) -> Result<Json<BookingListResponse>, AppError> {
    let bookings = state.ledger.list(query).await?;

    Ok(Json(BookingListResponse {
        bookings: bookings.into_iter().map(BookingResponse::from).collect(),
    }))
}

/// Moves a booking through its lifecycle.
///
/// # Endpoint
///
/// ```text
/// PATCH /api/bookings/:id/status
/// ```
///
/// The payload names the target status and the acting user. The transition is
/// checked against the lifecycle matrix and the actor and timing rules, then
/// applied by the ledger, which re-checks the matrix against the stored status
/// so racing transitions cannot both win.
///
/// A booking entering `confirmed` gets a meeting link. If the provider or the
/// ledger write fails, the confirmation stands and the response carries a
/// warning instead.
///
/// # Errors
///
/// * `ScheduleError::NotFound` - No booking with this ID
/// * `ScheduleError::IllegalTransition` - Matrix violation, or recording an
///   outcome before the session ended
/// * `ScheduleError::Authorization` - Actor may not make this transition
/// * `ScheduleError::CancellationWindow` - Cancellation inside the notice
///   window
#[axum::debug_handler]
pub async fn update_booking_status(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBookingStatusRequest>,
) -> Result<Json<UpdateBookingStatusResponse>, AppError> {
    let booking = state
        .ledger
        .get(id)
        .await?
        .ok_or_else(|| ScheduleError::NotFound(format!("Booking with ID {} not found", id)))?;

    let actor = Actor {
        user_id: payload.acting_user_id,
        role: payload.acting_role,
    };
    transitions::authorize_transition(&booking, payload.status, &actor, Utc::now(), &state.policy)?;

    let mut booking = state.ledger.update_status(id, payload.status).await?;

    let mut warnings = Vec::new();
    if booking.status == BookingStatus::Confirmed {
        match state.meeting_links.create_link(&booking).await {
            Ok(url) => match state.ledger.attach_meeting_url(id, &url).await {
                Ok(updated) => booking = updated,
                Err(err) => {
                    warn!("Failed to store meeting link for booking {}: {}", id, err);
                    warnings.push("meeting link could not be attached".to_string());
                }
            },
            Err(err) => {
                warn!("Failed to create meeting link for booking {}: {}", id, err);
                warnings.push("meeting link could not be created".to_string());
            }
        }
    }

    if matches!(
        booking.status,
        BookingStatus::Confirmed | BookingStatus::Cancelled
    ) {
        notify(&state, &booking);
    }

    Ok(Json(UpdateBookingStatusResponse {
        booking: booking.into(),
        warnings,
    }))
}
