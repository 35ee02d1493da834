use std::fmt;

use thiserror::Error;

use crate::models::booking::BookingStatus;

/// Which admission check rejected a candidate interval.
///
/// Carried inside [`ScheduleError::Conflict`] so callers can tell a schedule
/// mismatch apart from a collision with another booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictReason {
    /// The interval does not fit inside any of the tutor's availability
    /// windows for that weekday.
    OutsideAvailability,

    /// The interval intersects an existing pending or confirmed booking.
    BookingOverlap,
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictReason::OutsideAvailability => write!(f, "outside tutor availability"),
            ConflictReason::BookingOverlap => write!(f, "overlaps an existing booking"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Booking conflict: {0}")]
    Conflict(ConflictReason),

    #[error("Illegal transition: booking cannot move from {from} to {to}")]
    IllegalTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("Cancellation window violation: cancellations must be made at least {hours} hours before the session starts")]
    CancellationWindow { hours: u32 },

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
