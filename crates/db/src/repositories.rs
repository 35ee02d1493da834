pub mod availability;
pub mod bookings;

use tutorsync_core::errors::{ConflictReason, ScheduleError};

/// SQLSTATE raised when the bookings exclusion constraint rejects a row.
const EXCLUSION_VIOLATION: &str = "23P01";

/// Maps driver errors into the domain taxonomy. An exclusion violation on
/// the bookings table is a lost write race, not a storage fault.
pub(crate) fn db_err(err: sqlx::Error) -> ScheduleError {
    if let sqlx::Error::Database(ref inner) = err {
        if inner.code().as_deref() == Some(EXCLUSION_VIOLATION) {
            return ScheduleError::Conflict(ConflictReason::BookingOverlap);
        }
    }
    ScheduleError::Database(eyre::Report::new(err))
}
