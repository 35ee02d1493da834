//! Booking lifecycle rules.
//!
//! ```text
//! pending ──► confirmed ──► completed
//!    │            │     └──► no_show
//!    └──► cancelled ◄────┘
//! ```
//!
//! `cancelled`, `completed` and `no_show` are terminal.

use chrono::{DateTime, Utc};

use crate::errors::{ScheduleError, ScheduleResult};
use crate::models::booking::{Actor, Booking, BookingStatus, Role};
use crate::policy::SchedulingPolicy;

/// The legality matrix, independent of who is asking or when.
pub fn is_legal_transition(from: BookingStatus, to: BookingStatus) -> bool {
    use BookingStatus::*;
    matches!(
        (from, to),
        (Pending, Confirmed)
            | (Pending, Cancelled)
            | (Confirmed, Cancelled)
            | (Confirmed, Completed)
            | (Confirmed, NoShow)
    )
}

/// Full transition check: matrix legality, then the actor and timing rules
/// for the target state. Returns `Ok(())` when the transition may proceed.
pub fn authorize_transition(
    booking: &Booking,
    target: BookingStatus,
    actor: &Actor,
    now: DateTime<Utc>,
    policy: &SchedulingPolicy,
) -> ScheduleResult<()> {
    if !is_legal_transition(booking.status, target) {
        return Err(ScheduleError::IllegalTransition {
            from: booking.status,
            to: target,
        });
    }

    let acts_for_tutor = actor.role == Role::Admin
        || (actor.role == Role::Tutor && actor.user_id == booking.tutor_id);

    match target {
        BookingStatus::Confirmed => {
            if !acts_for_tutor {
                return Err(ScheduleError::Authorization(
                    "only the booking's tutor or an admin may confirm it".to_string(),
                ));
            }
        }
        BookingStatus::Cancelled => {
            let is_party = acts_for_tutor
                || (actor.role == Role::Student && actor.user_id == booking.student_id);
            if !is_party {
                return Err(ScheduleError::Authorization(
                    "only the booking's student, tutor or an admin may cancel it".to_string(),
                ));
            }
            if policy.violates_cancellation_notice(now, booking.start_time) {
                return Err(ScheduleError::CancellationWindow {
                    hours: policy.cancellation_notice_hours,
                });
            }
        }
        BookingStatus::Completed | BookingStatus::NoShow => {
            if !acts_for_tutor {
                return Err(ScheduleError::Authorization(
                    "only the booking's tutor or an admin may record the session outcome"
                        .to_string(),
                ));
            }
            // Outcomes can only be recorded once the session is over.
            if now < booking.end_time {
                return Err(ScheduleError::IllegalTransition {
                    from: booking.status,
                    to: target,
                });
            }
        }
        // The matrix admits no transition into pending.
        BookingStatus::Pending => {}
    }

    Ok(())
}
