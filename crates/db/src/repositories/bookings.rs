use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use tracing::debug;
use tutorsync_core::errors::{ScheduleError, ScheduleResult};
use tutorsync_core::models::booking::{BookingQuery, BookingStatus, NewBooking};
use tutorsync_core::transitions::is_legal_transition;
use uuid::Uuid;

use crate::models::DbBooking;
use crate::repositories::db_err;

/// Inserts a new pending booking. The exclusion constraint is the final
/// arbiter: a racing overlapping insert comes back as a conflict.
pub async fn insert_booking(pool: &Pool<Postgres>, new: &NewBooking) -> ScheduleResult<DbBooking> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    debug!(
        "Inserting booking: id={}, tutor={}, start={}, end={}",
        id, new.tutor_id, new.start_time, new.end_time
    );

    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        INSERT INTO bookings (id, tutor_id, student_id, subject, start_time, end_time, notes, status, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING id, tutor_id, student_id, subject, start_time, end_time, notes, meeting_url, status, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(new.tutor_id)
    .bind(new.student_id)
    .bind(&new.subject)
    .bind(new.start_time)
    .bind(new.end_time)
    .bind(&new.notes)
    .bind(BookingStatus::Pending.as_str())
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(db_err)?;

    debug!("Booking inserted: id={}", booking.id);
    Ok(booking)
}

pub async fn get_booking(pool: &Pool<Postgres>, id: Uuid) -> ScheduleResult<Option<DbBooking>> {
    debug!("Getting booking: id={}", id);

    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, tutor_id, student_id, subject, start_time, end_time, notes, meeting_url, status, created_at, updated_at
        FROM bookings
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(db_err)?;

    Ok(booking)
}

/// Pending and confirmed bookings for a tutor intersecting `[from, to)`,
/// ascending by start time.
pub async fn get_active_for_tutor(
    pool: &Pool<Postgres>,
    tutor_id: Uuid,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> ScheduleResult<Vec<DbBooking>> {
    debug!(
        "Getting active bookings: tutor={}, from={}, to={}",
        tutor_id, from, to
    );

    let bookings = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, tutor_id, student_id, subject, start_time, end_time, notes, meeting_url, status, created_at, updated_at
        FROM bookings
        WHERE tutor_id = $1
          AND status IN ('pending', 'confirmed')
          AND start_time < $3
          AND end_time > $2
        ORDER BY start_time ASC
        "#,
    )
    .bind(tutor_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
    .map_err(db_err)?;

    Ok(bookings)
}

/// Moves a booking to `target`. The current row is locked and the legality
/// matrix re-checked inside the transaction, so two racing transitions on
/// the same booking serialize and at most one wins.
pub async fn update_booking_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    target: BookingStatus,
) -> ScheduleResult<DbBooking> {
    debug!("Updating booking status: id={}, target={}", id, target);

    let mut tx = pool.begin().await.map_err(db_err)?;

    let current = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, tutor_id, student_id, subject, start_time, end_time, notes, meeting_url, status, created_at, updated_at
        FROM bookings
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(db_err)?
    .ok_or_else(|| ScheduleError::NotFound(format!("Booking with ID {id} not found")))?;

    let from: BookingStatus = current
        .status
        .parse()
        .map_err(|e: String| ScheduleError::Database(eyre::eyre!("corrupt booking row: {e}")))?;
    if !is_legal_transition(from, target) {
        return Err(ScheduleError::IllegalTransition { from, to: target });
    }

    let updated = sqlx::query_as::<_, DbBooking>(
        r#"
        UPDATE bookings
        SET status = $2, updated_at = $3
        WHERE id = $1
        RETURNING id, tutor_id, student_id, subject, start_time, end_time, notes, meeting_url, status, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(target.as_str())
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await
    .map_err(db_err)?;

    tx.commit().await.map_err(db_err)?;

    debug!("Booking status updated: id={}, status={}", id, target);
    Ok(updated)
}

pub async fn set_meeting_url(
    pool: &Pool<Postgres>,
    id: Uuid,
    url: &str,
) -> ScheduleResult<DbBooking> {
    debug!("Attaching meeting url: id={}", id);

    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        UPDATE bookings
        SET meeting_url = $2, updated_at = $3
        WHERE id = $1
        RETURNING id, tutor_id, student_id, subject, start_time, end_time, notes, meeting_url, status, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(url)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await
    .map_err(db_err)?
    .ok_or_else(|| ScheduleError::NotFound(format!("Booking with ID {id} not found")))?;

    Ok(booking)
}

/// History view with optional filters, newest sessions first.
pub async fn list_bookings(
    pool: &Pool<Postgres>,
    query: &BookingQuery,
) -> ScheduleResult<Vec<DbBooking>> {
    debug!(
        "Listing bookings: tutor={:?}, student={:?}, status={:?}",
        query.tutor_id, query.student_id, query.status
    );

    let bookings = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, tutor_id, student_id, subject, start_time, end_time, notes, meeting_url, status, created_at, updated_at
        FROM bookings
        WHERE ($1::uuid IS NULL OR tutor_id = $1)
          AND ($2::uuid IS NULL OR student_id = $2)
          AND ($3::varchar IS NULL OR status = $3)
          AND ($4::timestamptz IS NULL OR end_time > $4)
          AND ($5::timestamptz IS NULL OR start_time < $5)
        ORDER BY start_time DESC
        "#,
    )
    .bind(query.tutor_id)
    .bind(query.student_id)
    .bind(query.status.map(|s| s.as_str()))
    .bind(query.from)
    .bind(query.to)
    .fetch_all(pool)
    .await
    .map_err(db_err)?;

    Ok(bookings)
}
