use chrono::Utc;
use chrono_tz::Tz;
use sqlx::{Pool, Postgres};
use tracing::debug;
use tutorsync_core::errors::{ScheduleError, ScheduleResult};
use tutorsync_core::models::availability::{TimeWindow, WeeklyAvailability, WEEKDAYS};
use uuid::Uuid;

use crate::models::{DbAvailabilityWindow, DbTutorSchedule};
use crate::repositories::db_err;

/// Replaces the tutor's whole weekly pattern in one transaction. The
/// previous pattern stays in place if anything fails.
pub async fn replace_schedule(
    pool: &Pool<Postgres>,
    tutor_id: Uuid,
    availability: &WeeklyAvailability,
) -> ScheduleResult<()> {
    debug!("Replacing availability: tutor={}", tutor_id);

    let mut tx = pool.begin().await.map_err(db_err)?;

    sqlx::query(
        r#"
        INSERT INTO tutor_schedules (tutor_id, timezone, updated_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (tutor_id)
        DO UPDATE SET timezone = EXCLUDED.timezone, updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(tutor_id)
    .bind(availability.timezone().name())
    .bind(Utc::now())
    .execute(&mut *tx)
    .await
    .map_err(db_err)?;

    sqlx::query(
        r#"
        DELETE FROM availability_windows
        WHERE tutor_id = $1
        "#,
    )
    .bind(tutor_id)
    .execute(&mut *tx)
    .await
    .map_err(db_err)?;

    for (day, weekday) in WEEKDAYS.iter().enumerate() {
        for window in availability.windows_for(*weekday) {
            sqlx::query(
                r#"
                INSERT INTO availability_windows (id, tutor_id, weekday, start_time, end_time)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(tutor_id)
            .bind(day as i16)
            .bind(window.start)
            .bind(window.end)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        }
    }

    tx.commit().await.map_err(db_err)?;

    debug!("Availability replaced: tutor={}", tutor_id);
    Ok(())
}

/// Loads the tutor's weekly pattern. A tutor with no stored row reads as an
/// empty UTC pattern.
pub async fn get_schedule(
    pool: &Pool<Postgres>,
    tutor_id: Uuid,
) -> ScheduleResult<WeeklyAvailability> {
    debug!("Loading availability: tutor={}", tutor_id);

    let schedule = sqlx::query_as::<_, DbTutorSchedule>(
        r#"
        SELECT tutor_id, timezone, updated_at
        FROM tutor_schedules
        WHERE tutor_id = $1
        "#,
    )
    .bind(tutor_id)
    .fetch_optional(pool)
    .await
    .map_err(db_err)?;

    let Some(schedule) = schedule else {
        return Ok(WeeklyAvailability::empty(Tz::UTC));
    };

    let timezone: Tz = schedule.timezone.parse().map_err(|_| {
        ScheduleError::Database(eyre::eyre!(
            "stored timezone {:?} is not a known zone",
            schedule.timezone
        ))
    })?;

    let rows = sqlx::query_as::<_, DbAvailabilityWindow>(
        r#"
        SELECT id, tutor_id, weekday, start_time, end_time
        FROM availability_windows
        WHERE tutor_id = $1
        ORDER BY weekday ASC, start_time ASC
        "#,
    )
    .bind(tutor_id)
    .fetch_all(pool)
    .await
    .map_err(db_err)?;

    let mut days: [Vec<TimeWindow>; 7] = Default::default();
    for row in rows {
        let day = usize::try_from(row.weekday)
            .ok()
            .filter(|day| *day < 7)
            .ok_or_else(|| {
                ScheduleError::Database(eyre::eyre!("stored weekday {} out of range", row.weekday))
            })?;
        let window = TimeWindow::new(row.start_time, row.end_time)
            .map_err(|e| ScheduleError::Database(eyre::eyre!("stored window invalid: {e}")))?;
        days[day].push(window);
    }

    WeeklyAvailability::new(timezone, days)
        .map_err(|e| ScheduleError::Database(eyre::eyre!("stored schedule invalid: {e}")))
}
