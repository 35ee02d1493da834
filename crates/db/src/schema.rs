use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // The bookings exclusion constraint mixes uuid equality with range
    // overlap, which needs btree_gist.
    sqlx::query("CREATE EXTENSION IF NOT EXISTS btree_gist;")
        .execute(pool)
        .await?;

    // Create tutor_schedules table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tutor_schedules (
            tutor_id UUID PRIMARY KEY,
            timezone VARCHAR(64) NOT NULL DEFAULT 'UTC',
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create availability_windows table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS availability_windows (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            tutor_id UUID NOT NULL REFERENCES tutor_schedules(tutor_id) ON DELETE CASCADE,
            weekday SMALLINT NOT NULL CHECK (weekday BETWEEN 0 AND 6),
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            CONSTRAINT valid_window CHECK (end_time > start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create bookings table. The no_double_booking constraint is the write
    // arbiter: two pending/confirmed bookings for one tutor can never hold
    // overlapping [start, end) ranges, no matter how many writers race.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            tutor_id UUID NOT NULL,
            student_id UUID NOT NULL,
            subject VARCHAR(255) NOT NULL,
            start_time TIMESTAMP WITH TIME ZONE NOT NULL,
            end_time TIMESTAMP WITH TIME ZONE NOT NULL,
            notes TEXT NULL,
            meeting_url VARCHAR(512) NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'pending',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_session CHECK (end_time > start_time),
            CONSTRAINT known_status CHECK (
                status IN ('pending', 'confirmed', 'cancelled', 'completed', 'no_show')
            ),
            CONSTRAINT no_double_booking EXCLUDE USING gist (
                tutor_id WITH =,
                tstzrange(start_time, end_time, '[)') WITH &&
            ) WHERE (status IN ('pending', 'confirmed'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_availability_windows_tutor ON availability_windows(tutor_id, weekday);
        CREATE INDEX IF NOT EXISTS idx_bookings_tutor_start ON bookings(tutor_id, start_time);
        CREATE INDEX IF NOT EXISTS idx_bookings_student_id ON bookings(student_id);
        CREATE INDEX IF NOT EXISTS idx_bookings_status ON bookings(status);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
