//! Household schema bootstrap.
//!
//! The marketplace tables (products, categories, product_images, articles)
//! are provisioned by the ops migration pipeline; the application owns only
//! the household tables it writes to and creates them on startup when
//! absent.

use tracing::info;

use crate::db::Database;
use crate::error::DbResult;

/// Create the household tables and their index if they do not exist.
/// Idempotent; safe to run on every startup.
pub async fn ensure_schema(db: &Database) -> DbResult<()> {
    db.execute(
        "CREATE TABLE IF NOT EXISTS daily_task (
            id BIGSERIAL PRIMARY KEY,
            day DATE NOT NULL,
            task TEXT NOT NULL,
            task_is_completed BOOLEAN NOT NULL DEFAULT FALSE,
            time_group TEXT NOT NULL
        )",
        &[],
    )
    .await?;

    db.execute(
        "CREATE INDEX IF NOT EXISTS ix_daily_task_day_time_group
            ON daily_task (day, time_group)",
        &[],
    )
    .await?;

    db.execute(
        "CREATE TABLE IF NOT EXISTS inviter (
            inviter_id TEXT PRIMARY KEY,
            baby_name TEXT,
            baby_age TEXT,
            baby_alimentation TEXT,
            baby_sleep_cycle TEXT,
            baby_bath_cycle TEXT,
            baby_meal_cycle TEXT,
            is_baby_taking_medicine BOOLEAN NOT NULL DEFAULT FALSE,
            is_baby_consulting_doctor BOOLEAN NOT NULL DEFAULT FALSE
        )",
        &[],
    )
    .await?;

    info!("Household schema ready");
    Ok(())
}
