use sqlx::migrate::{MigrateError, Migrator};

use crate::DbPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

pub async fn run_pending(pool: &DbPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

/// Whether the baseline schema has been applied to this database.
pub async fn schema_ready(pool: &DbPool) -> Result<bool, sqlx::Error> {
    let present: i64 = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'edit_request')",
    )
    .fetch_one(pool)
    .await?;
    Ok(present == 1)
}
