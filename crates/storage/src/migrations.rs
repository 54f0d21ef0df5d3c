//! Schema bootstrap, tracked through `PRAGMA user_version`.

use sqlx::SqlitePool;

use crate::error::StorageError;

pub const SCHEMA_VERSION: i64 = 1;

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
    let current_version: i64 = sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(pool)
        .await
        .map_err(|e| StorageError::Migration(e.to_string()))?;

    tracing::info!(current_version, target = SCHEMA_VERSION, "Database schema version");

    if current_version < 1 {
        tracing::info!("Running migration v1: books table");
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS books (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(250) NOT NULL UNIQUE,
                author VARCHAR(250) NOT NULL,
                series VARCHAR(50),
                rating REAL NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(|e| StorageError::Migration(e.to_string()))?;
    }

    if current_version < SCHEMA_VERSION {
        let sql = format!("PRAGMA user_version = {SCHEMA_VERSION}");
        sqlx::query(&sql)
            .execute(pool)
            .await
            .map_err(|e| StorageError::Migration(e.to_string()))?;
    }

    Ok(())
}
