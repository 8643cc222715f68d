//! Module for database connection setup and common utilities.
//!
//! This module is responsible for provisioning the embedded in-memory
//! database and applying the built-in user/credential and session schemas.

pub mod models;
pub mod queries;
pub mod sessions;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Schema for account storage: `users` plus `authorities`.
pub const USERS_DDL: &str = include_str!("../../sql/users.ddl");

const IN_MEMORY_URL: &str = "sqlite::memory:";

/// Creates a fresh in-memory database and applies [`USERS_DDL`] and
/// [`sessions::SESSIONS_DDL`].
///
/// Every SQLite in-memory connection is its own database, so the pool is
/// pinned to one connection that is never reaped.
pub async fn init_embedded_database() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(IN_MEMORY_URL)?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    sqlx::raw_sql(USERS_DDL).execute(&pool).await?;
    sqlx::raw_sql(sessions::SESSIONS_DDL).execute(&pool).await?;
    tracing::info!("embedded database ready");

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn schema_is_applied() {
        let pool = init_embedded_database().await.unwrap();
        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        let names: Vec<_> = tables.into_iter().map(|(n,)| n).collect();
        assert_eq!(names, vec!["authorities", "sessions", "users"]);
    }

    #[tokio::test]
    async fn each_database_is_fresh() {
        let first = init_embedded_database().await.unwrap();
        sqlx::query("INSERT INTO users (username, password, enabled) VALUES ('a', '{noop}a', 1)")
            .execute(&first)
            .await
            .unwrap();

        let second = init_embedded_database().await.unwrap();
        let users = queries::find_all_users(&second).await.unwrap();
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn authorities_require_an_existing_user() {
        let pool = init_embedded_database().await.unwrap();
        let result =
            sqlx::query("INSERT INTO authorities (username, authority) VALUES ('ghost', 'ROLE_USER')")
                .execute(&pool)
                .await;
        assert!(result.is_err());
    }
}
