//! Database query functions (Data Access Objects).
//!
//! This module centralizes all direct database operations on the `users` and
//! `authorities` tables, keeping SQL out of services and handlers.

use std::collections::BTreeMap;

use sqlx::{Sqlite, SqlitePool, Transaction};

use super::models::{AuthorityRow, UserRecord, UserRow};

pub async fn insert_user(
    tx: &mut Transaction<'_, Sqlite>,
    username: &str,
    password: &str,
    enabled: bool,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO users (username, password, enabled) VALUES (?, ?, ?)")
        .bind(username)
        .bind(password)
        .bind(enabled)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

pub async fn insert_authority(
    tx: &mut Transaction<'_, Sqlite>,
    username: &str,
    authority: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO authorities (username, authority) VALUES (?, ?)")
        .bind(username)
        .bind(authority)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

pub async fn find_user_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        "SELECT username, password, enabled FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

pub async fn find_authorities_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Vec<AuthorityRow>, sqlx::Error> {
    sqlx::query_as::<_, AuthorityRow>(
        "SELECT username, authority FROM authorities WHERE username = ? ORDER BY authority",
    )
    .bind(username)
    .fetch_all(pool)
    .await
}

/// All users with their authorities, ordered by username.
pub async fn find_all_users(pool: &SqlitePool) -> Result<Vec<UserRecord>, sqlx::Error> {
    let users = sqlx::query_as::<_, UserRow>(
        "SELECT username, password, enabled FROM users ORDER BY username",
    )
    .fetch_all(pool)
    .await?;

    let authorities = sqlx::query_as::<_, AuthorityRow>(
        "SELECT username, authority FROM authorities ORDER BY username, authority",
    )
    .fetch_all(pool)
    .await?;

    let mut by_user: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for row in authorities {
        by_user
            .entry(row.username.to_lowercase())
            .or_default()
            .push(row.authority);
    }

    Ok(users
        .into_iter()
        .map(|user| UserRecord {
            authorities: by_user.remove(&user.username.to_lowercase()).unwrap_or_default(),
            username: user.username,
            password: user.password,
            enabled: user.enabled,
        })
        .collect())
}
