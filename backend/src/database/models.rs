//! Rust structs that represent database table mappings.
//!
//! `UserRow` and `AuthorityRow` mirror the `users` and `authorities` tables;
//! `UserRecord` is the joined shape served by the users listing.

use serde::Serialize;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub username: String,
    pub password: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuthorityRow {
    pub username: String,
    pub authority: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecord {
    pub username: String,
    pub password: String,
    pub enabled: bool,
    pub authorities: Vec<String>,
}
