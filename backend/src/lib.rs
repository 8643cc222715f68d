//! SSO identity backend.
//!
//! An Axum service exposing the authenticated principal at `/sso/user` and an
//! ADMIN-only user listing at `/api/users`, backed by an embedded in-memory
//! database seeded with two demo accounts.

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod middleware;

pub use app::{build_app, AppState};
pub use config::Config;
pub use errors::{AppError, AppResult};
