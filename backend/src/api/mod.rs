//! Central module for organizing the application's main API endpoints.
//!
//! This module acts as a top-level container for the `/api` domains,
//! excluding the SSO routes which are handled by `auth`.

pub mod user;

use axum::Router;

use crate::app::AppState;

pub fn api_router() -> Router<AppState> {
    Router::new().merge(user::routes::user_router())
}
