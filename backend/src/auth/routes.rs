//! Defines the HTTP routes for the SSO identity endpoints.
//!
//! These routes are merged into the main Axum router, underneath the
//! security filters.

use axum::{routing::get, Router};

use super::handlers::{current_principal, logout};
use crate::app::AppState;

pub fn sso_router(logout_url: &str) -> Router<AppState> {
    Router::new()
        .route("/sso/user", get(current_principal))
        .route(logout_url, get(logout).post(logout))
}
