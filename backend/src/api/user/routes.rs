//! Defines the HTTP routes for the users API.

use axum::{routing::get, Router};

use super::handlers::list_users;
use crate::app::AppState;

pub fn user_router() -> Router<AppState> {
    Router::new().route("/api/users", get(list_users))
}
