//! Handler functions for user management API endpoints.
//!
//! These functions read user records from the database and return them as
//! JSON. Access control is enforced by the security filters, not here.

use axum::{extract::State, Json};

use crate::app::AppState;
use crate::database::{models::UserRecord, queries};
use crate::errors::AppResult;

/// `GET /api/users`
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserRecord>>> {
    let users = queries::find_all_users(&state.pool).await?;
    tracing::debug!(count = users.len(), "listed users");
    Ok(Json(users))
}
