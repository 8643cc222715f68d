//! Handler functions for the SSO endpoints.
//!
//! `current_principal` echoes the identity resolved by the security filters;
//! `logout` discards the server-side session and the CSRF token.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tower_sessions::Session;

use super::csrf;
use super::middleware::CurrentPrincipal;
use super::models::Principal;
use crate::errors::AppResult;

/// `GET /sso/user`. `null` when the caller is anonymous.
pub async fn current_principal(
    CurrentPrincipal(principal): CurrentPrincipal,
) -> Json<Option<Principal>> {
    Json(principal)
}

/// `GET|POST /sso/logout`.
pub async fn logout(session: Session) -> AppResult<Response> {
    session.flush().await?;
    tracing::debug!("session invalidated");

    let mut response = StatusCode::NO_CONTENT.into_response();
    if let Some(value) = csrf::cleared_token_cookie() {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    Ok(response)
}
