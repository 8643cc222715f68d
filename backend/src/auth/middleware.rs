//! Middleware for protecting authenticated routes and handling authorization.
//!
//! Three filters run in order on every request: CSRF token check,
//! authentication (session or HTTP Basic), then the URL authorization rules
//! of [`SecurityPolicy`](super::rules::SecurityPolicy).

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use super::basic;
use super::csrf;
use super::errors::AuthError;
use super::models::Principal;
use super::rules::Decision;
use super::service;
use crate::app::AppState;
use crate::errors::{AppError, AppResult};

/// Session key holding the authenticated [`Principal`].
pub const SECURITY_CONTEXT_KEY: &str = "security_context";

/// Rejects state-changing requests whose `X-XSRF-TOKEN` header does not match
/// the `XSRF-TOKEN` cookie, and issues a token cookie when none was sent
/// unless the handler already set or cleared one.
pub async fn csrf_filter(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let cookie_token = csrf::read_cookie_token(request.headers());
    let issued = cookie_token.is_none().then(csrf::generate_token);

    let path = request.uri().path();
    let needs_check =
        !csrf::is_safe_method(request.method()) && !state.policy.is_csrf_ignored(path);

    let mut response = if needs_check
        && (cookie_token.is_none()
            || cookie_token.as_deref() != csrf::read_header_token(request.headers()))
    {
        tracing::warn!(method = %request.method(), path, "rejected request with invalid CSRF token");
        AppError::from(AuthError::InvalidCsrfToken).into_response()
    } else {
        next.run(request).await
    };

    if csrf::sets_token_cookie(response.headers()) {
        return response;
    }
    if let Some(value) = issued.as_deref().and_then(csrf::token_cookie) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}

/// Resolves the request principal and stores it in request extensions.
///
/// A Basic `Authorization` header is always honoured and, on success, the
/// principal is saved in the session. Bad or malformed credentials end the
/// request with 401 whatever the path. Without a header the session is used.
pub async fn authentication_filter(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let session = request.extensions().get::<Session>().cloned();
    let from_session = match &session {
        Some(session) => session.get::<Principal>(SECURITY_CONTEXT_KEY).await?,
        None => None,
    };

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .filter(|h| basic::is_basic(h))
        .map(str::to_owned);

    let principal = match auth_header {
        Some(header) => {
            let credentials = basic::parse_basic_auth_header(&header)?;
            match from_session {
                Some(existing) if existing.name.eq_ignore_ascii_case(&credentials.username) => {
                    Some(existing)
                }
                _ => {
                    let principal = service::authenticate(
                        &state.users,
                        &credentials.username,
                        &credentials.password,
                    )
                    .await?;
                    if let Some(session) = &session {
                        session.insert(SECURITY_CONTEXT_KEY, &principal).await?;
                    }
                    Some(principal)
                }
            }
        }
        None => from_session,
    };

    if let Some(principal) = principal {
        request.extensions_mut().insert(principal);
    }
    Ok(next.run(request).await)
}

/// Applies the ordered URL rules to the resolved principal.
pub async fn authorization_filter(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> AppResult<Response> {
    let path = request.uri().path();
    let principal = request.extensions().get::<Principal>();

    match state.policy.decide(path, principal) {
        Decision::Granted => Ok(next.run(request).await),
        Decision::Unauthenticated => {
            tracing::debug!(path, "authentication required");
            Err(AuthError::AuthenticationRequired.into())
        }
        Decision::Denied => {
            tracing::debug!(path, "access denied");
            Err(AuthError::AccessDenied.into())
        }
    }
}

/// The principal resolved by [`authentication_filter`], if any.
#[derive(Debug, Clone)]
pub struct CurrentPrincipal(pub Option<Principal>);

impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentPrincipal(parts.extensions.get::<Principal>().cloned()))
    }
}
