//! Custom error types specific to authentication failures.
//!
//! This module defines a comprehensive set of errors that can occur during
//! authentication and authorization, and the HTTP status each maps to.

use axum::http::StatusCode;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("malformed authorization header: {0}")]
    MalformedAuthorization(String),

    #[error("Bad credentials")]
    BadCredentials,

    #[error("User is disabled")]
    Disabled,

    #[error("There is no password encoder mapped for the id {0:?}")]
    UnknownPasswordEncoder(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("Full authentication is required to access this resource")]
    AuthenticationRequired,

    #[error("Access is denied")]
    AccessDenied,

    #[error("Invalid CSRF token")]
    InvalidCsrfToken,

    #[error("user store error: {0}")]
    Store(#[from] sqlx::Error),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MalformedAuthorization(_)
            | AuthError::BadCredentials
            | AuthError::Disabled
            | AuthError::UnknownPasswordEncoder(_)
            | AuthError::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            AuthError::AccessDenied | AuthError::InvalidCsrfToken => StatusCode::FORBIDDEN,
            AuthError::Hashing(_) | AuthError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
