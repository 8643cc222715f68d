//! Cookie-based CSRF tokens.
//!
//! The token lives in a client-readable cookie; state-changing requests must
//! echo it back in a header.

use axum::http::{header, HeaderMap, HeaderValue, Method};
use cookie::{time::Duration, Cookie};

pub const CSRF_COOKIE_NAME: &str = "XSRF-TOKEN";
pub const CSRF_HEADER_NAME: &str = "X-XSRF-TOKEN";

pub fn generate_token() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Methods that never need a token.
pub fn is_safe_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
    )
}

/// Reads the token cookie from the request's `Cookie` headers.
pub fn read_cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == CSRF_COOKIE_NAME)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

pub fn read_header_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(CSRF_HEADER_NAME)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

/// `Set-Cookie` value for a freshly issued token. Not HttpOnly, so scripts
/// can read it and copy it into the header.
pub fn token_cookie(token: &str) -> Option<HeaderValue> {
    let cookie = Cookie::build((CSRF_COOKIE_NAME, token.to_string()))
        .path("/")
        .http_only(false)
        .build();
    HeaderValue::from_str(&cookie.to_string()).ok()
}

/// `Set-Cookie` value that makes the client drop its token.
pub fn cleared_token_cookie() -> Option<HeaderValue> {
    let cookie = Cookie::build((CSRF_COOKIE_NAME, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .build();
    HeaderValue::from_str(&cookie.to_string()).ok()
}

/// Whether `headers` already set or cleared the token cookie.
pub fn sets_token_cookie(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| Cookie::parse(value).ok())
        .any(|c| c.name() == CSRF_COOKIE_NAME)
}
