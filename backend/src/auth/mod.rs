//! Authentication module for managing user accounts, sessions, and access control.
//!
//! This module provides HTTP Basic authentication against the embedded user
//! store, session-backed principals, CSRF protection and the URL rules that
//! gate the API.

pub mod basic;
pub mod csrf;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod routes;
pub mod rules;
pub mod service;

// Re-exports for convenience
pub use errors::*;
pub use middleware::*;
pub use models::*;
pub use routes::*;
pub use rules::*;
pub use service::*;
