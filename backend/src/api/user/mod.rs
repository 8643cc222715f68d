//! Module for user management API endpoints.
//!
//! This module handles read access to the stored user accounts, distinct
//! from the SSO identity endpoints in `auth`.

pub mod handlers;
pub mod routes;
