//! Application state and router assembly.
//!
//! Layer order, outermost first: request tracing, security headers,
//! session, CSRF, authentication, authorization.

use std::sync::Arc;

use axum::{middleware as axum_middleware, routing::get, Router};
use sqlx::SqlitePool;
use tower_sessions::{
    cookie::time::Duration, session_store::ExpiredDeletion, Expiry, SessionManagerLayer,
};

use crate::api;
use crate::auth::{self, SecurityPolicy, SqlUserDetailsManager, UserDetailsManager};
use crate::config::Config;
use crate::database::{self, sessions::SqliteSessionStore};
use crate::errors::AppResult;
use crate::middleware;

pub const SESSION_COOKIE_NAME: &str = "SESSION";

/// Sessions expire after this long without a request.
pub const SESSION_TIMEOUT: Duration = Duration::minutes(30);

const SESSION_REAP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub users: Arc<dyn UserDetailsManager>,
    pub policy: Arc<SecurityPolicy>,
    pub sessions: SqliteSessionStore,
}

/// Provisions the embedded database, seeds the demo accounts and starts the
/// expired-session reaper. Any failure here aborts startup.
pub async fn bootstrap(config: &Config) -> AppResult<AppState> {
    let pool = database::init_embedded_database().await?;
    let users: Arc<dyn UserDetailsManager> = Arc::new(SqlUserDetailsManager::new(pool.clone()));
    auth::seed_demo_accounts(users.as_ref(), &config.seed_password_hash).await?;

    let sessions = SqliteSessionStore::new(pool.clone());
    let reaper = sessions.clone();
    tokio::spawn(async move {
        if let Err(err) = reaper.continuously_delete_expired(SESSION_REAP_INTERVAL).await {
            tracing::error!(error = %err, "expired session reaper stopped");
        }
    });

    Ok(AppState {
        pool,
        users,
        policy: Arc::new(SecurityPolicy::default()),
        sessions,
    })
}

pub fn router(state: AppState) -> Router {
    let sessions = SessionManagerLayer::new(state.sessions.clone())
        .with_name(SESSION_COOKIE_NAME)
        .with_secure(false)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(SESSION_TIMEOUT))
        .with_always_save(true);

    Router::new()
        .route("/", get(root_handler))
        .merge(auth::sso_router(&state.policy.logout_url))
        .merge(api::api_router())
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth::authorization_filter,
        ))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth::authentication_filter,
        ))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth::csrf_filter,
        ))
        .layer(sessions)
        .layer(axum_middleware::from_fn(middleware::security_headers))
        .layer(middleware::trace_layer())
        .with_state(state)
}

/// Builds the full application for `config`.
pub async fn build_app(config: &Config) -> AppResult<Router> {
    let state = bootstrap(config).await?;
    Ok(router(state))
}

async fn root_handler() -> &'static str {
    "SSO backend is running"
}
