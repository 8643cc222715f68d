//! Core business logic for the authentication system.
//!
//! This service owns the user store seam (`UserDetailsManager`), its SQL
//! implementation, username/password authentication and the seeding of the
//! demo accounts at startup.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::Instrument;

use super::errors::{AuthError, AuthResult};
use super::models::{GrantedAuthority, Principal, Role, UserDetails};
use super::password;
use crate::database::queries;

/// Account storage used by authentication.
#[async_trait]
pub trait UserDetailsManager: Send + Sync {
    async fn load_user_by_username(&self, username: &str) -> AuthResult<Option<UserDetails>>;

    /// Inserts the account and its authorities. Fails if the username exists.
    async fn create_user(&self, user: &UserDetails) -> AuthResult<()>;
}

/// `UserDetailsManager` backed by the `users`/`authorities` tables.
#[derive(Clone)]
pub struct SqlUserDetailsManager {
    pool: SqlitePool,
}

impl SqlUserDetailsManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDetailsManager for SqlUserDetailsManager {
    async fn load_user_by_username(&self, username: &str) -> AuthResult<Option<UserDetails>> {
        let Some(row) = queries::find_user_by_username(&self.pool, username).await? else {
            return Ok(None);
        };

        let authorities = queries::find_authorities_by_username(&self.pool, &row.username)
            .await?
            .into_iter()
            .map(|a| GrantedAuthority::new(a.authority))
            .collect();

        Ok(Some(UserDetails {
            username: row.username,
            password: row.password,
            enabled: row.enabled,
            authorities,
        }))
    }

    async fn create_user(&self, user: &UserDetails) -> AuthResult<()> {
        let mut tx = self.pool.begin().await?;
        queries::insert_user(&mut tx, &user.username, &user.password, user.enabled).await?;
        for authority in &user.authorities {
            queries::insert_authority(&mut tx, &user.username, &authority.authority).await?;
        }
        tx.commit().await?;
        tracing::debug!(username = %user.username, "created user");
        Ok(())
    }
}

/// Checks a username/password pair against the store.
///
/// Unknown users, wrong passwords and unreadable stored hashes all surface
/// as `BadCredentials`. Disabled accounts are `Disabled` before the password
/// is looked at.
pub async fn authenticate(
    users: &Arc<dyn UserDetailsManager>,
    username: &str,
    raw_password: &str,
) -> AuthResult<Principal> {
    let span = tracing::debug_span!("auth.basic", username = username);
    async move {
        if username.trim().is_empty() {
            return Err(AuthError::BadCredentials);
        }

        let user = users
            .load_user_by_username(username)
            .await?
            .ok_or(AuthError::BadCredentials)?;

        if !user.enabled {
            tracing::warn!(username = username, "rejected disabled account");
            return Err(AuthError::Disabled);
        }

        let matched = match password::matches(raw_password, &user.password).await {
            Ok(matched) => matched,
            Err(AuthError::UnknownPasswordEncoder(id)) => {
                tracing::warn!(encoder = %id, "stored password has no usable encoder");
                false
            }
            Err(err) => return Err(err),
        };

        if !matched {
            tracing::warn!(username = username, "password authentication failed");
            return Err(AuthError::BadCredentials);
        }

        tracing::debug!("authenticated");
        Ok(Principal::from(&user))
    }
    .instrument(span)
    .await
}

/// The two fixed demo accounts. Both share `password_hash`.
pub fn demo_accounts(password_hash: &str) -> Vec<UserDetails> {
    vec![
        UserDetails::new("user", password_hash).with_roles(&[Role::User]),
        UserDetails::new("admin", password_hash).with_roles(&[Role::User, Role::Admin]),
    ]
}

/// Inserts the demo accounts. Not idempotent; run once against a fresh store.
pub async fn seed_demo_accounts(
    users: &dyn UserDetailsManager,
    password_hash: &str,
) -> AuthResult<()> {
    for account in demo_accounts(password_hash) {
        users.create_user(&account).await?;
        tracing::info!(username = %account.username, "seeded account");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::init_embedded_database;

    async fn manager() -> Arc<dyn UserDetailsManager> {
        let pool = init_embedded_database().await.unwrap();
        Arc::new(SqlUserDetailsManager::new(pool))
    }

    #[tokio::test]
    async fn seeded_accounts_have_expected_roles() {
        let users = manager().await;
        seed_demo_accounts(users.as_ref(), "{noop}pw").await.unwrap();

        let user = users.load_user_by_username("user").await.unwrap().unwrap();
        assert_eq!(user.authorities, vec![Role::User.authority()]);

        let admin = users.load_user_by_username("admin").await.unwrap().unwrap();
        assert_eq!(
            admin.authorities,
            vec![Role::Admin.authority(), Role::User.authority()]
        );
        assert!(admin.enabled);
    }

    #[tokio::test]
    async fn usernames_are_case_insensitive() {
        let users = manager().await;
        seed_demo_accounts(users.as_ref(), "{noop}pw").await.unwrap();
        let admin = users.load_user_by_username("ADMIN").await.unwrap().unwrap();
        assert_eq!(admin.username, "admin");
        assert!(users.load_user_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn seeding_twice_fails() {
        let users = manager().await;
        seed_demo_accounts(users.as_ref(), "{noop}pw").await.unwrap();
        let err = seed_demo_accounts(users.as_ref(), "{noop}pw").await.unwrap_err();
        assert!(matches!(err, AuthError::Store(_)));
    }

    #[tokio::test]
    async fn authenticate_checks_password() {
        let users = manager().await;
        seed_demo_accounts(users.as_ref(), "{noop}pw").await.unwrap();

        let principal = authenticate(&users, "admin", "pw").await.unwrap();
        assert_eq!(principal.name, "admin");
        assert!(principal.has_role(Role::Admin));

        assert!(matches!(
            authenticate(&users, "admin", "nope").await,
            Err(AuthError::BadCredentials)
        ));
        assert!(matches!(
            authenticate(&users, "ghost", "pw").await,
            Err(AuthError::BadCredentials)
        ));
        assert!(matches!(
            authenticate(&users, "", "pw").await,
            Err(AuthError::BadCredentials)
        ));
    }

    #[tokio::test]
    async fn disabled_accounts_are_rejected() {
        let users = manager().await;
        let mut account = UserDetails::new("frozen", "{noop}pw").with_roles(&[Role::User]);
        account.enabled = false;
        users.create_user(&account).await.unwrap();

        assert!(matches!(
            authenticate(&users, "frozen", "pw").await,
            Err(AuthError::Disabled)
        ));
    }

    #[tokio::test]
    async fn disabled_account_is_rejected_before_password_check() {
        let users = manager().await;
        // Unknown encoder: any password comparison would fail as bad credentials.
        let mut account = UserDetails::new("frozen", "{sha256}abc").with_roles(&[Role::User]);
        account.enabled = false;
        users.create_user(&account).await.unwrap();

        assert!(matches!(
            authenticate(&users, "frozen", "wrong").await,
            Err(AuthError::Disabled)
        ));
    }

    #[tokio::test]
    async fn unusable_stored_password_is_bad_credentials() {
        let users = manager().await;
        users
            .create_user(&UserDetails::new("legacy", "plaintext").with_roles(&[Role::User]))
            .await
            .unwrap();
        assert!(matches!(
            authenticate(&users, "legacy", "plaintext").await,
            Err(AuthError::BadCredentials)
        ));
    }
}
