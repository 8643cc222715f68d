//! Data structures for authentication-related entities.
//!
//! This module defines roles, granted authorities, the stored account
//! details, and the principal attached to authenticated requests.

use serde::{Deserialize, Serialize};

/// Prefix that turns a role name into an authority string.
pub const ROLE_PREFIX: &str = "ROLE_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }

    pub fn authority(&self) -> GrantedAuthority {
        GrantedAuthority::new(format!("{ROLE_PREFIX}{}", self.name()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GrantedAuthority {
    pub authority: String,
}

impl GrantedAuthority {
    pub fn new(authority: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
        }
    }
}

/// Account as held by the user store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDetails {
    pub username: String,
    /// Encoded password including its `{id}` prefix.
    pub password: String,
    pub enabled: bool,
    pub authorities: Vec<GrantedAuthority>,
}

impl UserDetails {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            enabled: true,
            authorities: Vec::new(),
        }
    }

    /// Replaces the authorities with `ROLE_`-prefixed entries for `roles`.
    pub fn with_roles(mut self, roles: &[Role]) -> Self {
        let mut authorities: Vec<GrantedAuthority> = roles.iter().map(Role::authority).collect();
        authorities.sort();
        authorities.dedup();
        self.authorities = authorities;
        self
    }
}

/// Public view of the account behind a principal. Never carries the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalDetails {
    pub username: String,
    pub authorities: Vec<GrantedAuthority>,
    pub enabled: bool,
}

/// Authenticated identity attached to a request and kept in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub name: String,
    pub authorities: Vec<GrantedAuthority>,
    pub authenticated: bool,
    pub principal: PrincipalDetails,
}

impl Principal {
    pub fn has_role(&self, role: Role) -> bool {
        let wanted = role.authority();
        self.authorities.iter().any(|a| a.authority.eq_ignore_ascii_case(&wanted.authority))
    }
}

impl From<&UserDetails> for Principal {
    fn from(user: &UserDetails) -> Self {
        Self {
            name: user.username.clone(),
            authorities: user.authorities.clone(),
            authenticated: true,
            principal: PrincipalDetails {
                username: user.username.clone(),
                authorities: user.authorities.clone(),
                enabled: user.enabled,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_map_to_prefixed_authorities() {
        assert_eq!(Role::Admin.authority().authority, "ROLE_ADMIN");
        assert_eq!(Role::User.authority().authority, "ROLE_USER");

        let user = UserDetails::new("u", "{noop}x").with_roles(&[Role::User, Role::Admin, Role::User]);
        assert_eq!(user.authorities, vec![Role::Admin.authority(), Role::User.authority()]);
    }

    #[test]
    fn principal_role_check() {
        let admin = UserDetails::new("admin", "{noop}x").with_roles(&[Role::User, Role::Admin]);
        let principal = Principal::from(&admin);
        assert!(principal.has_role(Role::Admin));
        assert!(principal.has_role(Role::User));

        let user = UserDetails::new("user", "{noop}x").with_roles(&[Role::User]);
        assert!(!Principal::from(&user).has_role(Role::Admin));
    }

    #[test]
    fn principal_serializes_without_password() {
        let user = UserDetails::new("user", "{noop}secret").with_roles(&[Role::User]);
        let json = serde_json::to_value(Principal::from(&user)).unwrap();
        assert_eq!(json["name"], "user");
        assert_eq!(json["authorities"][0]["authority"], "ROLE_USER");
        assert_eq!(json["principal"]["enabled"], true);
        assert!(!json.to_string().contains("secret"));
    }
}
