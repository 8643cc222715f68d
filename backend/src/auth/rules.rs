//! Declarative security policy: ordered URL authorization rules, the logout
//! URL and the paths exempt from CSRF checks.

use super::models::{Principal, Role};

/// Ant-style path pattern: an exact path, or `prefix/**` which matches
/// `prefix` itself and everything below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    Exact(String),
    Subtree(String),
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        match pattern.strip_suffix("/**") {
            Some(prefix) => PathPattern::Subtree(prefix.to_string()),
            None => PathPattern::Exact(pattern.to_string()),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Exact(exact) => path == exact,
            PathPattern::Subtree(prefix) => {
                path == prefix
                    || path
                        .strip_prefix(prefix.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    PermitAll,
    Authenticated,
    HasRole(Role),
}

/// Outcome of checking a request against the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Granted,
    /// No principal and the rule needs one.
    Unauthenticated,
    /// Principal present but lacks the required role.
    Denied,
}

#[derive(Debug, Clone)]
pub struct AccessRule {
    pub patterns: Vec<PathPattern>,
    pub access: Access,
}

impl AccessRule {
    pub fn new(patterns: &[&str], access: Access) -> Self {
        Self {
            patterns: patterns.iter().map(|p| PathPattern::parse(p)).collect(),
            access,
        }
    }

    fn matches(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(path))
    }
}

#[derive(Debug, Clone)]
pub struct SecurityPolicy {
    /// Evaluated in order; first match wins.
    pub rules: Vec<AccessRule>,
    /// Applies when no rule matches.
    pub default_access: Access,
    pub logout_url: String,
    pub csrf_ignored: Vec<PathPattern>,
}

impl Default for SecurityPolicy {
    fn default() -> Self {
        Self {
            rules: vec![
                AccessRule::new(&["/api/users", "/api/users/**"], Access::HasRole(Role::Admin)),
                AccessRule::new(&["/api/**"], Access::Authenticated),
            ],
            default_access: Access::PermitAll,
            logout_url: "/sso/logout".to_string(),
            csrf_ignored: vec![PathPattern::parse("/login"), PathPattern::parse("/logout")],
        }
    }
}

impl SecurityPolicy {
    pub fn access_for(&self, path: &str) -> Access {
        self.rules
            .iter()
            .find(|rule| rule.matches(path))
            .map(|rule| rule.access)
            .unwrap_or(self.default_access)
    }

    pub fn decide(&self, path: &str, principal: Option<&Principal>) -> Decision {
        match (self.access_for(path), principal) {
            (Access::PermitAll, _) => Decision::Granted,
            (_, None) => Decision::Unauthenticated,
            (Access::Authenticated, Some(_)) => Decision::Granted,
            (Access::HasRole(role), Some(p)) if p.has_role(role) => Decision::Granted,
            (Access::HasRole(_), Some(_)) => Decision::Denied,
        }
    }

    pub fn is_csrf_ignored(&self, path: &str) -> bool {
        self.csrf_ignored.iter().any(|p| p.matches(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::UserDetails;

    fn principal(roles: &[Role]) -> Principal {
        Principal::from(&UserDetails::new("someone", "{noop}x").with_roles(roles))
    }

    #[test]
    fn subtree_pattern_matches_root_and_children_only() {
        let pattern = PathPattern::parse("/api/**");
        assert!(pattern.matches("/api"));
        assert!(pattern.matches("/api/"));
        assert!(pattern.matches("/api/users/1"));
        assert!(!pattern.matches("/apix"));
        assert!(!pattern.matches("/sso/user"));
    }

    #[test]
    fn exact_pattern() {
        let pattern = PathPattern::parse("/api/users");
        assert!(pattern.matches("/api/users"));
        assert!(!pattern.matches("/api/users/1"));
    }

    #[test]
    fn first_matching_rule_wins() {
        let policy = SecurityPolicy::default();
        assert_eq!(policy.access_for("/api/users"), Access::HasRole(Role::Admin));
        assert_eq!(policy.access_for("/api/users/admin"), Access::HasRole(Role::Admin));
        assert_eq!(policy.access_for("/api/other"), Access::Authenticated);
        assert_eq!(policy.access_for("/sso/user"), Access::PermitAll);
        assert_eq!(policy.access_for("/"), Access::PermitAll);
    }

    #[test]
    fn decisions() {
        let policy = SecurityPolicy::default();
        let user = principal(&[Role::User]);
        let admin = principal(&[Role::User, Role::Admin]);

        assert_eq!(policy.decide("/api/users", None), Decision::Unauthenticated);
        assert_eq!(policy.decide("/api/users", Some(&user)), Decision::Denied);
        assert_eq!(policy.decide("/api/users", Some(&admin)), Decision::Granted);
        assert_eq!(policy.decide("/api/anything", Some(&user)), Decision::Granted);
        assert_eq!(policy.decide("/api/anything", None), Decision::Unauthenticated);
        assert_eq!(policy.decide("/sso/user", None), Decision::Granted);
    }

    #[test]
    fn csrf_exemptions() {
        let policy = SecurityPolicy::default();
        assert!(policy.is_csrf_ignored("/login"));
        assert!(policy.is_csrf_ignored("/logout"));
        assert!(!policy.is_csrf_ignored("/sso/logout"));
    }
}
