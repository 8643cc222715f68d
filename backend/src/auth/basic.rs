//! HTTP Basic `Authorization` header parsing.

use base64::prelude::*;

use super::errors::{AuthError, AuthResult};

const BASIC_SCHEME: &str = "Basic";

/// Credentials decoded from a Basic header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

/// Returns `true` when the header value uses the Basic scheme, whether or
/// not the payload is well formed.
pub fn is_basic(auth_header: &str) -> bool {
    auth_header
        .split_once(' ')
        .map(|(scheme, _)| scheme.eq_ignore_ascii_case(BASIC_SCHEME))
        .unwrap_or_else(|| auth_header.eq_ignore_ascii_case(BASIC_SCHEME))
}

/// Parses `Basic <base64(username:password)>`.
///
/// The password may itself contain `:`; only the first colon splits.
pub fn parse_basic_auth_header(auth_header: &str) -> AuthResult<BasicCredentials> {
    let encoded = match auth_header.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case(BASIC_SCHEME) => rest.trim(),
        _ => {
            return Err(AuthError::MalformedAuthorization(
                "Authorization header must start with 'Basic '".to_string(),
            ))
        }
    };

    let decoded = BASE64_STANDARD.decode(encoded.as_bytes()).map_err(|e| {
        AuthError::MalformedAuthorization(format!("Invalid base64 encoding: {e}"))
    })?;

    let decoded = String::from_utf8(decoded).map_err(|e| {
        AuthError::MalformedAuthorization(format!("Invalid UTF-8 in credentials: {e}"))
    })?;

    let (username, password) = decoded.split_once(':').ok_or_else(|| {
        AuthError::MalformedAuthorization("Invalid basic authentication token".to_string())
    })?;

    Ok(BasicCredentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// Builds a Basic header value. Used by clients and tests.
pub fn encode_basic_auth_header(username: &str, password: &str) -> String {
    format!("{BASIC_SCHEME} {}", BASE64_STANDARD.encode(format!("{username}:{password}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_header() {
        // base64("user:pass")
        let creds = parse_basic_auth_header("Basic dXNlcjpwYXNz").unwrap();
        assert_eq!(creds.username, "user");
        assert_eq!(creds.password, "pass");
    }

    #[test]
    fn password_may_contain_colons() {
        let header = encode_basic_auth_header("admin", "p@ss:word");
        let creds = parse_basic_auth_header(&header).unwrap();
        assert_eq!(creds.username, "admin");
        assert_eq!(creds.password, "p@ss:word");
    }

    #[test]
    fn scheme_is_case_insensitive() {
        assert!(parse_basic_auth_header("basic dXNlcjpwYXNz").is_ok());
        assert!(is_basic("BASIC abc"));
        assert!(!is_basic("Bearer abc"));
    }

    #[test]
    fn rejects_missing_scheme() {
        let result = parse_basic_auth_header("dXNlcjpwYXNz");
        assert!(matches!(result, Err(AuthError::MalformedAuthorization(_))));
    }

    #[test]
    fn rejects_invalid_base64() {
        let result = parse_basic_auth_header("Basic !!invalid!!");
        assert!(matches!(result, Err(AuthError::MalformedAuthorization(_))));
    }

    #[test]
    fn rejects_missing_colon() {
        // base64("userpass")
        let result = parse_basic_auth_header("Basic dXNlcnBhc3M=");
        assert!(matches!(result, Err(AuthError::MalformedAuthorization(_))));
    }
}
