//! Password verification for stored `{id}encoded` passwords.
//!
//! Stored passwords name their encoder in a leading `{id}`. `bcrypt` hashes
//! are checked on the blocking pool; `noop` is a verbatim comparison.

use super::errors::{AuthError, AuthResult};

pub const BCRYPT_ID: &str = "bcrypt";
pub const NOOP_ID: &str = "noop";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordEncoder {
    Bcrypt,
    Noop,
}

/// Splits `{id}encoded` into its encoder and the encoded value.
pub fn split_encoded(stored: &str) -> AuthResult<(PasswordEncoder, &str)> {
    let (id, encoded) = stored
        .strip_prefix('{')
        .and_then(|rest| rest.split_once('}'))
        .ok_or_else(|| AuthError::UnknownPasswordEncoder(String::new()))?;

    let encoder = match id {
        BCRYPT_ID => PasswordEncoder::Bcrypt,
        NOOP_ID => PasswordEncoder::Noop,
        other => return Err(AuthError::UnknownPasswordEncoder(other.to_string())),
    };
    Ok((encoder, encoded))
}

/// Checks `raw` against a stored `{id}encoded` password.
pub async fn matches(raw: &str, stored: &str) -> AuthResult<bool> {
    let (encoder, encoded) = split_encoded(stored)?;
    match encoder {
        PasswordEncoder::Noop => Ok(raw == encoded),
        PasswordEncoder::Bcrypt => {
            let raw = raw.to_string();
            let hash = encoded.to_string();
            tokio::task::spawn_blocking(move || {
                bcrypt::verify(raw, &hash).map_err(|e| AuthError::Hashing(e.to_string()))
            })
            .await
            .map_err(|e| AuthError::Hashing(format!("Task join error: {e}")))?
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_known_ids() {
        let (encoder, encoded) = split_encoded("{bcrypt}$2a$10$abc").unwrap();
        assert_eq!(encoder, PasswordEncoder::Bcrypt);
        assert_eq!(encoded, "$2a$10$abc");

        let (encoder, encoded) = split_encoded("{noop}plain").unwrap();
        assert_eq!(encoder, PasswordEncoder::Noop);
        assert_eq!(encoded, "plain");
    }

    #[test]
    fn rejects_unknown_or_missing_id() {
        assert!(matches!(
            split_encoded("{md5}abc"),
            Err(AuthError::UnknownPasswordEncoder(id)) if id == "md5"
        ));
        assert!(matches!(
            split_encoded("$2a$10$abc"),
            Err(AuthError::UnknownPasswordEncoder(_))
        ));
    }

    #[tokio::test]
    async fn noop_compares_verbatim() {
        assert!(matches("secret", "{noop}secret").await.unwrap());
        assert!(!matches("Secret", "{noop}secret").await.unwrap());
    }

    #[tokio::test]
    async fn bcrypt_round_trip() {
        let hash = bcrypt::hash("password", 4).unwrap();
        let stored = format!("{{bcrypt}}{hash}");
        assert!(matches("password", &stored).await.unwrap());
        assert!(!matches("wrong", &stored).await.unwrap());
    }
}
