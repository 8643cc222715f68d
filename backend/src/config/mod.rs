//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the listen address and the password hash used for the seeded demo accounts.
//! The embedded database has no configurable connection string.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use thiserror::Error;

/// Password hash shared by the seeded `user` and `admin` accounts.
pub const DEFAULT_SEED_PASSWORD_HASH: &str =
    "{bcrypt}$2a$10$GRLdNijSQMUvl/au9ofL.eDwmoohzzS7.rmNSJZ.0FxO/BTk76klW";

pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
pub const DEFAULT_PORT: u16 = 8080;

pub const HOST_VAR: &str = "SSO_HOST";
pub const PORT_VAR: &str = "SSO_PORT";
pub const SEED_PASSWORD_HASH_VAR: &str = "SSO_SEED_PASSWORD_HASH";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub seed_password_hash: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
            seed_password_hash: DEFAULT_SEED_PASSWORD_HASH.to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup, falling back to
    /// defaults for anything unset or blank.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = match read(HOST_VAR) {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: HOST_VAR,
                value,
            })?,
            None => DEFAULT_HOST,
        };

        let port = match read(PORT_VAR) {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: PORT_VAR,
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let seed_password_hash =
            read(SEED_PASSWORD_HASH_VAR).unwrap_or_else(|| DEFAULT_SEED_PASSWORD_HASH.to_string());

        Ok(Self {
            host,
            port,
            seed_password_hash,
        })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
