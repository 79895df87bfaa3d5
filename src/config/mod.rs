//! Configuration loading
//!
//! The gateway reads three values from the process environment, after
//! loading a local `.env` file:
//!
//! - `AUTH`: the shared secret compared against the `Authorization` header
//! - `DB_TABLE`: the table every statement targets
//! - `DB_URI`: the PostgreSQL connection URI
//!
//! `LISTEN_ADDR` optionally overrides the default `0.0.0.0:9413`.
//!
//! Values are not validated: an empty or malformed secret, table or URI is
//! accepted here and surfaces on first use.

use crate::core::error::ConfigError;
use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

pub const AUTH_VAR: &str = "AUTH";
pub const TABLE_VAR: &str = "DB_TABLE";
pub const DATABASE_URI_VAR: &str = "DB_URI";
pub const LISTEN_ADDR_VAR: &str = "LISTEN_ADDR";

/// Environment file loaded at startup, relative to the working directory
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Port the gateway listens on
pub const DEFAULT_PORT: u16 = 9413;

/// Immutable gateway configuration, built once and shared by every handler
#[derive(Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Shared secret expected in the `Authorization` header
    pub auth_token: String,

    /// Table name written into every statement
    pub table: String,

    /// Connection URI, parsed per request
    pub database_uri: String,

    /// Address the HTTP listener binds to
    pub listen_addr: SocketAddr,
}

impl GatewayConfig {
    pub fn new(
        auth_token: impl Into<String>,
        table: impl Into<String>,
        database_uri: impl Into<String>,
    ) -> Self {
        Self {
            auth_token: auth_token.into(),
            table: table.into(),
            database_uri: database_uri.into(),
            listen_addr: default_listen_addr(),
        }
    }

    pub fn with_listen_addr(mut self, listen_addr: SocketAddr) -> Self {
        self.listen_addr = listen_addr;
        self
    }

    /// Load the environment file, then read the configuration from the
    /// process environment
    ///
    /// Variables already present in the environment are not overridden by
    /// the file. A missing or malformed file is an error.
    pub fn load(env_file: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let env_file = env_file.as_ref();
        dotenvy::from_path(env_file).map_err(|source| ConfigError::EnvFile {
            path: env_file.display().to_string(),
            source,
        })?;
        Self::from_env()
    }

    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    ///
    /// Missing variables read as empty strings.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).unwrap_or_default();

        let listen_addr = match lookup(LISTEN_ADDR_VAR).filter(|v| !v.is_empty()) {
            Some(value) => value
                .parse()
                .map_err(|source| ConfigError::InvalidListenAddr { value, source })?,
            None => default_listen_addr(),
        };

        Ok(Self {
            auth_token: var(AUTH_VAR),
            table: var(TABLE_VAR),
            database_uri: var(DATABASE_URI_VAR),
            listen_addr,
        })
    }
}

// The secret and the URI (which usually embeds a password) stay out of logs.
impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("auth_token", &"<redacted>")
            .field("table", &self.table)
            .field("database_uri", &"<redacted>")
            .field("listen_addr", &self.listen_addr)
            .finish()
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT))
}
