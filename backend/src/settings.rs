//! Process configuration loaded once at startup via OrthoConfig.
//!
//! Values come from `BLOGLIST_*` environment variables (or matching CLI flags)
//! and are passed by value into the server and services; nothing reads the
//! environment after [`AppSettings::load`] returns.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use sha2::{Digest, Sha256};

const DEFAULT_PORT: u16 = 3003;
const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Runtime configuration for the blog list service.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BLOGLIST")]
pub struct AppSettings {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// HTTP listen port.
    pub port: Option<u16>,
    /// HTTP bind address.
    pub host: Option<IpAddr>,
    /// Token signing secret.
    pub secret: String,
    /// Token lifetime in seconds; tokens never expire when unset.
    pub token_ttl_secs: Option<u64>,
    /// Reject updates from callers who do not own the blog.
    #[ortho_config(default = false)]
    pub enforce_update_ownership: bool,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
}

/// Configuration values present but unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("BLOGLIST_SECRET must not be blank")]
    BlankSecret,
    #[error("BLOGLIST_DATABASE_URL must not be blank")]
    BlankDatabaseUrl,
}

impl AppSettings {
    /// Reject values that parse but cannot run the service.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] for a blank secret or database URL.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.secret.trim().is_empty() {
            return Err(SettingsError::BlankSecret);
        }
        if self.database_url.trim().is_empty() {
            return Err(SettingsError::BlankDatabaseUrl);
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(DEFAULT_HOST),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    pub fn token_ttl(&self) -> Option<Duration> {
        self.token_ttl_secs.map(Duration::from_secs)
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// First eight hex characters of the secret's SHA-256 digest.
    ///
    /// Safe to log; lets operators confirm which key is live.
    pub fn secret_fingerprint(&self) -> String {
        let digest = Sha256::digest(self.secret.as_bytes());
        hex::encode(&digest[..4])
    }
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("database_url", &"<redacted>")
            .field("port", &self.port)
            .field("host", &self.host)
            .field("secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("enforce_update_ownership", &self.enforce_update_ownership)
            .field("db_max_connections", &self.db_max_connections)
            .finish()
    }
}
