//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::time::Duration;

use bloglist::domain::UpdatePolicy;
use bloglist::outbound::persistence::DbPool;
use zeroize::Zeroizing;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) signing_secret: Zeroizing<Vec<u8>>,
    pub(crate) token_ttl: Option<Duration>,
    pub(crate) update_policy: UpdatePolicy,
}

impl ServerConfig {
    /// Construct a configuration with non-expiring tokens and the default
    /// update policy.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool, signing_secret: Zeroizing<Vec<u8>>) -> Self {
        Self {
            bind_addr,
            db_pool,
            signing_secret,
            token_ttl: None,
            update_policy: UpdatePolicy::default(),
        }
    }

    /// Give issued tokens an expiry.
    #[must_use]
    pub fn with_token_ttl(mut self, token_ttl: Option<Duration>) -> Self {
        self.token_ttl = token_ttl;
        self
    }

    #[must_use]
    pub fn with_update_policy(mut self, update_policy: UpdatePolicy) -> Self {
        self.update_policy = update_policy;
        self
    }
}
