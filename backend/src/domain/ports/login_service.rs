//! Driving ports for login and token verification.
//!
//! In hexagonal terms these are *driving* ports: inbound adapters call them
//! to authenticate credentials and bearer tokens without knowing (or
//! importing) the backing infrastructure. HTTP handler tests substitute
//! doubles instead of wiring persistence.

use async_trait::async_trait;

use crate::domain::{AuthError, AuthenticatedUser, Error, LoginCredentials, LoginSession};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and issue a signed session token.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<LoginSession, Error>;
}

/// Bearer token verification.
///
/// Verification is a pure function of the token and the signing key, so it
/// is synchronous and runs before request bodies are inspected.
pub trait TokenVerifier: Send + Sync {
    /// Resolve the identity carried by `raw`.
    ///
    /// `None` means no credential was presented and yields
    /// [`AuthError::MissingToken`].
    fn verify(&self, raw: Option<&str>) -> Result<AuthenticatedUser, AuthError>;
}
