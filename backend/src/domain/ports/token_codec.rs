//! Port for signing and decoding session tokens.
//!
//! Tokens are stateless: validity depends only on the signature and the
//! optional expiry, never on server-side session storage.

use crate::domain::AuthenticatedUser;

use super::define_port_error;

define_port_error! {
    /// Failures raised by token codecs.
    pub enum TokenError {
        /// The token could not be signed.
        Signing { message: String } => "token signing failed: {message}",
        /// The token was malformed or its signature did not verify.
        Invalid { message: String } => "token rejected: {message}",
        /// The token carried an expiry in the past.
        Expired => "token expired",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait TokenCodec: Send + Sync {
    /// Sign a token embedding the user id and username.
    fn issue(&self, identity: &AuthenticatedUser) -> Result<String, TokenError>;

    /// Verify a token's signature and recover the embedded identity.
    fn decode(&self, token: &str) -> Result<AuthenticatedUser, TokenError>;
}
