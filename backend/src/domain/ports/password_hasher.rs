//! Port for the password hashing primitive.

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Failures raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Deriving a digest failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// A stored digest could not be parsed.
        MalformedDigest { message: String } => "stored password digest is malformed: {message}",
    }
}

/// Salted, slow password hashing.
///
/// Implementations must compare digests in constant time.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Derive a salted digest from `password`.
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError>;

    /// Check `password` against a stored digest.
    fn verify(&self, password: &str, digest: &PasswordHash) -> Result<bool, PasswordHashError>;
}
