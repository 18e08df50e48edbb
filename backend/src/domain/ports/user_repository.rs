//! Port abstraction for the User Store and its errors.
use async_trait::async_trait;

use crate::domain::{StoredUser, User};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The username is already registered.
        DuplicateUsername { username: String } => "username already taken: {username}",
    }
}

/// User Store contract. The store enforces username uniqueness.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user.
    ///
    /// Fails with [`UserPersistenceError::DuplicateUsername`] when the
    /// username is taken; no record is written in that case.
    async fn insert(&self, user: &StoredUser) -> Result<(), UserPersistenceError>;

    /// Fetch a user and credential digest by login name.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StoredUser>, UserPersistenceError>;

    /// All registered users, oldest first.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;
}
