//! Driving port for creating user accounts.

use async_trait::async_trait;

use crate::domain::{Error, Registration, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRegistration: Send + Sync {
    /// Hash the password, store the user and return it without credentials.
    async fn register(&self, registration: &Registration) -> Result<User, Error>;
}
