//! Driving port for user listings.
//!
//! Inbound adapters call this port to read users and their blogs without
//! touching persistence details.

use async_trait::async_trait;

use crate::domain::{Error, UserWithBlogs};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Every user with the blogs they own embedded.
    async fn list_users(&self) -> Result<Vec<UserWithBlogs>, Error>;
}
