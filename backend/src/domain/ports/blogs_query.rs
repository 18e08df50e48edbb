//! Driving port for unauthenticated blog reads.

use async_trait::async_trait;

use crate::domain::{Blog, BlogId, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlogsQuery: Send + Sync {
    /// All blogs with owners resolved. An empty list is a valid result.
    async fn list(&self) -> Result<Vec<Blog>, Error>;

    /// A single blog, or [`crate::domain::ErrorCode::NotFound`].
    async fn find(&self, id: &BlogId) -> Result<Blog, Error>;
}
