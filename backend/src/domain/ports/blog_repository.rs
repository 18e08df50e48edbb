//! Port abstraction for the Blog Store.
//!
//! Reads return [`Blog`] values with the owner already resolved; writes take
//! a [`BlogRecord`] that references the owner by id only.

use async_trait::async_trait;

use crate::domain::{Blog, BlogId, BlogRecord};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by blog repository adapters.
    pub enum BlogPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "blog repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "blog repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// Every stored blog in insertion order.
    async fn list(&self) -> Result<Vec<Blog>, BlogPersistenceError>;

    async fn find_by_id(&self, id: &BlogId) -> Result<Option<Blog>, BlogPersistenceError>;

    /// Insert a blog and return it with the owner resolved.
    async fn insert(&self, record: &BlogRecord) -> Result<Blog, BlogPersistenceError>;

    /// Overwrite the mutable fields of an existing blog.
    ///
    /// Returns `None` when the blog vanished between lookup and write. The
    /// owner column is never touched.
    async fn update(&self, record: &BlogRecord) -> Result<Option<Blog>, BlogPersistenceError>;

    /// Remove a blog, returning whether a row was deleted.
    async fn delete(&self, id: &BlogId) -> Result<bool, BlogPersistenceError>;
}
