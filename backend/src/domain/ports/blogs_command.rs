//! Driving port for blog mutations.
//!
//! Every operation takes the caller's [`AuthenticatedUser`] explicitly so the
//! use-cases stay testable without a transport layer. Implementations check,
//! in order: resource existence, ownership, then field validation.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, Blog, BlogDraftInput, BlogId, BlogPatchInput, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlogsCommand: Send + Sync {
    /// Create a blog owned by `caller`.
    async fn create(&self, caller: &AuthenticatedUser, input: BlogDraftInput)
    -> Result<Blog, Error>;

    /// Apply the present fields of `input` to an existing blog.
    async fn update(
        &self,
        caller: &AuthenticatedUser,
        id: &BlogId,
        input: BlogPatchInput,
    ) -> Result<Blog, Error>;

    /// Remove a blog owned by `caller`.
    async fn delete(&self, caller: &AuthenticatedUser, id: &BlogId) -> Result<(), Error>;
}
