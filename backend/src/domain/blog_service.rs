//! Blog use-cases: listing, creation, update and deletion.
//!
//! Mutations receive the caller's identity explicitly. Checks run in a fixed
//! order: the blog must exist, the caller must own it where ownership is
//! enforced, and only then are request fields validated.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{BlogPersistenceError, BlogRepository, BlogsCommand, BlogsQuery};
use crate::domain::{
    AuthenticatedUser, Blog, BlogDraft, BlogDraftInput, BlogId, BlogPatch, BlogPatchInput,
    BlogRecord, Error,
};

/// Map Blog Store failures onto the domain taxonomy.
pub(crate) fn map_blog_persistence_error(error: BlogPersistenceError) -> Error {
    match error {
        BlogPersistenceError::Connection { message } => {
            Error::store_unavailable(format!("blog store unavailable: {message}"))
        }
        BlogPersistenceError::Query { message } => {
            Error::internal(format!("blog store error: {message}"))
        }
    }
}

fn blog_not_found() -> Error {
    Error::not_found("blog not found")
}

/// Who may update a blog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdatePolicy {
    /// Any authenticated caller may update any blog.
    #[default]
    AnyAuthenticated,
    /// Only the owner may update, mirroring the delete rule.
    OwnerOnly,
}

impl UpdatePolicy {
    /// Select the policy from the `enforce_update_ownership` setting.
    #[must_use]
    pub fn from_enforcement(enforce_ownership: bool) -> Self {
        if enforce_ownership {
            Self::OwnerOnly
        } else {
            Self::AnyAuthenticated
        }
    }
}

/// Blog service implementing the blog driving ports.
#[derive(Clone)]
pub struct BlogService<B> {
    blogs: Arc<B>,
    update_policy: UpdatePolicy,
}

impl<B> BlogService<B> {
    pub fn new(blogs: Arc<B>, update_policy: UpdatePolicy) -> Self {
        Self {
            blogs,
            update_policy,
        }
    }
}

impl<B> BlogService<B>
where
    B: BlogRepository,
{
    async fn existing(&self, id: &BlogId) -> Result<Blog, Error> {
        self.blogs
            .find_by_id(id)
            .await
            .map_err(map_blog_persistence_error)?
            .ok_or_else(blog_not_found)
    }
}

#[async_trait]
impl<B> BlogsQuery for BlogService<B>
where
    B: BlogRepository,
{
    async fn list(&self) -> Result<Vec<Blog>, Error> {
        self.blogs.list().await.map_err(map_blog_persistence_error)
    }

    async fn find(&self, id: &BlogId) -> Result<Blog, Error> {
        self.existing(id).await
    }
}

#[async_trait]
impl<B> BlogsCommand for BlogService<B>
where
    B: BlogRepository,
{
    async fn create(
        &self,
        caller: &AuthenticatedUser,
        input: BlogDraftInput,
    ) -> Result<Blog, Error> {
        let draft = BlogDraft::try_from(input)?;
        let record = BlogRecord {
            id: BlogId::random(),
            title: draft.title,
            author: draft.author,
            url: draft.url,
            likes: draft.likes,
            owner: *caller.id(),
        };

        let blog = self
            .blogs
            .insert(&record)
            .await
            .map_err(map_blog_persistence_error)?;
        info!(blog_id = %blog.id, user_id = %caller.id(), "created blog");
        Ok(blog)
    }

    async fn update(
        &self,
        caller: &AuthenticatedUser,
        id: &BlogId,
        input: BlogPatchInput,
    ) -> Result<Blog, Error> {
        let mut blog = self.existing(id).await?;
        if self.update_policy == UpdatePolicy::OwnerOnly && blog.owner.id != *caller.id() {
            warn!(blog_id = %id, user_id = %caller.id(), "rejected update by non-owner");
            return Err(Error::forbidden("only the creator can update a blog"));
        }

        blog.apply(BlogPatch::try_from(input)?);
        let updated = self
            .blogs
            .update(&blog.record())
            .await
            .map_err(map_blog_persistence_error)?
            .ok_or_else(blog_not_found)?;
        info!(blog_id = %id, user_id = %caller.id(), "updated blog");
        Ok(updated)
    }

    async fn delete(&self, caller: &AuthenticatedUser, id: &BlogId) -> Result<(), Error> {
        let blog = self.existing(id).await?;
        if blog.owner.id != *caller.id() {
            warn!(blog_id = %id, user_id = %caller.id(), "rejected delete by non-owner");
            return Err(Error::forbidden("only the creator can delete a blog"));
        }

        let removed = self
            .blogs
            .delete(id)
            .await
            .map_err(map_blog_persistence_error)?;
        if !removed {
            return Err(blog_not_found());
        }
        info!(blog_id = %id, user_id = %caller.id(), "deleted blog");
        Ok(())
    }
}

#[cfg(test)]
#[path = "blog_service_tests.rs"]
mod tests;
