//! User registration and listing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;
use zeroize::Zeroizing;

use super::auth_service::{map_user_persistence_error, run_hasher};
use super::blog_service::map_blog_persistence_error;
use crate::domain::ports::{
    BlogRepository, PasswordHasher, UserPersistenceError, UserRegistration, UserRepository,
    UsersQuery,
};
use crate::domain::{
    Error, OwnedBlog, Registration, StoredUser, User, UserId, UserWithBlogs,
};

/// Implements [`UserRegistration`] and [`UsersQuery`].
#[derive(Clone)]
pub struct UserService<U, B, H> {
    users: Arc<U>,
    blogs: Arc<B>,
    hasher: Arc<H>,
}

impl<U, B, H> UserService<U, B, H> {
    pub fn new(users: Arc<U>, blogs: Arc<B>, hasher: Arc<H>) -> Self {
        Self {
            users,
            blogs,
            hasher,
        }
    }
}

fn duplicate_username() -> Error {
    Error::duplicate_username("username must be unique").with_details(json!({
        "field": "username",
        "code": "duplicate",
    }))
}

#[async_trait]
impl<U, B, H> UserRegistration for UserService<U, B, H>
where
    U: UserRepository,
    B: Send + Sync,
    H: PasswordHasher + 'static,
{
    async fn register(&self, registration: &Registration) -> Result<User, Error> {
        let password = Zeroizing::new(registration.password().to_owned());
        let password_hash =
            run_hasher(&self.hasher, move |hasher| hasher.hash(password.as_str())).await?;

        let user = User::new(
            UserId::random(),
            registration.username().clone(),
            registration.name().map(str::to_owned),
        );
        let stored = StoredUser {
            user,
            password_hash,
        };

        match self.users.insert(&stored).await {
            Ok(()) => {}
            Err(UserPersistenceError::DuplicateUsername { .. }) => {
                return Err(duplicate_username());
            }
            Err(other) => return Err(map_user_persistence_error(other)),
        }

        info!(
            user_id = %stored.user.id(),
            username = %stored.user.username(),
            "registered user"
        );
        Ok(stored.user)
    }
}

#[async_trait]
impl<U, B, H> UsersQuery for UserService<U, B, H>
where
    U: UserRepository,
    B: BlogRepository,
    H: Send + Sync,
{
    async fn list_users(&self) -> Result<Vec<UserWithBlogs>, Error> {
        let users = self.users.list().await.map_err(map_user_persistence_error)?;
        let blogs = self.blogs.list().await.map_err(map_blog_persistence_error)?;

        let mut owned: HashMap<UserId, Vec<OwnedBlog>> = HashMap::new();
        for blog in blogs {
            owned.entry(blog.owner.id).or_default().push(blog.into());
        }

        Ok(users
            .into_iter()
            .map(|user| UserWithBlogs {
                blogs: owned.remove(user.id()).unwrap_or_default(),
                id: *user.id(),
                username: user.username().clone(),
                name: user.name().map(str::to_owned),
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
