//! In-memory store adapters for tests.
//!
//! Compiled with the `test-support` feature so integration tests under
//! `tests/` can drive the real services and handlers without PostgreSQL.
//! Both stores can be switched into an outage mode that fails every call
//! with a connection error.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::ports::{
    BlogPersistenceError, BlogRepository, UserPersistenceError, UserRepository,
};
use crate::domain::{Blog, BlogId, BlogOwner, BlogRecord, StoredUser, User, UserId};
use crate::outbound::security::{Argon2Params, Argon2PasswordHasher};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Argon2id hasher with the cheapest parameters the algorithm accepts.
pub fn fast_password_hasher() -> Argon2PasswordHasher {
    Argon2Params::new(Argon2Params::MIN_M_COST, Argon2Params::MIN_T_COST, 1, None)
        .map(Argon2PasswordHasher::with_params)
        .unwrap_or_default()
}

/// User Store held in memory, oldest registration first.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<StoredUser>>,
    unavailable: AtomicBool,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every subsequent call with a connection error while `true`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), UserPersistenceError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(UserPersistenceError::connection("user store offline"));
        }
        Ok(())
    }

    /// Every stored record, digests included.
    pub fn stored(&self) -> Vec<StoredUser> {
        lock(&self.users).clone()
    }

    fn owner(&self, id: &UserId) -> Option<BlogOwner> {
        lock(&self.users)
            .iter()
            .find(|stored| stored.user.id() == id)
            .map(|stored| BlogOwner {
                id: *stored.user.id(),
                username: stored.user.username().clone(),
                name: stored.user.name().map(str::to_owned),
            })
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &StoredUser) -> Result<(), UserPersistenceError> {
        self.ensure_available()?;
        let mut users = lock(&self.users);
        let username = user.user.username();
        if users
            .iter()
            .any(|stored| stored.user.username() == username)
        {
            return Err(UserPersistenceError::duplicate_username(username.as_ref()));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StoredUser>, UserPersistenceError> {
        self.ensure_available()?;
        Ok(lock(&self.users)
            .iter()
            .find(|stored| stored.user.username().as_ref() == username)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        self.ensure_available()?;
        Ok(lock(&self.users)
            .iter()
            .map(|stored| stored.user.clone())
            .collect())
    }
}

/// Blog Store held in memory, resolving owners from a shared user store.
pub struct InMemoryBlogRepository {
    users: Arc<InMemoryUserRepository>,
    blogs: Mutex<Vec<BlogRecord>>,
    unavailable: AtomicBool,
}

impl InMemoryBlogRepository {
    pub fn new(users: Arc<InMemoryUserRepository>) -> Self {
        Self {
            users,
            blogs: Mutex::new(Vec::new()),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Fail every subsequent call with a connection error while `true`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Raw stored rows, in insertion order.
    pub fn records(&self) -> Vec<BlogRecord> {
        lock(&self.blogs).clone()
    }

    fn ensure_available(&self) -> Result<(), BlogPersistenceError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(BlogPersistenceError::connection("blog store offline"));
        }
        Ok(())
    }

    fn resolve(&self, record: &BlogRecord) -> Result<Blog, BlogPersistenceError> {
        let owner = self
            .users
            .owner(&record.owner)
            .ok_or_else(|| BlogPersistenceError::query("blog owner does not exist"))?;
        Ok(Blog {
            id: record.id,
            title: record.title.clone(),
            author: record.author.clone(),
            url: record.url.clone(),
            likes: record.likes,
            owner,
        })
    }
}

#[async_trait]
impl BlogRepository for InMemoryBlogRepository {
    async fn list(&self) -> Result<Vec<Blog>, BlogPersistenceError> {
        self.ensure_available()?;
        let records = self.records();
        records.iter().map(|record| self.resolve(record)).collect()
    }

    async fn find_by_id(&self, id: &BlogId) -> Result<Option<Blog>, BlogPersistenceError> {
        self.ensure_available()?;
        let record = lock(&self.blogs)
            .iter()
            .find(|record| &record.id == id)
            .cloned();
        record.map(|record| self.resolve(&record)).transpose()
    }

    async fn insert(&self, record: &BlogRecord) -> Result<Blog, BlogPersistenceError> {
        self.ensure_available()?;
        let blog = self.resolve(record)?;
        lock(&self.blogs).push(record.clone());
        Ok(blog)
    }

    async fn update(&self, record: &BlogRecord) -> Result<Option<Blog>, BlogPersistenceError> {
        self.ensure_available()?;
        let updated = {
            let mut blogs = lock(&self.blogs);
            blogs
                .iter_mut()
                .find(|stored| stored.id == record.id)
                .map(|stored| {
                    let owner = stored.owner;
                    *stored = BlogRecord {
                        owner,
                        ..record.clone()
                    };
                    stored.clone()
                })
        };
        updated.map(|stored| self.resolve(&stored)).transpose()
    }

    async fn delete(&self, id: &BlogId) -> Result<bool, BlogPersistenceError> {
        self.ensure_available()?;
        let mut blogs = lock(&self.blogs);
        let before = blogs.len();
        blogs.retain(|record| &record.id != id);
        Ok(blogs.len() < before)
    }
}
