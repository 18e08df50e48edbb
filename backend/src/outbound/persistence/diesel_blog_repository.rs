//! PostgreSQL-backed `BlogRepository` implementation using Diesel ORM.
//!
//! Every read joins `users` so the returned [`Blog`] carries its owner's
//! public profile. Writes touch the `blogs` table only and re-read the row
//! through the same join.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{BlogPersistenceError, BlogRepository};
use crate::domain::{Blog, BlogId, BlogOwner, BlogRecord, UserId, Username};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{BlogChangeset, BlogRow, NewBlogRow, OwnerRow};
use super::pool::{DbPool, PoolError};
use super::schema::{blogs, users};

/// Diesel-backed implementation of the `BlogRepository` port.
#[derive(Clone)]
pub struct DieselBlogRepository {
    pool: DbPool,
}

impl DieselBlogRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BlogPersistenceError {
    map_basic_pool_error(error, BlogPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> BlogPersistenceError {
    map_basic_diesel_error(
        error,
        BlogPersistenceError::query,
        BlogPersistenceError::connection,
    )
}

fn likes_for_db(likes: u32) -> Result<i32, BlogPersistenceError> {
    i32::try_from(likes).map_err(|_| BlogPersistenceError::query("likes exceed storable range"))
}

fn row_to_blog((row, owner): (BlogRow, OwnerRow)) -> Result<Blog, BlogPersistenceError> {
    let likes = u32::try_from(row.likes).map_err(|_| {
        warn!(blog_id = %row.id, likes = row.likes, "stored likes are negative");
        BlogPersistenceError::query("stored likes are negative")
    })?;
    let username = Username::new(&owner.username).map_err(|err| {
        warn!(user_id = %owner.id, error = %err, "stored username failed validation");
        BlogPersistenceError::query("stored username is invalid")
    })?;

    Ok(Blog {
        id: BlogId::from_uuid(row.id),
        title: row.title,
        author: row.author,
        url: row.url,
        likes,
        owner: BlogOwner {
            id: UserId::from_uuid(owner.id),
            username,
            name: owner.name,
        },
    })
}

async fn load_blog(
    conn: &mut AsyncPgConnection,
    id: Uuid,
) -> Result<Option<Blog>, BlogPersistenceError> {
    let row: Option<(BlogRow, OwnerRow)> = blogs::table
        .inner_join(users::table)
        .filter(blogs::id.eq(id))
        .select((BlogRow::as_select(), OwnerRow::as_select()))
        .first(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

    row.map(row_to_blog).transpose()
}

#[async_trait]
impl BlogRepository for DieselBlogRepository {
    async fn list(&self) -> Result<Vec<Blog>, BlogPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(BlogRow, OwnerRow)> = blogs::table
            .inner_join(users::table)
            .select((BlogRow::as_select(), OwnerRow::as_select()))
            .order_by((blogs::created_at.asc(), blogs::id.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_blog).collect()
    }

    async fn find_by_id(&self, id: &BlogId) -> Result<Option<Blog>, BlogPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load_blog(&mut conn, *id.as_uuid()).await
    }

    async fn insert(&self, record: &BlogRecord) -> Result<Blog, BlogPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewBlogRow {
            id: *record.id.as_uuid(),
            title: &record.title,
            author: record.author.as_deref(),
            url: &record.url,
            likes: likes_for_db(record.likes)?,
            owner_id: *record.owner.as_uuid(),
        };

        diesel::insert_into(blogs::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        load_blog(&mut conn, new_row.id)
            .await?
            .ok_or_else(|| BlogPersistenceError::query("inserted blog could not be read back"))
    }

    async fn update(&self, record: &BlogRecord) -> Result<Option<Blog>, BlogPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = BlogChangeset {
            title: &record.title,
            author: record.author.as_deref(),
            url: &record.url,
            likes: likes_for_db(record.likes)?,
        };

        let updated_rows = diesel::update(blogs::table.find(record.id.as_uuid()))
            .set(&changeset)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if updated_rows == 0 {
            return Ok(None);
        }
        load_blog(&mut conn, *record.id.as_uuid()).await
    }

    async fn delete(&self, id: &BlogId) -> Result<bool, BlogPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted_rows = diesel::delete(blogs::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted_rows > 0)
    }
}
