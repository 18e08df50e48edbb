//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Username uniqueness is enforced by the `users_username_key` constraint, so
//! two concurrent registrations for the same name cannot both succeed.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{PasswordHash, StoredUser, User, UserId, Username};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

const USERNAME_CONSTRAINT: &str = "users_username_key";

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

/// Convert a database row into a domain user with its credential digest.
///
/// Rows are written through validated domain types, so a failure here means
/// the table was edited out of band.
fn row_to_stored_user(row: UserRow) -> Result<StoredUser, UserPersistenceError> {
    let UserRow {
        id,
        username,
        name,
        password_hash,
    } = row;
    let username = Username::new(&username).map_err(|err| {
        warn!(user_id = %id, error = %err, "stored username failed validation");
        UserPersistenceError::query("stored username is invalid")
    })?;
    Ok(StoredUser {
        user: User::new(UserId::from_uuid(id), username, name),
        password_hash: PasswordHash::new(password_hash),
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, stored: &StoredUser) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user = &stored.user;
        let new_row = NewUserRow {
            id: *user.id().as_uuid(),
            username: user.username().as_ref(),
            name: user.name(),
            password_hash: stored.password_hash.as_str(),
        };

        diesel::insert_into(users::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_unique_violation(&err, USERNAME_CONSTRAINT) {
                    UserPersistenceError::duplicate_username(user.username().as_ref())
                } else {
                    map_diesel_error(err)
                }
            })
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<StoredUser>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_stored_user).transpose()
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .order_by((users::created_at.asc(), users::id.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|row| row_to_stored_user(row).map(|stored| stored.user))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    fn row(username: &str) -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            username: username.to_owned(),
            name: Some("Superuser".to_owned()),
            password_hash: "$argon2id$v=19$stub".to_owned(),
        }
    }

    #[rstest]
    fn row_conversion_keeps_digest_and_profile() {
        let source = row("root");
        let id = source.id;
        let stored = row_to_stored_user(source).expect("valid row");

        assert_eq!(stored.user.id().as_uuid(), &id);
        assert_eq!(stored.user.username().as_ref(), "root");
        assert_eq!(stored.user.name(), Some("Superuser"));
        assert_eq!(stored.password_hash.as_str(), "$argon2id$v=19$stub");
    }

    #[rstest]
    fn corrupt_username_is_a_query_error() {
        let err = row_to_stored_user(row("x")).expect_err("too short");
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }
}
