//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{blogs, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
    pub password_hash: String,
}

/// Public projection of a user, used when joining owners onto blogs.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OwnerRow {
    pub id: Uuid,
    pub username: String,
    pub name: Option<String>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub name: Option<&'a str>,
    pub password_hash: &'a str,
}

/// Row struct for reading from the blogs table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = blogs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BlogRow {
    pub id: Uuid,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: i32,
}

/// Insertable struct for creating new blog records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = blogs)]
pub(crate) struct NewBlogRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub author: Option<&'a str>,
    pub url: &'a str,
    pub likes: i32,
    pub owner_id: Uuid,
}

/// Changeset for the mutable blog columns. The owner is never reassigned.
///
/// `treat_none_as_null` keeps a cleared author in sync with the domain value.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = blogs)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct BlogChangeset<'a> {
    pub title: &'a str,
    pub author: Option<&'a str>,
    pub url: &'a str,
    pub likes: i32,
}
