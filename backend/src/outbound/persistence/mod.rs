//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the User Store and Blog Store ports backed by
//! PostgreSQL through `diesel-async` with `bb8` connection pooling.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. No business logic resides here.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: Diesel and pool failures map onto the
//!   persistence error enums declared next to each port.

mod diesel_basic_error_mapping;
mod diesel_blog_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_blog_repository::DieselBlogRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
