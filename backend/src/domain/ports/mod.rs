//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod blog_repository;
mod blogs_command;
mod blogs_query;
mod login_service;
mod password_hasher;
mod token_codec;
mod user_registration;
mod user_repository;
mod users_query;

#[cfg(test)]
pub use blog_repository::MockBlogRepository;
pub use blog_repository::{BlogPersistenceError, BlogRepository};
#[cfg(test)]
pub use blogs_command::MockBlogsCommand;
pub use blogs_command::BlogsCommand;
#[cfg(test)]
pub use blogs_query::MockBlogsQuery;
pub use blogs_query::BlogsQuery;
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{LoginService, TokenVerifier};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use token_codec::MockTokenCodec;
pub use token_codec::{TokenCodec, TokenError};
#[cfg(test)]
pub use user_registration::MockUserRegistration;
pub use user_registration::UserRegistration;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
