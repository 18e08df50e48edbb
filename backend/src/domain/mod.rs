//! Domain primitives, aggregates and use-case services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - User / StoredUser — registered user identity and credential digest.
//! - Blog / BlogRecord — blog listing entries and their persisted form.
//! - AuthService, UserService, BlogService — driving port implementations.

pub mod auth;
mod auth_service;
pub mod blog;
mod blog_service;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
mod user_service;

pub use self::auth::{
    AuthError, AuthenticatedUser, LoginCredentials, LoginSession, LoginValidationError,
    PASSWORD_MIN, Registration, RegistrationValidationError,
};
pub use self::auth_service::AuthService;
pub use self::blog::{
    Blog, BlogDraft, BlogDraftInput, BlogId, BlogOwner, BlogPatch, BlogPatchInput, BlogRecord,
    BlogValidationError, LikesInput, OwnedBlog, UserWithBlogs,
};
pub use self::blog_service::{BlogService, UpdatePolicy};
pub use self::error::{Error, ErrorCode};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    PasswordHash, StoredUser, USERNAME_MIN, User, UserId, UserValidationError, Username,
};
pub use self::user_service::UserService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use bloglist::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
