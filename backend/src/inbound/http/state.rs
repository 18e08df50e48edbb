//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    BlogsCommand, BlogsQuery, LoginService, TokenVerifier, UserRegistration, UsersQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub tokens: Arc<dyn TokenVerifier>,
    pub registration: Arc<dyn UserRegistration>,
    pub users: Arc<dyn UsersQuery>,
    pub blogs: Arc<dyn BlogsQuery>,
    pub blog_commands: Arc<dyn BlogsCommand>,
}

impl HttpState {
    /// Build state where a single service backs several ports.
    pub fn from_services<A, U, B>(auth: Arc<A>, users: Arc<U>, blogs: Arc<B>) -> Self
    where
        A: LoginService + TokenVerifier + 'static,
        U: UserRegistration + UsersQuery + 'static,
        B: BlogsQuery + BlogsCommand + 'static,
    {
        Self {
            login: auth.clone(),
            tokens: auth,
            registration: users.clone(),
            users,
            blogs: blogs.clone(),
            blog_commands: blogs,
        }
    }
}
