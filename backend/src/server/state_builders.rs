//! Wires the Diesel stores and credential adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;

use bloglist::domain::{AuthService, BlogService, UserService};
use bloglist::inbound::http::state::HttpState;
use bloglist::outbound::persistence::{DieselBlogRepository, DieselUserRepository};
use bloglist::outbound::security::{Argon2PasswordHasher, JwtTokenCodec};

use super::ServerConfig;

/// Build the handler state shared by every worker.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let users = Arc::new(DieselUserRepository::new(config.db_pool.clone()));
    let blogs = Arc::new(DieselBlogRepository::new(config.db_pool.clone()));
    let hasher = Arc::new(Argon2PasswordHasher::default());
    let tokens = Arc::new(JwtTokenCodec::new(
        config.signing_secret.as_slice(),
        config.token_ttl,
    ));

    let auth = Arc::new(AuthService::new(users.clone(), hasher.clone(), tokens));
    let user_service = Arc::new(UserService::new(users, blogs.clone(), hasher));
    let blog_service = Arc::new(BlogService::new(blogs, config.update_policy));

    web::Data::new(HttpState::from_services(auth, user_service, blog_service))
}
