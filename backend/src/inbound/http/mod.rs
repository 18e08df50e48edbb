//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod auth;
pub mod blogs;
pub mod error;
pub mod health;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;

/// JSON extractor configuration shared by every handler.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(error::json_error_handler)
}

/// All `/api` routes.
pub fn api_scope() -> actix_web::Scope {
    web::scope("/api")
        .service(blogs::list_blogs)
        .service(blogs::get_blog)
        .service(blogs::create_blog)
        .service(blogs::update_blog)
        .service(blogs::delete_blog)
        .service(users::register)
        .service(users::list_users)
        .service(users::login)
}
