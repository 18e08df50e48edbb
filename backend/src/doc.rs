//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: All HTTP endpoints from the inbound layer (blogs, users, health)
//! - **Schemas**: Domain types deriving `ToSchema` plus the request DTOs
//! - **Security**: Bearer token authentication scheme
//!
//! The generated specification is served by Swagger UI in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Blog, BlogOwner, Error, ErrorCode, LoginSession, OwnedBlog, User, UserWithBlogs};
use crate::inbound::http::blogs::BlogRequest;
use crate::inbound::http::users::{LoginRequest, RegisterRequest};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /api/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Blog list API",
        description = "Blog listing with user registration and bearer-token authentication."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::blogs::list_blogs,
        crate::inbound::http::blogs::get_blog,
        crate::inbound::http::blogs::create_blog,
        crate::inbound::http::blogs::update_blog,
        crate::inbound::http::blogs::delete_blog,
        crate::inbound::http::users::register,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::login,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Blog,
        BlogOwner,
        OwnedBlog,
        User,
        UserWithBlogs,
        LoginSession,
        Error,
        ErrorCode,
        BlogRequest,
        RegisterRequest,
        LoginRequest,
    )),
    tags(
        (name = "blogs", description = "Blog listing and mutation"),
        (name = "users", description = "Registration and login"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
