//! Blogs API handlers.
//!
//! ```text
//! GET    /api/blogs
//! GET    /api/blogs/{id}
//! POST   /api/blogs        {"title":"Subject","author":"BlogTester","url":"http://localhost","likes":7}
//! PUT    /api/blogs/{id}   {"likes":8}
//! DELETE /api/blogs/{id}
//! ```
//!
//! Mutating handlers take [`BearerAuth`] as their first argument so token
//! failures win over every other error. Bodies are permissive DTOs; the blog
//! service validates them after existence and ownership checks. Updates read
//! the raw body so an unknown id is reported before a malformed body.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{Blog, BlogDraftInput, BlogId, BlogPatchInput, Error, LikesInput};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerAuth;
use crate::inbound::http::error::malformed_body;
use crate::inbound::http::state::HttpState;

/// Request body for creating or updating a blog.
///
/// Every field is optional on the wire. `likes` accepts any JSON value; on
/// creation a non-numeric value counts as zero.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct BlogRequest {
    #[schema(example = "Subject")]
    pub title: Option<String>,
    #[schema(example = "BlogTester")]
    pub author: Option<String>,
    #[schema(example = "http://localhost")]
    pub url: Option<String>,
    #[schema(value_type = Option<u32>, example = 7)]
    pub likes: Option<Value>,
}

/// Classify a raw JSON `likes` value.
fn likes_input(value: Option<Value>) -> LikesInput {
    match value {
        None | Some(Value::Null) => LikesInput::Missing,
        Some(Value::Number(number)) => {
            if let Some(integer) = number.as_i64() {
                return LikesInput::Integer(integer);
            }
            match number.as_f64() {
                // i64::MAX as f64 rounds up, so the bound is exclusive.
                Some(float)
                    if float.fract() == 0.0 && float >= i64::MIN as f64 && float < i64::MAX as f64 =>
                {
                    LikesInput::Integer(float as i64)
                }
                Some(float) => LikesInput::Fractional(float),
                None => LikesInput::NotNumeric,
            }
        }
        Some(_) => LikesInput::NotNumeric,
    }
}

impl From<BlogRequest> for BlogDraftInput {
    fn from(value: BlogRequest) -> Self {
        Self {
            title: value.title,
            author: value.author,
            url: value.url,
            likes: likes_input(value.likes),
        }
    }
}

impl From<BlogRequest> for BlogPatchInput {
    fn from(value: BlogRequest) -> Self {
        Self {
            title: value.title,
            author: value.author,
            url: value.url,
            likes: likes_input(value.likes),
        }
    }
}

/// A malformed identifier cannot name a stored blog.
fn parse_blog_id(raw: &str) -> Result<BlogId, Error> {
    BlogId::parse(raw).ok_or_else(|| Error::not_found("blog not found"))
}

/// List every blog with its owner resolved.
#[utoipa::path(
    get,
    path = "/api/blogs",
    responses(
        (status = 200, description = "All blogs", body = [Blog]),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["blogs"],
    operation_id = "listBlogs",
    security([])
)]
#[get("/blogs")]
pub async fn list_blogs(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Blog>>> {
    state.blogs.list().await.map(web::Json)
}

/// Fetch a single blog.
#[utoipa::path(
    get,
    path = "/api/blogs/{id}",
    params(("id" = String, Path, description = "Blog identifier")),
    responses(
        (status = 200, description = "Blog", body = Blog),
        (status = 404, description = "Not found", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["blogs"],
    operation_id = "getBlog",
    security([])
)]
#[get("/blogs/{id}")]
pub async fn get_blog(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Blog>> {
    let id = parse_blog_id(&path)?;
    state.blogs.find(&id).await.map(web::Json)
}

/// Create a blog owned by the authenticated caller.
#[utoipa::path(
    post,
    path = "/api/blogs",
    request_body = BlogRequest,
    responses(
        (status = 201, description = "Created", body = Blog),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["blogs"],
    operation_id = "createBlog",
    security(("bearer" = []))
)]
#[post("/blogs")]
pub async fn create_blog(
    auth: BearerAuth,
    state: web::Data<HttpState>,
    payload: web::Json<BlogRequest>,
) -> ApiResult<HttpResponse> {
    let caller = auth.into_inner();
    let blog = state
        .blog_commands
        .create(&caller, payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(blog))
}

/// Update the given fields of a blog.
#[utoipa::path(
    put,
    path = "/api/blogs/{id}",
    params(("id" = String, Path, description = "Blog identifier")),
    request_body = BlogRequest,
    responses(
        (status = 200, description = "Updated blog", body = Blog),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 403, description = "Caller does not own the blog", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["blogs"],
    operation_id = "updateBlog",
    security(("bearer" = []))
)]
#[put("/blogs/{id}")]
pub async fn update_blog(
    auth: BearerAuth,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Bytes,
) -> ApiResult<web::Json<Blog>> {
    let caller = auth.into_inner();
    let id = parse_blog_id(&path)?;
    let request = match serde_json::from_slice::<BlogRequest>(&payload) {
        Ok(request) => request,
        Err(err) => {
            // A missing blog is reported ahead of an unreadable body.
            state.blogs.find(&id).await?;
            return Err(malformed_body(err));
        }
    };
    state
        .blog_commands
        .update(&caller, &id, request.into())
        .await
        .map(web::Json)
}

/// Delete a blog owned by the caller.
#[utoipa::path(
    delete,
    path = "/api/blogs/{id}",
    params(("id" = String, Path, description = "Blog identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 403, description = "Caller does not own the blog", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["blogs"],
    operation_id = "deleteBlog",
    security(("bearer" = []))
)]
#[delete("/blogs/{id}")]
pub async fn delete_blog(
    auth: BearerAuth,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = auth.into_inner();
    let id = parse_blog_id(&path)?;
    state.blog_commands.delete(&caller, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "blogs_tests.rs"]
mod tests;
