//! Users API handlers.
//!
//! ```text
//! POST /api/users {"username":"root","name":"Superuser","password":"sekret"}
//! GET  /api/users
//! POST /api/login {"username":"root","password":"sekret"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    AuthError, Error, LoginCredentials, LoginSession, Registration, User, UserWithBlogs,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Registration request body for `POST /api/users`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "root")]
    pub username: Option<String>,
    #[schema(example = "Superuser")]
    pub name: Option<String>,
    #[schema(example = "sekret")]
    pub password: Option<String>,
}

/// Login request body for `POST /api/login`.
///
/// Example JSON:
/// `{"username":"root","password":"sekret"}`
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = AuthError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(value.username.as_deref(), value.password.as_deref())
            .map_err(AuthError::from)
    }
}

/// Register a new user.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Created user", body = User),
        (status = 400, description = "Invalid request or duplicate username", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/users")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        username,
        name,
        password,
    } = payload.into_inner();
    let registration =
        Registration::try_from_parts(username.as_deref(), name.as_deref(), password.as_deref())?;
    let user = state.registration.register(&registration).await?;
    Ok(HttpResponse::Created().json(user))
}

/// List users with the blogs they own.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use bloglist::inbound::http::users::list_users;
///
/// let app = App::new().service(list_users);
/// ```
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users", body = [UserWithBlogs]),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security([])
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<UserWithBlogs>>> {
    state.users.list_users().await.map(web::Json)
}

/// Authenticate and issue a bearer token.
///
/// Blank or missing credentials are treated like wrong ones so the response
/// does not reveal which field was at fault.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginSession),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginSession>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    state.login.authenticate(&credentials).await.map(web::Json)
}
