//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::{
    MockBlogsCommand, MockBlogsQuery, MockLoginService, MockUserRegistration, MockUsersQuery,
    TokenVerifier,
};
use crate::domain::{AuthError, AuthenticatedUser, UserId, Username};

use super::json_config;
use super::state::HttpState;

/// Token accepted by [`StaticTokens::default`].
pub const VALID_TOKEN: &str = "valid-token";
/// Identifier of the caller carried by [`VALID_TOKEN`].
pub const ROOT_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

/// The identity resolved from [`VALID_TOKEN`].
pub fn root_identity() -> AuthenticatedUser {
    AuthenticatedUser::new(
        UserId::new(ROOT_ID).expect("fixture id"),
        Username::new("root").expect("fixture username"),
    )
}

/// Token verifier accepting exactly one token.
pub struct StaticTokens {
    token: String,
    identity: AuthenticatedUser,
}

impl StaticTokens {
    pub fn accepting(token: impl Into<String>, identity: AuthenticatedUser) -> Self {
        Self {
            token: token.into(),
            identity,
        }
    }
}

impl Default for StaticTokens {
    fn default() -> Self {
        Self::accepting(VALID_TOKEN, root_identity())
    }
}

impl TokenVerifier for StaticTokens {
    fn verify(&self, raw: Option<&str>) -> Result<AuthenticatedUser, AuthError> {
        match raw {
            None => Err(AuthError::MissingToken),
            Some(token) if token == self.token => Ok(self.identity.clone()),
            Some(_) => Err(AuthError::InvalidToken),
        }
    }
}

/// Mocked driving ports. Unused mocks panic if a handler reaches them.
#[derive(Default)]
pub struct TestPorts {
    pub login: MockLoginService,
    pub registration: MockUserRegistration,
    pub users: MockUsersQuery,
    pub blogs: MockBlogsQuery,
    pub blog_commands: MockBlogsCommand,
    pub tokens: StaticTokens,
}

impl TestPorts {
    pub fn into_state(self) -> HttpState {
        HttpState {
            login: Arc::new(self.login),
            tokens: Arc::new(self.tokens),
            registration: Arc::new(self.registration),
            users: Arc::new(self.users),
            blogs: Arc::new(self.blogs),
            blog_commands: Arc::new(self.blog_commands),
        }
    }
}

/// State whose only working port is `tokens`.
pub fn state_with_tokens(tokens: StaticTokens) -> HttpState {
    TestPorts {
        tokens,
        ..TestPorts::default()
    }
    .into_state()
}

/// Build an `/api` app around `ports` with the production JSON config.
pub fn api_app(
    ports: TestPorts,
) -> actix_web::App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    actix_web::App::new()
        .app_data(web::Data::new(ports.into_state()))
        .app_data(json_config())
        .service(super::api_scope())
}

/// `Authorization` header value for [`VALID_TOKEN`].
pub fn bearer() -> (&'static str, String) {
    ("Authorization", format!("Bearer {VALID_TOKEN}"))
}
