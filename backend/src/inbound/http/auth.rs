//! Bearer-token authentication for HTTP handlers.
//!
//! Keep the HTTP modules focused on request/response mapping by concentrating
//! header parsing and identity derivation here. Handlers that take a
//! [`BearerAuth`] argument first reject unauthenticated requests before any
//! body is read.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};

use crate::domain::{AuthError, AuthenticatedUser, Error};

use super::state::HttpState;

const BEARER_SCHEME: &str = "bearer";

/// Extract the raw token from an `Authorization` header.
///
/// Returns `Ok(None)` when the header is absent. A header with another
/// scheme, no token, or non-ASCII bytes is rejected as an invalid token.
fn bearer_token(req: &HttpRequest) -> Result<Option<&str>, AuthError> {
    let Some(header) = req.headers().get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = header.to_str().map_err(|_| AuthError::InvalidToken)?;
    let (scheme, token) = value
        .trim()
        .split_once(' ')
        .ok_or(AuthError::InvalidToken)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) || token.is_empty() {
        return Err(AuthError::InvalidToken);
    }
    Ok(Some(token))
}

/// Authenticated caller resolved from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerAuth(pub AuthenticatedUser);

impl BearerAuth {
    pub fn into_inner(self) -> AuthenticatedUser {
        self.0
    }
}

impl FromRequest for BearerAuth {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<HttpState>>() else {
            return ready(Err(Error::internal("HTTP state not configured")));
        };
        let result = bearer_token(req)
            .and_then(|token| state.tokens.verify(token))
            .map(BearerAuth)
            .map_err(Error::from);
        ready(result)
    }
}
