//! HS256 JSON Web Token implementation of the `TokenCodec` port.
//!
//! Claims carry the user id as `sub` plus the username. Expiry is optional:
//! without a configured lifetime tokens stay valid until the secret rotates.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{TokenCodec, TokenError};
use crate::domain::{AuthenticatedUser, UserId, Username};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    sub: String,
    username: String,
    iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
}

/// Signs and verifies bearer tokens with a shared secret.
#[derive(Clone)]
pub struct JwtTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Option<Duration>,
}

impl JwtTokenCodec {
    pub fn new(secret: &[u8], ttl: Option<Duration>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["sub"]);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    fn expiry(&self, issued_at: i64) -> Result<Option<i64>, TokenError> {
        self.ttl
            .map(|ttl| {
                i64::try_from(ttl.as_secs())
                    .ok()
                    .and_then(|secs| issued_at.checked_add(secs))
                    .ok_or_else(|| TokenError::signing("token lifetime out of range"))
            })
            .transpose()
    }
}

impl TokenCodec for JwtTokenCodec {
    fn issue(&self, identity: &AuthenticatedUser) -> Result<String, TokenError> {
        let iat = Utc::now().timestamp();
        let claims = Claims {
            sub: identity.id().to_string(),
            username: identity.username().to_string(),
            iat,
            exp: self.expiry(iat)?,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenError::signing(err.to_string()))
    }

    fn decode(&self, token: &str) -> Result<AuthenticatedUser, TokenError> {
        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::expired(),
                _ => TokenError::invalid(err.to_string()),
            })?;

        let id = UserId::new(&claims.sub).map_err(|err| TokenError::invalid(err.to_string()))?;
        let username =
            Username::new(&claims.username).map_err(|err| TokenError::invalid(err.to_string()))?;
        Ok(AuthenticatedUser::new(id, username))
    }
}
