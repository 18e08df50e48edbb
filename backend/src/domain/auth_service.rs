//! Authentication service: credential checks and session tokens.
//!
//! Implements [`LoginService`] and [`TokenVerifier`] over the User Store, a
//! password hasher and a token codec. The service holds no per-session state.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{
    LoginService, PasswordHashError, PasswordHasher, TokenCodec, TokenError, TokenVerifier,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    AuthError, AuthenticatedUser, Error, LoginCredentials, LoginSession, PasswordHash,
};

/// Map User Store failures onto the domain taxonomy.
pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::store_unavailable(format!("user store unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user store error: {message}"))
        }
        UserPersistenceError::DuplicateUsername { username } => {
            Error::internal(format!("unexpected duplicate username: {username}"))
        }
    }
}

pub(crate) fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

/// Run a password hasher call on Tokio's blocking pool.
pub(crate) async fn run_hasher<H, F, R>(hasher: &Arc<H>, op: F) -> Result<R, Error>
where
    H: PasswordHasher + 'static,
    F: FnOnce(&H) -> Result<R, PasswordHashError> + Send + 'static,
    R: Send + 'static,
{
    let hasher = Arc::clone(hasher);
    tokio::task::spawn_blocking(move || op(hasher.as_ref()))
        .await
        .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
        .map_err(map_hash_error)
}

/// Plaintext behind the digest checked when a login names no stored user.
const DECOY_PASSWORD: &str = "decoy-password-for-unknown-users";

/// Login and bearer-token verification backed by the User Store.
///
/// Logins for unknown usernames still pay one digest verification, against
/// a decoy digest derived on first use, so response timing does not reveal
/// which usernames exist.
#[derive(Clone)]
pub struct AuthService<U, H, T> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    decoy: Arc<OnceCell<PasswordHash>>,
}

impl<U, H, T> AuthService<U, H, T> {
    pub fn new(users: Arc<U>, hasher: Arc<H>, tokens: Arc<T>) -> Self {
        Self {
            users,
            hasher,
            tokens,
            decoy: Arc::new(OnceCell::new()),
        }
    }
}

impl<U, H, T> AuthService<U, H, T>
where
    H: PasswordHasher + 'static,
{
    async fn password_matches(
        &self,
        credentials: &LoginCredentials,
        digest: PasswordHash,
    ) -> Result<bool, Error> {
        let password = Zeroizing::new(credentials.password().to_owned());
        run_hasher(&self.hasher, move |hasher| {
            hasher.verify(password.as_str(), &digest)
        })
        .await
    }

    async fn verify_against_decoy(&self, credentials: &LoginCredentials) -> Result<(), Error> {
        let decoy = self
            .decoy
            .get_or_try_init(|| run_hasher(&self.hasher, |hasher| hasher.hash(DECOY_PASSWORD)))
            .await?
            .clone();
        self.password_matches(credentials, decoy).await?;
        Ok(())
    }
}

#[async_trait]
impl<U, H, T> LoginService for AuthService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher + 'static,
    T: TokenCodec,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<LoginSession, Error> {
        let stored = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_user_persistence_error)?;

        let Some(stored) = stored else {
            self.verify_against_decoy(credentials).await?;
            warn!(username = credentials.username(), "login failed: unknown user");
            return Err(AuthError::InvalidCredentials.into());
        };

        if !self
            .password_matches(credentials, stored.password_hash)
            .await?
        {
            warn!(username = credentials.username(), "login failed: wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let user = stored.user;
        let identity = AuthenticatedUser::new(*user.id(), user.username().clone());
        let token = self
            .tokens
            .issue(&identity)
            .map_err(|err| Error::internal(err.to_string()))?;
        debug!(user_id = %user.id(), "issued session token");

        Ok(LoginSession {
            token,
            username: user.username().clone(),
            name: user.name().map(str::to_owned),
        })
    }
}

impl<U, H, T> TokenVerifier for AuthService<U, H, T>
where
    U: Send + Sync,
    H: Send + Sync,
    T: TokenCodec,
{
    fn verify(&self, raw: Option<&str>) -> Result<AuthenticatedUser, AuthError> {
        let token = raw.ok_or(AuthError::MissingToken)?;
        self.tokens.decode(token).map_err(|err| {
            match &err {
                TokenError::Expired => debug!("rejected expired token"),
                other => debug!(error = %other, "rejected token"),
            }
            AuthError::InvalidToken
        })
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
