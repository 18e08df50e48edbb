//! Authentication primitives: credentials, registrations and identities.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::{Error, USERNAME_MIN, UserId, UserValidationError, Username};

/// Minimum length, in characters, for a plaintext password at registration.
pub const PASSWORD_MIN: usize = 3;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password was missing or blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use bloglist::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(Some("root"), Some("sekret")).unwrap();
/// assert_eq!(creds.username(), "root");
/// assert_eq!(creds.password(), "sekret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw, possibly absent, username/password inputs.
    pub fn try_from_parts(
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, LoginValidationError> {
        let normalized = username.map(str::trim).unwrap_or_default();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }

        let password = password.unwrap_or_default();
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Field-level failures raised while validating a registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationValidationError {
    #[error("username is required")]
    MissingUsername,
    #[error("username must be at least {USERNAME_MIN} characters")]
    UsernameTooShort,
    #[error("password is required")]
    MissingPassword,
    #[error("password must be at least {PASSWORD_MIN} characters")]
    PasswordTooShort,
}

impl RegistrationValidationError {
    fn field(&self) -> &'static str {
        match self {
            Self::MissingUsername | Self::UsernameTooShort => "username",
            Self::MissingPassword | Self::PasswordTooShort => "password",
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::MissingUsername | Self::MissingPassword => "missing_field",
            Self::UsernameTooShort | Self::PasswordTooShort => "too_short",
        }
    }
}

impl From<RegistrationValidationError> for Error {
    fn from(value: RegistrationValidationError) -> Self {
        Self::invalid_request(value.to_string()).with_details(json!({
            "field": value.field(),
            "code": value.code(),
        }))
    }
}

/// Validated request to create a user.
///
/// The plaintext password is zeroised on drop and only leaves this type
/// through [`Registration::password`] for hashing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: Username,
    name: Option<String>,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate raw registration inputs.
    ///
    /// # Examples
    /// ```
    /// use bloglist::domain::{Registration, RegistrationValidationError};
    ///
    /// let err = Registration::try_from_parts(Some("root"), None, Some("se")).unwrap_err();
    /// assert_eq!(err, RegistrationValidationError::PasswordTooShort);
    /// ```
    pub fn try_from_parts(
        username: Option<&str>,
        name: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, RegistrationValidationError> {
        let username = Username::new(username.unwrap_or_default()).map_err(|err| match err {
            UserValidationError::UsernameTooShort { .. } => {
                RegistrationValidationError::UsernameTooShort
            }
            UserValidationError::EmptyUsername | UserValidationError::InvalidId => {
                RegistrationValidationError::MissingUsername
            }
        })?;

        let password = match password {
            None | Some("") => return Err(RegistrationValidationError::MissingPassword),
            Some(raw) if raw.chars().count() < PASSWORD_MIN => {
                return Err(RegistrationValidationError::PasswordTooShort);
            }
            Some(raw) => Zeroizing::new(raw.to_owned()),
        };

        let name = name
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned);

        Ok(Self {
            username,
            name,
            password,
        })
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Identity proven by a verified session token.
///
/// Handlers receive this from the bearer extractor and pass it explicitly to
/// every mutating use-case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    id: UserId,
    username: Username,
}

impl AuthenticatedUser {
    #[must_use]
    pub fn new(id: UserId, username: Username) -> Self {
        Self { id, username }
    }

    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }
}

/// Authentication failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No credential accompanied a protected request.
    #[error("token missing")]
    MissingToken,
    /// The credential was malformed, tampered with, or expired.
    #[error("token invalid")]
    InvalidToken,
    /// Unknown username or wrong password.
    #[error("invalid username or password")]
    InvalidCredentials,
}

impl From<AuthError> for Error {
    fn from(value: AuthError) -> Self {
        Self::unauthorized(value.to_string())
    }
}

impl From<LoginValidationError> for AuthError {
    fn from(_: LoginValidationError) -> Self {
        Self::InvalidCredentials
    }
}

/// Successful login response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LoginSession {
    /// Signed bearer token.
    pub token: String,
    #[schema(value_type = String, example = "root")]
    pub username: Username,
    #[schema(example = "Superuser")]
    pub name: Option<String>,
}
