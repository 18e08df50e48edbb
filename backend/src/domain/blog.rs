//! Blog records and the inputs that create or modify them.
//!
//! Inbound adapters hand the raw, optional fields of a request to the blog
//! service as a [`BlogDraftInput`] or [`BlogPatchInput`]. Validation happens
//! inside the service so that authentication and existence checks always
//! precede field checks.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Error, UserId, Username};

/// Stable blog identifier assigned at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlogId(Uuid);

impl BlogId {
    /// Parse an identifier, returning `None` for anything that is not a UUID.
    ///
    /// A malformed identifier can never name a stored blog, so callers treat
    /// `None` as "not found".
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw).ok().map(Self)
    }

    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an identifier read back from storage.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for BlogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<BlogId> for String {
    fn from(value: BlogId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for BlogId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid blog id: {value}"))
    }
}

/// Owner details resolved from the User Store and embedded in every blog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogOwner {
    #[schema(value_type = String)]
    pub id: UserId,
    #[schema(value_type = String, example = "root")]
    pub username: Username,
    pub name: Option<String>,
}

/// A stored blog with its owner resolved.
///
/// ## Invariants
/// - `title` and `url` are non-empty once trimmed.
/// - `owner` is set at creation and never reassigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    #[schema(value_type = String)]
    pub id: BlogId,
    #[schema(example = "Go To Statement Considered Harmful")]
    pub title: String,
    #[schema(example = "Edsger W. Dijkstra")]
    pub author: Option<String>,
    #[schema(example = "http://localhost")]
    pub url: String,
    pub likes: u32,
    #[serde(rename = "user")]
    pub owner: BlogOwner,
}

impl Blog {
    /// Persistable form of this blog, referencing the owner by id only.
    #[must_use]
    pub fn record(&self) -> BlogRecord {
        BlogRecord {
            id: self.id,
            title: self.title.clone(),
            author: self.author.clone(),
            url: self.url.clone(),
            likes: self.likes,
            owner: self.owner.id,
        }
    }

    /// Apply a validated patch, leaving absent fields untouched.
    pub fn apply(&mut self, patch: BlogPatch) {
        let BlogPatch {
            title,
            author,
            url,
            likes,
        } = patch;
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(author) = author {
            self.author = Some(author);
        }
        if let Some(url) = url {
            self.url = url;
        }
        if let Some(likes) = likes {
            self.likes = likes;
        }
    }
}

/// Blog as listed under its owner, without the nested owner object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnedBlog {
    #[schema(value_type = String)]
    pub id: BlogId,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: u32,
}

impl From<Blog> for OwnedBlog {
    fn from(blog: Blog) -> Self {
        Self {
            id: blog.id,
            title: blog.title,
            author: blog.author,
            url: blog.url,
            likes: blog.likes,
        }
    }
}

/// A registered user together with every blog they own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserWithBlogs {
    #[schema(value_type = String)]
    pub id: UserId,
    #[schema(value_type = String, example = "root")]
    pub username: Username,
    pub name: Option<String>,
    pub blogs: Vec<OwnedBlog>,
}

/// Row-shaped blog handed to the Blog Store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogRecord {
    pub id: BlogId,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: u32,
    pub owner: UserId,
}

/// Raw `likes` value as it arrived from the caller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LikesInput {
    /// Field omitted or `null`.
    #[default]
    Missing,
    /// Field present but not a number (string, boolean, object, ...).
    NotNumeric,
    /// Integral number, possibly negative.
    Integer(i64),
    /// Number with a fractional part or outside the integer range.
    Fractional(f64),
}

/// Unvalidated create request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlogDraftInput {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: LikesInput,
}

/// Unvalidated update request. `None` fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlogPatchInput {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: LikesInput,
}

/// Field-level validation failures for blog inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlogValidationError {
    /// `title` was missing or blank.
    #[error("title is required")]
    MissingTitle,
    /// `url` was missing or blank.
    #[error("url is required")]
    MissingUrl,
    /// `likes` was a negative number.
    #[error("likes must not be negative")]
    NegativeLikes,
    /// `likes` was not a whole number or does not fit the counter.
    #[error("likes must be a whole number")]
    InvalidLikes,
}

impl BlogValidationError {
    fn field(&self) -> &'static str {
        match self {
            Self::MissingTitle => "title",
            Self::MissingUrl => "url",
            Self::NegativeLikes | Self::InvalidLikes => "likes",
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::MissingTitle | Self::MissingUrl => "missing_field",
            Self::NegativeLikes => "negative_likes",
            Self::InvalidLikes => "invalid_likes",
        }
    }
}

impl From<BlogValidationError> for Error {
    fn from(value: BlogValidationError) -> Self {
        Self::invalid_request(value.to_string()).with_details(json!({
            "field": value.field(),
            "code": value.code(),
        }))
    }
}

fn required_text(
    value: Option<String>,
    missing: BlogValidationError,
) -> Result<String, BlogValidationError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(missing),
    }
}

fn patched_text(
    value: Option<String>,
    missing: BlogValidationError,
) -> Result<Option<String>, BlogValidationError> {
    value.map(|text| required_text(Some(text), missing)).transpose()
}

/// Upper bound on `likes`; the store keeps counts as 32-bit signed integers.
pub const LIKES_MAX: u32 = i32::MAX as u32;

fn counted_likes(value: i64) -> Result<u32, BlogValidationError> {
    if value < 0 {
        return Err(BlogValidationError::NegativeLikes);
    }
    u32::try_from(value)
        .ok()
        .filter(|likes| *likes <= LIKES_MAX)
        .ok_or(BlogValidationError::InvalidLikes)
}

/// Validated create request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogDraft {
    pub title: String,
    pub author: Option<String>,
    pub url: String,
    pub likes: u32,
}

impl TryFrom<BlogDraftInput> for BlogDraft {
    type Error = BlogValidationError;

    /// `likes` falls back to 0 when omitted or not a number; numeric values
    /// must be whole and non-negative.
    ///
    /// # Examples
    /// ```
    /// use bloglist::domain::{BlogDraft, BlogDraftInput, LikesInput};
    ///
    /// let draft = BlogDraft::try_from(BlogDraftInput {
    ///     title: Some("Subject".into()),
    ///     author: None,
    ///     url: Some("http://localhost".into()),
    ///     likes: LikesInput::NotNumeric,
    /// })
    /// .unwrap();
    /// assert_eq!(draft.likes, 0);
    /// ```
    fn try_from(input: BlogDraftInput) -> Result<Self, Self::Error> {
        let BlogDraftInput {
            title,
            author,
            url,
            likes,
        } = input;
        let title = required_text(title, BlogValidationError::MissingTitle)?;
        let url = required_text(url, BlogValidationError::MissingUrl)?;
        let likes = match likes {
            LikesInput::Missing | LikesInput::NotNumeric => 0,
            LikesInput::Integer(value) => counted_likes(value)?,
            LikesInput::Fractional(_) => return Err(BlogValidationError::InvalidLikes),
        };
        Ok(Self {
            title,
            author,
            url,
            likes,
        })
    }
}

/// Validated partial update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlogPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<u32>,
}

impl TryFrom<BlogPatchInput> for BlogPatch {
    type Error = BlogValidationError;

    fn try_from(input: BlogPatchInput) -> Result<Self, Self::Error> {
        let BlogPatchInput {
            title,
            author,
            url,
            likes,
        } = input;
        let likes = match likes {
            LikesInput::Missing => None,
            LikesInput::Integer(value) => Some(counted_likes(value)?),
            LikesInput::NotNumeric | LikesInput::Fractional(_) => {
                return Err(BlogValidationError::InvalidLikes);
            }
        };
        Ok(Self {
            title: patched_text(title, BlogValidationError::MissingTitle)?,
            author,
            url: patched_text(url, BlogValidationError::MissingUrl)?,
            likes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::{fixture, rstest};

    #[fixture]
    fn draft_input() -> BlogDraftInput {
        BlogDraftInput {
            title: Some("Subject".to_owned()),
            author: Some("BlogTester".to_owned()),
            url: Some("http://localhost".to_owned()),
            likes: LikesInput::Integer(7),
        }
    }

    #[fixture]
    fn stored_blog() -> Blog {
        Blog {
            id: BlogId::random(),
            title: "Original".to_owned(),
            author: Some("Someone".to_owned()),
            url: "http://example.com".to_owned(),
            likes: 3,
            owner: BlogOwner {
                id: UserId::random(),
                username: Username::new("root").expect("username"),
                name: None,
            },
        }
    }

    #[rstest]
    fn draft_keeps_all_fields(draft_input: BlogDraftInput) {
        let draft = BlogDraft::try_from(draft_input).expect("valid draft");
        assert_eq!(draft.title, "Subject");
        assert_eq!(draft.author.as_deref(), Some("BlogTester"));
        assert_eq!(draft.url, "http://localhost");
        assert_eq!(draft.likes, 7);
    }

    #[rstest]
    #[case(LikesInput::Missing)]
    #[case(LikesInput::NotNumeric)]
    fn draft_likes_default_to_zero(mut draft_input: BlogDraftInput, #[case] likes: LikesInput) {
        draft_input.likes = likes;
        let draft = BlogDraft::try_from(draft_input).expect("valid draft");
        assert_eq!(draft.likes, 0);
    }

    #[rstest]
    #[case(None, Some("http://localhost"), BlogValidationError::MissingTitle)]
    #[case(Some("  "), Some("http://localhost"), BlogValidationError::MissingTitle)]
    #[case(Some("Subject"), None, BlogValidationError::MissingUrl)]
    #[case(Some("Subject"), Some(""), BlogValidationError::MissingUrl)]
    #[case(None, None, BlogValidationError::MissingTitle)]
    fn draft_requires_title_and_url(
        mut draft_input: BlogDraftInput,
        #[case] title: Option<&str>,
        #[case] url: Option<&str>,
        #[case] expected: BlogValidationError,
    ) {
        draft_input.title = title.map(str::to_owned);
        draft_input.url = url.map(str::to_owned);
        assert_eq!(BlogDraft::try_from(draft_input), Err(expected));
    }

    #[rstest]
    #[case(LikesInput::Integer(-1), BlogValidationError::NegativeLikes)]
    #[case(LikesInput::Fractional(2.5), BlogValidationError::InvalidLikes)]
    #[case(LikesInput::Integer(i64::MAX), BlogValidationError::InvalidLikes)]
    #[case(LikesInput::Integer(3_000_000_000), BlogValidationError::InvalidLikes)]
    #[case(LikesInput::Integer(i64::from(LIKES_MAX) + 1), BlogValidationError::InvalidLikes)]
    fn draft_rejects_bad_numeric_likes(
        mut draft_input: BlogDraftInput,
        #[case] likes: LikesInput,
        #[case] expected: BlogValidationError,
    ) {
        draft_input.likes = likes;
        assert_eq!(BlogDraft::try_from(draft_input), Err(expected));
    }

    #[rstest]
    fn patch_leaves_absent_fields_unchanged(mut stored_blog: Blog) {
        let patch = BlogPatch::try_from(BlogPatchInput {
            author: Some("modified author".to_owned()),
            likes: LikesInput::Integer(669),
            ..BlogPatchInput::default()
        })
        .expect("valid patch");
        let owner = stored_blog.owner.clone();

        stored_blog.apply(patch);

        assert_eq!(stored_blog.title, "Original");
        assert_eq!(stored_blog.author.as_deref(), Some("modified author"));
        assert_eq!(stored_blog.url, "http://example.com");
        assert_eq!(stored_blog.likes, 669);
        assert_eq!(stored_blog.owner, owner);
    }

    #[rstest]
    #[case(BlogPatchInput { title: Some(String::new()), ..BlogPatchInput::default() })]
    #[case(BlogPatchInput { url: Some(" ".to_owned()), ..BlogPatchInput::default() })]
    #[case(BlogPatchInput { likes: LikesInput::Integer(-4), ..BlogPatchInput::default() })]
    #[case(BlogPatchInput { likes: LikesInput::NotNumeric, ..BlogPatchInput::default() })]
    #[case(BlogPatchInput { likes: LikesInput::Integer(3_000_000_000), ..BlogPatchInput::default() })]
    fn patch_rejects_invalid_fields(#[case] input: BlogPatchInput) {
        assert!(BlogPatch::try_from(input).is_err());
    }

    #[rstest]
    fn validation_errors_map_to_invalid_request_with_field() {
        let error = Error::from(BlogValidationError::MissingUrl);
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        let details = error.details().expect("details present");
        assert_eq!(details["field"], "url");
        assert_eq!(details["code"], "missing_field");
    }

    #[rstest]
    fn blog_serialises_owner_under_user_key(stored_blog: Blog) {
        let value = serde_json::to_value(&stored_blog).expect("serialise blog");
        assert_eq!(value["user"]["username"], "root");
        assert_eq!(value["likes"], 3);
        assert!(value.get("owner").is_none());
    }
}
