//! API error types.

use std::fmt;

use thiserror::Error;

/// Remote resource a fetch targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Categories,
    Places,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Categories => "categories",
            Resource::Places => "places",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a fetch failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchErrorKind {
    /// Connection refused, DNS failure, transport timeout.
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// Non-2xx response.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Body was not the expected JSON shape.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

impl FetchErrorKind {
    /// Short label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            FetchErrorKind::Transport(_) => "transport",
            FetchErrorKind::Status { .. } => "status",
            FetchErrorKind::Parse(_) => "parse",
            FetchErrorKind::InvalidUrl(_) => "invalid_url",
        }
    }
}

/// A failed network round trip for one resource.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to fetch {resource}: {kind}")]
pub struct FetchError {
    pub resource: Resource,
    #[source]
    pub kind: FetchErrorKind,
}

impl FetchError {
    pub fn new(resource: Resource, kind: FetchErrorKind) -> Self {
        Self { resource, kind }
    }
}

pub type FetchResult<T> = Result<T, FetchError>;

/// Client construction errors.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

pub type ApiResult<T> = Result<T, ApiError>;
