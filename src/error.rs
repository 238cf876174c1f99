//! Error types for the hero client.

use reqwest::StatusCode;

/// Failures seen between the client and the backend.
///
/// `HeroService` swallows all of these on its degraded operations; they only
/// reach callers through `HeroService::try_get` and `HeroDetail::open`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Network or HTTP client failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered 404
    #[error("not found: {url}")]
    NotFound { url: String },

    /// Any other non-success status
    #[error("http failure response for {url}: {status}")]
    Status { status: StatusCode, url: String },

    /// Response body was not the expected JSON
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Route `id` parameter is not an integer
    #[error("invalid route parameter id={0:?}")]
    InvalidRouteParam(String),
}

impl Error {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
