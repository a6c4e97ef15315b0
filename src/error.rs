//! Error types for the Verifalia client.

use thiserror::Error;

/// Errors raised locally by the client.
///
/// HTTP-level outcomes (including 4xx/5xx answers from the API) are not errors;
/// they come back as a [`Response`](crate::Response) whose status the caller inspects.
#[derive(Debug, Error)]
pub enum Error {
    /// The account SID or the auth token was empty.
    #[error("account SID and auth token must both be non-empty")]
    MissingCredentials,

    /// A required argument was empty; rejected before any network call.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// The configured user agent cannot be sent as an HTTP header value.
    #[error("invalid user agent: {0}")]
    InvalidUserAgent(#[from] reqwest::header::InvalidHeaderValue),

    /// The base URL or a request path could not be parsed or joined.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Transport failure: connection refused, timeout, DNS failure, TLS, etc.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The request body could not be encoded.
    #[error("failed to serialize request body: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A successful response body did not match the validation job shape.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl Error {
    /// Whether the failure happened before anything was sent over the wire.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::MissingCredentials
                | Self::InvalidInput(_)
                | Self::InvalidUserAgent(_)
                | Self::Url(_)
                | Self::Serialize(_)
        )
    }
}
