use std::error::Error as StdError;

use crate::domain::{ClassifiedError, ValidationError, is_retryable_status};

const BODY_FRAGMENT_LIMIT: usize = 256;

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`ZuoraClient`](crate::ZuoraClient) and the auth providers.
///
/// Every failure carries enough to decide whether a retry makes sense, see
/// [`ZuoraError::is_retryable`]. The library never retries on its own.
pub enum ZuoraError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-2xx status without a `reasons` payload.
    #[error("unexpected HTTP status {status}: {message}")]
    HttpStatus {
        status: u16,
        message: String,
        body: Option<String>,
    },

    /// Zuora reported a business failure through its `reasons` array, either
    /// with a non-2xx status or inside a 2xx `success: false` envelope.
    #[error("API error {}: {}", .error.status, .error.message)]
    Api {
        error: ClassifiedError,
        /// Status of the HTTP response itself, which may differ from the
        /// classified one (2xx for `success: false`, 400 reclassified as 429).
        http_status: u16,
        /// Leading part of the response body.
        fragment: String,
    },

    /// Response body could not be decoded as the expected format.
    #[error("parse error: {source} (body: {fragment})")]
    Parse {
        #[source]
        source: Box<dyn StdError + Send + Sync>,
        fragment: String,
    },

    /// A request payload could not be serialized.
    #[error("could not encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A request URL could not be built from the configured base URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl ZuoraError {
    /// Whether repeating the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::HttpStatus { status, .. } => is_retryable_status(*status),
            Self::Api { error, .. } => error.retryable,
            Self::Transport(_)
            | Self::Parse { .. }
            | Self::Encode(_)
            | Self::Validation(_)
            | Self::InvalidUrl(_) => false,
        }
    }

    /// HTTP status (raw or classified) when the failure came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Api { error, .. } => Some(error.status),
            _ => None,
        }
    }

    pub(crate) fn api(error: ClassifiedError, http_status: u16, body: &str) -> Self {
        Self::Api {
            error,
            http_status,
            fragment: body_fragment(body),
        }
    }

    pub(crate) fn parse(source: impl Into<Box<dyn StdError + Send + Sync>>, body: &str) -> Self {
        Self::Parse {
            source: source.into(),
            fragment: body_fragment(body),
        }
    }
}

fn body_fragment(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(BODY_FRAGMENT_LIMIT) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_owned(),
    }
}
