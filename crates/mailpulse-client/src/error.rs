//! Error taxonomy surfaced by the gateway.

use mailpulse_api_models::ErrorBody;
use reqwest::StatusCode;
use thiserror::Error;

use crate::session::StoreError;

/// Convenience alias for gateway results.
pub type ApiResult<T> = Result<T, ApiError>;

/// Failure of a gateway call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure; the server may never have seen the request.
    #[error("request to {path} failed")]
    Network {
        /// Request path.
        path: String,
        /// Transport error.
        #[source]
        source: reqwest::Error,
    },
    /// The server rejected the session and it could not be refreshed.
    #[error("session expired; sign in again")]
    AuthExpired,
    /// Non-2xx response carrying field-level validation errors.
    #[error("{message}")]
    Validation {
        /// HTTP status code.
        status: u16,
        /// Field messages joined with `", "`.
        message: String,
    },
    /// Any other non-2xx response.
    #[error("{message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Server `detail`, or `HTTP <status>` when absent.
        message: String,
    },
    /// Request body could not be serialised.
    #[error("failed to encode request body for {path}")]
    Encode {
        /// Request path.
        path: String,
        /// Serialisation error.
        #[source]
        source: serde_json::Error,
    },
    /// Success response did not match the expected shape.
    #[error("unexpected response body from {path}")]
    Decode {
        /// Request path.
        path: String,
        /// Deserialisation error.
        #[source]
        source: serde_json::Error,
    },
    /// Base URL and path did not form a valid URL.
    #[error("invalid request URL for {path}")]
    InvalidUrl {
        /// Request path.
        path: String,
        /// Parse error.
        #[source]
        source: url::ParseError,
    },
    /// Token storage failed.
    #[error("token storage failed")]
    Storage(#[from] StoreError),
    /// HTTP client could not be constructed.
    #[error("failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),
}

impl ApiError {
    /// HTTP status associated with the failure, when there is one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Validation { status, .. } | Self::Http { status, .. } => Some(*status),
            Self::AuthExpired => Some(401),
            _ => None,
        }
    }

    /// Whether the caller should send the user back to sign in.
    #[must_use]
    pub const fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired)
    }
}

/// Build the normalised error for a non-2xx response body.
pub(crate) fn normalize_error(status: StatusCode, body: &[u8]) -> ApiError {
    let code = status.as_u16();
    let parsed = serde_json::from_slice::<ErrorBody>(body).ok();
    match parsed.and_then(|problem| problem.message().map(|msg| (problem.is_validation(), msg))) {
        Some((true, message)) => ApiError::Validation {
            status: code,
            message,
        },
        Some((false, message)) => ApiError::Http {
            status: code,
            message,
        },
        None => ApiError::Http {
            status: code,
            message: format!("HTTP {code}"),
        },
    }
}
