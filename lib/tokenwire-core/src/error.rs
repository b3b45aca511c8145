//! Error types for token exchanges and client configuration.

use std::fmt;

use crate::transport::TransportError;

/// Maximum number of characters of a response body kept in an error.
pub(crate) const BODY_MAX_LENGTH: usize = 1024;

/// Errors that can occur during a token exchange.
///
/// None of these are retried by the client; the caller decides on a retry policy.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum TokenError {
    /// The client id or client secret is missing.
    ///
    /// Returned before any HTTP request is issued.
    #[display("Invalid credentials: {reason}")]
    #[from(skip)]
    InvalidCredentials {
        /// Which credential field is invalid.
        reason: String,
    },

    /// A grant-specific field is missing or invalid.
    ///
    /// Returned before any HTTP request is issued.
    #[display("Invalid grant: {reason}")]
    #[from(skip)]
    InvalidGrant {
        /// Which grant field is invalid.
        reason: String,
    },

    /// The transport failed to deliver the request or read the response.
    ///
    /// The transport error is the [`source`](std::error::Error::source).
    #[display("Transport error")]
    TransportError(TransportError),

    /// The token endpoint answered with a body that is not a usable token response.
    ///
    /// Covers invalid JSON, unexpected field types and a missing `access_token`.
    #[display("Malformed token response (status {status}): {reason}\n{body}")]
    #[from(skip)]
    MalformedResponse {
        /// HTTP status code of the response.
        status: u16,
        /// Description of what is wrong with the body.
        reason: String,
        /// The response body, possibly truncated.
        ///
        /// Token values are redacted when the body is JSON.
        body: String,
    },

    /// The token endpoint rejected the request.
    #[display("{_0}")]
    ProviderError(#[error(not(source))] ProviderError),

    /// The client configuration does not support the requested operation.
    #[display("{_0}")]
    ConfigError(#[error(not(source))] ConfigError),
}

impl TokenError {
    pub(crate) fn invalid_credentials(reason: impl Into<String>) -> Self {
        Self::InvalidCredentials {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_grant(reason: impl Into<String>) -> Self {
        Self::InvalidGrant {
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(status: u16, reason: impl Into<String>, body: &[u8]) -> Self {
        Self::MalformedResponse {
            status,
            reason: reason.into(),
            body: body_excerpt(body),
        }
    }

    /// Returns the provider error, if the token endpoint rejected the request.
    pub fn as_provider_error(&self) -> Option<&ProviderError> {
        match self {
            Self::ProviderError(error) => Some(error),
            _ => None,
        }
    }
}

/// Error reported by the token endpoint itself.
///
/// Built from either the RFC 6749 error body (`error`, `error_description`)
/// or the legacy `{"status": .., "message": ..}` body.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error)]
pub struct ProviderError {
    /// HTTP status code of the response.
    pub status: u16,
    /// Provider error code, e.g. `invalid_grant`.
    ///
    /// The HTTP status code, e.g. `400`, when the body carries no `error` field.
    pub code: String,
    /// Human-readable description, when the provider sent one.
    pub message: Option<String>,
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token endpoint rejected the request ({}): {}",
            self.status, self.code
        )?;
        if let Some(message) = &self.message {
            write!(f, " - {message}")?;
        }
        Ok(())
    }
}

/// Errors raised while configuring the client.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum ConfigError {
    /// Token endpoint URL is invalid.
    #[display("Invalid token endpoint URL '{url}': {reason}")]
    #[from(skip)]
    InvalidTokenEndpoint {
        /// The invalid URL that was provided.
        url: String,
        /// Description of why the URL is invalid.
        reason: String,
    },

    /// Authorization endpoint URL is invalid.
    #[display("Invalid authorization endpoint URL '{url}': {reason}")]
    #[from(skip)]
    InvalidAuthorizeEndpoint {
        /// The invalid URL that was provided.
        url: String,
        /// Description of why the URL is invalid.
        reason: String,
    },

    /// An authorization URL was requested but no authorization endpoint is configured.
    #[display("No authorization endpoint configured")]
    #[from(skip)]
    MissingAuthorizeEndpoint,

    /// The HTTP client could not be built.
    #[display("Failed to build HTTP client")]
    HttpClientError(reqwest::Error),
}

/// Returns the body as text, truncated to [`BODY_MAX_LENGTH`] characters.
pub(crate) fn body_excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.chars().count() > BODY_MAX_LENGTH {
        let head = text.chars().take(BODY_MAX_LENGTH).collect::<String>();
        format!("{head}... (truncated)")
    } else {
        text.into_owned()
    }
}
