//! HTTP transport abstraction.
//!
//! The client only needs to send one [`TokenRequest`] and read back a status
//! code and a body. Any HTTP client can be plugged in by implementing
//! [`Transport`]; [`ReqwestTransport`] is provided.
//!
//! # Example
//!
//! ```rust
//! use bytes::Bytes;
//! use http::StatusCode;
//! use tokenwire_core::{TokenRequest, Transport, TransportError, TransportResponse};
//!
//! #[derive(Debug)]
//! struct FixedTransport;
//!
//! impl Transport for FixedTransport {
//!     async fn send(&self, _request: &TokenRequest) -> Result<TransportResponse, TransportError> {
//!         Ok(TransportResponse::new(
//!             StatusCode::OK,
//!             Bytes::from_static(br#"{"access_token":"abc","token_type":"bearer"}"#),
//!         ))
//!     }
//! }
//! ```

use std::future::Future;

use bytes::Bytes;
use http::StatusCode;

use crate::request::TokenRequest;

mod reqwest_transport;
pub use self::reqwest_transport::{DEFAULT_TIMEOUT, ReqwestTransport, ReqwestTransportBuilder};

/// Sends token requests over HTTP.
///
/// Implementations send exactly one HTTP request per call and never retry.
/// Dropping the returned future must abort the request.
pub trait Transport {
    /// Sends the request and returns the raw response.
    ///
    /// Any HTTP status is a successful send; only failures to deliver the
    /// request or read the response are errors.
    fn send(
        &self,
        request: &TokenRequest,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send;
}

/// Raw HTTP response from the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    status: StatusCode,
    body: Bytes,
}

impl TransportResponse {
    /// Creates a response from its status code and body.
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns the HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the raw body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

/// Errors raised by a [`Transport`] when a request cannot be completed.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum TransportError {
    /// HTTP client error from the underlying reqwest library.
    ///
    /// Occurs on connection failures, timeouts or when the body cannot be read.
    #[display("HTTP request failed")]
    ReqwestError(reqwest::Error),

    /// I/O error, for transports built on other HTTP clients.
    #[display("I/O error")]
    IoError(std::io::Error),

    /// The request parameters could not be form-encoded.
    #[display("Failed to encode the request parameters")]
    FormEncodingError(serde_urlencoded::ser::Error),
}

impl TransportError {
    /// Returns `true` if the request timed out.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::ReqwestError(error) => error.is_timeout(),
            Self::IoError(error) => error.kind() == std::io::ErrorKind::TimedOut,
            Self::FormEncodingError(_) => false,
        }
    }

    /// Returns `true` if no connection could be established.
    pub fn is_connect(&self) -> bool {
        match self {
            Self::ReqwestError(error) => error.is_connect(),
            Self::IoError(error) => matches!(
                error.kind(),
                std::io::ErrorKind::ConnectionRefused
                    | std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::NotConnected
            ),
            Self::FormEncodingError(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn should_create_response() {
        let response = TransportResponse::new(StatusCode::CREATED, "{}");
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.body().as_ref(), b"{}");
    }

    #[test]
    fn should_classify_io_errors() {
        let refused = TransportError::from(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "connection refused",
        ));
        assert!(refused.is_connect());
        assert!(!refused.is_timeout());

        let timeout = TransportError::from(io::Error::new(io::ErrorKind::TimedOut, "timed out"));
        assert!(timeout.is_timeout());
        assert!(!timeout.is_connect());
    }

    #[test]
    fn should_keep_cause_as_source() {
        use std::error::Error as _;

        let error = TransportError::from(io::Error::other("boom"));
        let source = error.source().expect("source");
        assert_eq!(source.to_string(), "boom");
        assert_eq!(error.to_string(), "I/O error");
    }
}
