use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::redirect::Policy;
use tracing::debug;

use super::{Transport, TransportError, TransportResponse};
use crate::error::ConfigError;
use crate::request::TokenRequest;

/// Default timeout for a token request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";
const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// [`Transport`] backed by a [`reqwest::Client`].
///
/// Redirects are not followed, so credentials are never forwarded to another host.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with the default settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClientError`] if the HTTP client cannot be built,
    /// e.g. when no TLS backend is available.
    pub fn new() -> Result<Self, ConfigError> {
        Self::builder().build()
    }

    /// Creates a builder for a transport.
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::default()
    }

    /// Wraps an already configured client.
    ///
    /// The client's redirect policy is used as-is.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: &TokenRequest) -> Result<TransportResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method().clone(), request.target_url())
            .header(ACCEPT, JSON_CONTENT_TYPE);

        if let Some(body) = request.form_body()? {
            builder = builder.header(CONTENT_TYPE, FORM_CONTENT_TYPE).body(body);
        }

        // reqwest errors carry the URL, which holds the parameters with `QueryString`
        let response = builder.send().await.map_err(reqwest::Error::without_url)?;
        let status = response.status();
        debug!(%status, "token endpoint answered");

        let body = response
            .bytes()
            .await
            .map_err(reqwest::Error::without_url)?;
        Ok(TransportResponse::new(status, body))
    }
}

/// Builder for [`ReqwestTransport`].
#[derive(Debug, Clone)]
pub struct ReqwestTransportBuilder {
    timeout: Duration,
    user_agent: String,
}

impl Default for ReqwestTransportBuilder {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ReqwestTransportBuilder {
    /// Sets the timeout of a whole token request.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Builds the transport.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClientError`] if the HTTP client cannot be built.
    pub fn build(self) -> Result<ReqwestTransport, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .redirect(Policy::none())
            .build()?;
        Ok(ReqwestTransport { client })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_use_default_settings() {
        let builder = ReqwestTransport::builder();
        assert_eq!(builder.timeout, DEFAULT_TIMEOUT);
        assert!(builder.user_agent.starts_with("tokenwire-core/"));
    }

    #[test]
    fn should_override_settings() {
        let builder = ReqwestTransport::builder()
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("my-bot/1.0");
        assert_eq!(builder.timeout, Duration::from_secs(5));
        assert_eq!(builder.user_agent, "my-bot/1.0");
    }

    #[test]
    fn should_build_transport() {
        let transport = ReqwestTransport::builder()
            .with_timeout(Duration::from_secs(5))
            .build();
        assert!(transport.is_ok());
    }
}
