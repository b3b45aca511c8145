//! Token exchange client.

use tracing::{debug, warn};
use url::Url;

use crate::config::EndpointConfig;
use crate::credentials::Credentials;
use crate::error::{ConfigError, TokenError};
use crate::grant::{AuthorizeRequest, GrantRequest};
use crate::request::TokenRequest;
use crate::response::parse_token_response;
use crate::secure::SecureString;
use crate::token::TokenResult;
use crate::transport::{ReqwestTransport, Transport};

/// Client for an OAuth2 token endpoint.
///
/// The client only holds its configuration and transport: every call is
/// independent, and concurrent calls need no locking.
///
/// # Example
///
/// ```rust,no_run
/// use tokenwire_core::{Credentials, ExchangeClient, GrantRequest};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ExchangeClient::twitch()?;
/// let credentials = Credentials::new("client-id", "client-secret");
///
/// let token = client
///     .exchange(&credentials, &GrantRequest::client_credentials("chat:read"))
///     .await?;
/// println!("expires in {:?}", token.expires_in());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ExchangeClient<T = ReqwestTransport> {
    config: EndpointConfig,
    transport: T,
}

impl ExchangeClient<ReqwestTransport> {
    /// Creates a client using a default [`ReqwestTransport`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: EndpointConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_transport(config, ReqwestTransport::new()?))
    }

    /// Creates a client for the Twitch endpoints using a default [`ReqwestTransport`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn twitch() -> Result<Self, ConfigError> {
        Self::new(EndpointConfig::twitch()?)
    }
}

impl<T> ExchangeClient<T>
where
    T: Transport,
{
    /// Creates a client sending its requests through the given transport.
    pub fn with_transport(config: EndpointConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// Returns the endpoint configuration.
    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    /// Returns the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Exchanges a grant for a token.
    ///
    /// Credentials and grant are validated before anything is sent. The
    /// request is sent once; nothing is retried.
    ///
    /// # Errors
    ///
    /// - [`TokenError::InvalidCredentials`] if the client id or secret is empty
    /// - [`TokenError::InvalidGrant`] if a grant field is empty or invalid
    /// - [`TokenError::TransportError`] if the request could not be completed
    /// - [`TokenError::MalformedResponse`] if the body is not a usable token response
    /// - [`TokenError::ProviderError`] if the endpoint rejected the request
    pub async fn exchange(
        &self,
        credentials: &Credentials,
        grant: &GrantRequest,
    ) -> Result<TokenResult, TokenError> {
        credentials.validate()?;
        grant.validate()?;

        let grant_type = grant.grant_type();
        let request = TokenRequest::build(&self.config, credentials, grant);

        debug!(?request, "sending...");
        let response = self.transport.send(&request).await.map_err(|error| {
            warn!(
                %grant_type,
                error = &error as &dyn std::error::Error,
                "token request failed"
            );
            TokenError::from(error)
        })?;
        debug!(status = %response.status(), body_length = response.body().len(), "...receiving");

        parse_token_response(response.status(), response.body()).inspect_err(|error| {
            if let TokenError::ProviderError(error) = error {
                warn!(%grant_type, %error, "token endpoint rejected the request");
            }
        })
    }

    /// Acquires an app access token with the client credentials grant.
    ///
    /// # Errors
    ///
    /// See [`ExchangeClient::exchange`].
    pub async fn app_access_token(
        &self,
        credentials: &Credentials,
        scope: impl Into<String>,
    ) -> Result<TokenResult, TokenError> {
        let grant = GrantRequest::client_credentials(scope);
        self.exchange(credentials, &grant).await
    }

    /// Acquires the first user access token from an authorization code.
    ///
    /// This is used once, after the user authorized the application in a
    /// browser; later tokens come from [`ExchangeClient::refresh_user_access_token`].
    ///
    /// # Errors
    ///
    /// See [`ExchangeClient::exchange`].
    pub async fn user_access_token(
        &self,
        credentials: &Credentials,
        code: impl Into<SecureString>,
        redirect_uri: impl Into<String>,
    ) -> Result<TokenResult, TokenError> {
        let grant = GrantRequest::authorization_code(code, redirect_uri);
        self.exchange(credentials, &grant).await
    }

    /// Acquires a new user access token from a refresh token.
    ///
    /// # Errors
    ///
    /// See [`ExchangeClient::exchange`].
    pub async fn refresh_user_access_token(
        &self,
        credentials: &Credentials,
        refresh_token: impl Into<SecureString>,
    ) -> Result<TokenResult, TokenError> {
        let grant = GrantRequest::refresh_token(refresh_token);
        self.exchange(credentials, &grant).await
    }

    /// Builds the browser URL starting the authorization code flow.
    ///
    /// # Errors
    ///
    /// - [`TokenError::ConfigError`] if no authorization endpoint is configured
    /// - [`TokenError::InvalidCredentials`] if the client id is empty
    /// - [`TokenError::InvalidGrant`] if the redirect URI is empty or invalid
    pub fn authorize_url(&self, request: &AuthorizeRequest) -> Result<Url, TokenError> {
        let Some(authorize_url) = self.config.authorize_url() else {
            return Err(ConfigError::MissingAuthorizeEndpoint.into());
        };
        request.validate()?;

        let mut url = authorize_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("client_id", &request.client_id)
                .append_pair("redirect_uri", &request.redirect_uri)
                .append_pair("response_type", "code");
            if !request.scopes.is_empty() {
                pairs.append_pair("scope", &request.scopes.join(" "));
            }
            if let Some(state) = &request.state {
                pairs.append_pair("state", state);
            }
            if request.force_verify {
                pairs.append_pair("force_verify", "true");
            }
        }
        Ok(url)
    }
}
