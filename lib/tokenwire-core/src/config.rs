//! Token endpoint configuration and builder.

use url::Url;

use crate::error::ConfigError;

/// Twitch token endpoint.
pub const TWITCH_TOKEN_URL: &str = "https://id.twitch.tv/oauth2/token";

/// Twitch authorization endpoint, opened in the browser for the authorization code flow.
pub const TWITCH_AUTHORIZE_URL: &str = "https://id.twitch.tv/oauth2/authorize";

/// Redirect URI registered by default for local applications.
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost";

/// Where the token request parameters are sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ParameterPlacement {
    /// `application/x-www-form-urlencoded` POST body (RFC 6749 §4.1.3).
    #[default]
    FormBody,
    /// Query string of the POST URL, accepted by some legacy endpoints.
    QueryString,
}

/// Token endpoint configuration.
///
/// Use [`EndpointConfigBuilder`] to create instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    token_url: Url,
    authorize_url: Option<Url>,
    placement: ParameterPlacement,
}

impl EndpointConfig {
    /// Creates a builder for the given token endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTokenEndpoint`] if the URL cannot be parsed
    /// or is not an `http`/`https` URL.
    pub fn builder(token_url: impl AsRef<str>) -> Result<EndpointConfigBuilder, ConfigError> {
        EndpointConfigBuilder::new(token_url)
    }

    /// Returns the Twitch endpoints configuration.
    ///
    /// # Errors
    ///
    /// Never fails in practice: the preset URLs are valid.
    pub fn twitch() -> Result<Self, ConfigError> {
        Ok(Self::builder(TWITCH_TOKEN_URL)?
            .with_authorize_url(TWITCH_AUTHORIZE_URL)?
            .build())
    }

    /// Returns the token endpoint URL.
    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    /// Returns the authorization endpoint URL, if configured.
    pub fn authorize_url(&self) -> Option<&Url> {
        self.authorize_url.as_ref()
    }

    /// Returns where the request parameters are sent.
    pub fn placement(&self) -> ParameterPlacement {
        self.placement
    }
}

/// Builder for [`EndpointConfig`].
#[derive(Debug, Clone)]
pub struct EndpointConfigBuilder {
    token_url: Url,
    authorize_url: Option<Url>,
    placement: ParameterPlacement,
}

impl EndpointConfigBuilder {
    /// Creates a new builder with the token endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTokenEndpoint`] if the URL cannot be parsed
    /// or is not an `http`/`https` URL.
    pub fn new(token_url: impl AsRef<str>) -> Result<Self, ConfigError> {
        let raw = token_url.as_ref();
        let token_url =
            parse_http_url(raw).map_err(|reason| ConfigError::InvalidTokenEndpoint {
                url: raw.to_string(),
                reason,
            })?;

        Ok(Self {
            token_url,
            authorize_url: None,
            placement: ParameterPlacement::default(),
        })
    }

    /// Sets the authorization endpoint URL, needed to build browser authorization URLs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAuthorizeEndpoint`] if the URL cannot be parsed
    /// or is not an `http`/`https` URL.
    pub fn with_authorize_url(
        mut self,
        authorize_url: impl AsRef<str>,
    ) -> Result<Self, ConfigError> {
        let raw = authorize_url.as_ref();
        let url = parse_http_url(raw).map_err(|reason| ConfigError::InvalidAuthorizeEndpoint {
            url: raw.to_string(),
            reason,
        })?;
        self.authorize_url = Some(url);
        Ok(self)
    }

    /// Sets where the request parameters are sent.
    #[must_use]
    pub fn with_placement(mut self, placement: ParameterPlacement) -> Self {
        self.placement = placement;
        self
    }

    /// Builds the endpoint configuration.
    #[must_use]
    pub fn build(self) -> EndpointConfig {
        EndpointConfig {
            token_url: self.token_url,
            authorize_url: self.authorize_url,
            placement: self.placement,
        }
    }
}

fn parse_http_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|err| err.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(format!("unsupported scheme '{scheme}'")),
    }
    if url.fragment().is_some() {
        return Err("fragments are not allowed".to_string());
    }
    Ok(url)
}
