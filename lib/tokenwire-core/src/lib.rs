//! # Tokenwire Core
//!
//! A small client for OAuth2 token endpoints.
//!
//! It covers the three exchanges an application needs against a provider such
//! as Twitch:
//!
//! - **App access token**: client credentials grant
//! - **User access token**: authorization code grant, after the user
//!   authorized the application in a browser
//! - **Refresh**: refresh token grant
//!
//! Each exchange builds one request, sends it over a [`Transport`] and turns the
//! JSON response into a [`TokenResult`] or a classified [`TokenError`]. There is
//! no caching, no retry and no background refresh: compose the client with
//! your own policy if you need them.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tokenwire_core::{AuthorizeRequest, Credentials, ExchangeClient, DEFAULT_REDIRECT_URI};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ExchangeClient::twitch()?;
//! let credentials = Credentials::new("client-id", "client-secret");
//!
//! // App access token
//! let app_token = client.app_access_token(&credentials, "").await?;
//!
//! // Send the user to the authorization page...
//! let url = client.authorize_url(
//!     &AuthorizeRequest::new(credentials.client_id(), DEFAULT_REDIRECT_URI)
//!         .add_scope("chat:read")
//!         .with_state("random-state"),
//! )?;
//!
//! // ...then exchange the code received on the redirect URI
//! let user_token = client
//!     .user_access_token(&credentials, "code-from-redirect", DEFAULT_REDIRECT_URI)
//!     .await?;
//!
//! // Later, refresh it
//! if let Some(refresh_token) = user_token.refresh_token() {
//!     let refreshed = client
//!         .refresh_user_access_token(&credentials, refresh_token)
//!         .await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error handling
//!
//! | Error | When |
//! |-------|------|
//! | [`TokenError::InvalidCredentials`] | empty client id or secret, nothing sent |
//! | [`TokenError::InvalidGrant`] | empty code, redirect URI or refresh token, nothing sent |
//! | [`TokenError::TransportError`] | connection failure, timeout |
//! | [`TokenError::MalformedResponse`] | non-JSON body, missing `access_token` |
//! | [`TokenError::ProviderError`] | non-2xx status or `error` field in the body |
//!
//! ## Custom transport
//!
//! [`ReqwestTransport`] is used by default. Implement [`Transport`] to use
//! another HTTP client and pass it to [`ExchangeClient::with_transport`].

mod client;
mod config;
mod credentials;
mod error;
mod grant;
mod request;
mod response;
mod secure;
mod token;
mod transport;

pub use self::client::ExchangeClient;
pub use self::config::{
    DEFAULT_REDIRECT_URI, EndpointConfig, EndpointConfigBuilder, ParameterPlacement,
    TWITCH_AUTHORIZE_URL, TWITCH_TOKEN_URL,
};
pub use self::credentials::Credentials;
pub use self::error::{ConfigError, ProviderError, TokenError};
pub use self::grant::{AuthorizeRequest, GrantRequest, GrantType};
pub use self::request::{FormField, TokenRequest};
pub use self::secure::SecureString;
pub use self::token::{DEFAULT_TOKEN_TYPE, TokenResult};
pub use self::transport::{
    DEFAULT_TIMEOUT, ReqwestTransport, ReqwestTransportBuilder, Transport, TransportError,
    TransportResponse,
};
