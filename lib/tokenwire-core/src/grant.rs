//! OAuth2 grants understood by the token endpoint.

use std::fmt;

use url::Url;

use crate::error::TokenError;
use crate::secure::SecureString;

/// The `grant_type` sent to the token endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrantType {
    /// `client_credentials`: app access token.
    ClientCredentials,
    /// `authorization_code`: first user access token after browser authorization.
    AuthorizationCode,
    /// `refresh_token`: new user access token from a refresh token.
    RefreshToken,
}

impl GrantType {
    /// Returns the wire value of the grant type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ClientCredentials => "client_credentials",
            Self::AuthorizationCode => "authorization_code",
            Self::RefreshToken => "refresh_token",
        }
    }
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request for a token, one variant per supported grant.
///
/// Each variant maps to exactly one wire request; see
/// [`TokenRequest`](crate::TokenRequest).
#[derive(Clone, PartialEq, Eq)]
pub enum GrantRequest {
    /// Client credentials grant (RFC 6749 §4.4), used for app access tokens.
    ClientCredentials {
        /// Space-delimited scopes, omitted from the request when empty.
        scope: String,
    },

    /// Authorization code grant (RFC 6749 §4.1.3).
    ///
    /// Used the first time a user access token is acquired, after the user
    /// authorized the application in a browser. Later tokens should come from
    /// [`GrantRequest::RefreshToken`].
    AuthorizationCode {
        /// The code received on the redirect URI.
        code: SecureString,
        /// The redirect URI used during authorization.
        redirect_uri: String,
    },

    /// Refresh token grant (RFC 6749 §6).
    RefreshToken {
        /// The refresh token from a previous exchange.
        refresh_token: SecureString,
    },
}

impl GrantRequest {
    /// Creates a client credentials grant.
    pub fn client_credentials(scope: impl Into<String>) -> Self {
        Self::ClientCredentials {
            scope: scope.into(),
        }
    }

    /// Creates a client credentials grant from individual scopes.
    pub fn client_credentials_with_scopes(
        scopes: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let scope = scopes
            .into_iter()
            .map(Into::into)
            .collect::<Vec<String>>()
            .join(" ");
        Self::ClientCredentials { scope }
    }

    /// Creates an authorization code grant.
    pub fn authorization_code(
        code: impl Into<SecureString>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self::AuthorizationCode {
            code: code.into(),
            redirect_uri: redirect_uri.into(),
        }
    }

    /// Creates a refresh token grant.
    pub fn refresh_token(refresh_token: impl Into<SecureString>) -> Self {
        Self::RefreshToken {
            refresh_token: refresh_token.into(),
        }
    }

    /// Returns the grant type sent on the wire.
    pub fn grant_type(&self) -> GrantType {
        match self {
            Self::ClientCredentials { .. } => GrantType::ClientCredentials,
            Self::AuthorizationCode { .. } => GrantType::AuthorizationCode,
            Self::RefreshToken { .. } => GrantType::RefreshToken,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), TokenError> {
        match self {
            Self::ClientCredentials { .. } => Ok(()),
            Self::AuthorizationCode { code, redirect_uri } => {
                if code.is_blank() {
                    return Err(TokenError::invalid_grant("authorization code is empty"));
                }
                validate_redirect_uri(redirect_uri)
            }
            Self::RefreshToken { refresh_token } => {
                if refresh_token.is_blank() {
                    return Err(TokenError::invalid_grant("refresh token is empty"));
                }
                Ok(())
            }
        }
    }
}

impl fmt::Debug for GrantRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClientCredentials { scope } => f
                .debug_struct("ClientCredentials")
                .field("scope", scope)
                .finish(),
            Self::AuthorizationCode { redirect_uri, .. } => f
                .debug_struct("AuthorizationCode")
                .field("code", &"[REDACTED]")
                .field("redirect_uri", redirect_uri)
                .finish(),
            Self::RefreshToken { .. } => f
                .debug_struct("RefreshToken")
                .field("refresh_token", &"[REDACTED]")
                .finish(),
        }
    }
}

/// Parameters of the browser authorization URL for the authorization code flow.
///
/// The user opens the URL, authorizes the application and is redirected to
/// `redirect_uri` with a `code` to exchange with
/// [`GrantRequest::AuthorizationCode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizeRequest {
    pub(crate) client_id: String,
    pub(crate) redirect_uri: String,
    pub(crate) scopes: Vec<String>,
    pub(crate) state: Option<String>,
    pub(crate) force_verify: bool,
}

impl AuthorizeRequest {
    /// Creates an authorization request for the given client and redirect URI.
    pub fn new(client_id: impl Into<String>, redirect_uri: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
            scopes: Vec::new(),
            state: None,
            force_verify: false,
        }
    }

    /// Adds a scope.
    #[must_use]
    pub fn add_scope(mut self, scope: impl Into<String>) -> Self {
        self.scopes.push(scope.into());
        self
    }

    /// Adds multiple scopes.
    #[must_use]
    pub fn add_scopes(mut self, scopes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.scopes.extend(scopes.into_iter().map(Into::into));
        self
    }

    /// Sets the opaque `state` value echoed back on the redirect, used against CSRF.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Forces the provider to show the consent screen even if the user already authorized.
    #[must_use]
    pub fn with_force_verify(mut self, force_verify: bool) -> Self {
        self.force_verify = force_verify;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), TokenError> {
        if self.client_id.trim().is_empty() {
            return Err(TokenError::invalid_credentials("client_id is empty"));
        }
        validate_redirect_uri(&self.redirect_uri)
    }
}

fn validate_redirect_uri(redirect_uri: &str) -> Result<(), TokenError> {
    if redirect_uri.trim().is_empty() {
        return Err(TokenError::invalid_grant("redirect_uri is empty"));
    }
    Url::parse(redirect_uri).map_err(|err| {
        TokenError::invalid_grant(format!("redirect_uri '{redirect_uri}' is invalid: {err}"))
    })?;
    Ok(())
}
