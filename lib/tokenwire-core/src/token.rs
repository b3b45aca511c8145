//! Token returned by a successful exchange.

use std::fmt;
use std::time::Duration;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::secure::SecureString;

/// Token type assumed when the provider omits `token_type`.
pub const DEFAULT_TOKEN_TYPE: &str = "bearer";

/// The result of a successful token exchange.
///
/// The client keeps no copy: the value is owned by the caller.
/// Token values are zeroed on drop and redacted in `Debug`.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct TokenResult {
    access_token: String,
    #[zeroize(skip)]
    token_type: String,
    #[zeroize(skip)]
    expires_in_seconds: Option<u64>,
    refresh_token: Option<String>,
    #[zeroize(skip)]
    scope: Option<Vec<String>>,
}

impl TokenResult {
    /// Creates a token result.
    pub fn new(access_token: impl Into<String>, token_type: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: token_type.into(),
            expires_in_seconds: None,
            refresh_token: None,
            scope: None,
        }
    }

    /// Sets the token lifetime in seconds.
    #[must_use]
    pub fn with_expires_in_seconds(mut self, expires_in_seconds: u64) -> Self {
        self.expires_in_seconds = Some(expires_in_seconds);
        self
    }

    /// Sets the refresh token.
    #[must_use]
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Sets the granted scopes.
    #[must_use]
    pub fn with_scope(mut self, scope: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.scope = Some(scope.into_iter().map(Into::into).collect());
        self
    }

    /// Returns the access token value.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Returns the token type, usually `bearer`.
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Returns the token lifetime in seconds, if the provider sent one.
    pub fn expires_in_seconds(&self) -> Option<u64> {
        self.expires_in_seconds
    }

    /// Returns the token lifetime, if the provider sent one.
    pub fn expires_in(&self) -> Option<Duration> {
        self.expires_in_seconds.map(Duration::from_secs)
    }

    /// Returns the refresh token, if available.
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Returns the granted scopes, if the provider sent them.
    pub fn scope(&self) -> Option<&[String]> {
        self.scope.as_deref()
    }

    /// Returns `true` if the given scope was granted.
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scope
            .as_ref()
            .is_some_and(|scopes| scopes.iter().any(|granted| granted == scope))
    }

    /// Returns the `Authorization` header value for this token.
    ///
    /// A `bearer` token type is written `Bearer` as in RFC 6750.
    pub fn authorization_header(&self) -> SecureString {
        let scheme = if self.token_type.eq_ignore_ascii_case(DEFAULT_TOKEN_TYPE) {
            "Bearer"
        } else {
            self.token_type.as_str()
        };
        SecureString::new(format!("{scheme} {}", self.access_token))
    }
}

impl fmt::Debug for TokenResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResult")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in_seconds", &self.expires_in_seconds)
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("scope", &self.scope)
            .finish()
    }
}
