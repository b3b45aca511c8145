use std::fmt;

use crate::error::TokenError;
use crate::secure::SecureString;

/// OAuth2 client credentials issued by the provider.
///
/// The secret is never logged: `Debug` redacts it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    client_id: String,
    client_secret: SecureString,
}

impl Credentials {
    /// Creates new client credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<SecureString>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Returns the client id.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the client secret.
    pub fn client_secret(&self) -> &SecureString {
        &self.client_secret
    }

    pub(crate) fn validate(&self) -> Result<(), TokenError> {
        if self.client_id.trim().is_empty() {
            return Err(TokenError::invalid_credentials("client_id is empty"));
        }
        if self.client_secret.is_blank() {
            return Err(TokenError::invalid_credentials("client_secret is empty"));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}
