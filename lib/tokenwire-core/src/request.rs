use std::fmt;

use http::Method;
use url::Url;

use crate::config::{EndpointConfig, ParameterPlacement};
use crate::credentials::Credentials;
use crate::grant::GrantRequest;
use crate::secure::SecureString;

/// Parameters whose value must never appear in logs.
const SENSITIVE_FIELDS: [&str; 3] = ["client_secret", "code", "refresh_token"];

/// A single token request parameter.
#[derive(Clone, PartialEq, Eq)]
pub struct FormField {
    name: &'static str,
    value: SecureString,
}

impl FormField {
    fn new(name: &'static str, value: impl Into<SecureString>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }

    /// Returns the parameter name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the parameter value.
    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    /// Returns `true` if the value is a secret.
    pub fn is_sensitive(&self) -> bool {
        SENSITIVE_FIELDS.contains(&self.name)
    }
}

impl fmt::Debug for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.is_sensitive() {
            "[REDACTED]"
        } else {
            self.value.as_str()
        };
        write!(f, "{}={value:?}", self.name)
    }
}

/// The wire request for one token exchange.
///
/// Built from the endpoint configuration, the credentials and the grant.
/// A [`Transport`](crate::Transport) sends it as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRequest {
    method: Method,
    url: Url,
    form_fields: Vec<FormField>,
    placement: ParameterPlacement,
}

impl TokenRequest {
    pub(crate) fn build(
        config: &EndpointConfig,
        credentials: &Credentials,
        grant: &GrantRequest,
    ) -> Self {
        let mut form_fields = vec![
            FormField::new("client_id", credentials.client_id()),
            FormField::new("client_secret", credentials.client_secret().clone()),
            FormField::new("grant_type", grant.grant_type().as_str()),
        ];

        match grant {
            GrantRequest::ClientCredentials { scope } => {
                if !scope.trim().is_empty() {
                    form_fields.push(FormField::new("scope", scope.as_str()));
                }
            }
            GrantRequest::AuthorizationCode { code, redirect_uri } => {
                form_fields.push(FormField::new("code", code.clone()));
                form_fields.push(FormField::new("redirect_uri", redirect_uri.as_str()));
            }
            GrantRequest::RefreshToken { refresh_token } => {
                form_fields.push(FormField::new("refresh_token", refresh_token.clone()));
            }
        }

        Self {
            method: Method::POST,
            url: config.token_url().clone(),
            form_fields,
            placement: config.placement(),
        }
    }

    /// Returns the HTTP method, always `POST`.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the token endpoint URL, without the parameters.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the request parameters.
    pub fn form_fields(&self) -> &[FormField] {
        &self.form_fields
    }

    /// Returns the value of the named parameter.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.form_fields
            .iter()
            .find(|field| field.name == name)
            .map(FormField::value)
    }

    /// Returns where the parameters are sent.
    pub fn placement(&self) -> ParameterPlacement {
        self.placement
    }

    /// Returns the URL to send the request to.
    ///
    /// With [`ParameterPlacement::QueryString`] the parameters are appended to the query.
    pub fn target_url(&self) -> Url {
        let mut url = self.url.clone();
        if self.placement == ParameterPlacement::QueryString {
            url.query_pairs_mut()
                .extend_pairs(self.form_fields.iter().map(|field| (field.name, field.value())));
        }
        url
    }

    /// Returns the `application/x-www-form-urlencoded` body.
    ///
    /// Returns `None` with [`ParameterPlacement::QueryString`].
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters cannot be encoded.
    pub fn form_body(&self) -> Result<Option<String>, serde_urlencoded::ser::Error> {
        if self.placement != ParameterPlacement::FormBody {
            return Ok(None);
        }
        let pairs = self
            .form_fields
            .iter()
            .map(|field| (field.name, field.value()))
            .collect::<Vec<_>>();
        serde_urlencoded::to_string(pairs).map(Some)
    }
}
