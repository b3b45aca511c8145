use http::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ProviderError, TokenError};
use crate::token::{DEFAULT_TOKEN_TYPE, TokenResult};

/// Response fields holding a live credential.
const SECRET_FIELDS: [&str; 3] = ["access_token", "refresh_token", "id_token"];

#[derive(Debug, Deserialize)]
struct TokenBody {
    access_token: Option<String>,
    token_type: Option<String>,
    expires_in: Option<u64>,
    refresh_token: Option<String>,
    scope: Option<ScopeField>,
}

/// `scope` is either a JSON array or a space-delimited string (RFC 6749 §5.1).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScopeField {
    List(Vec<String>),
    Delimited(String),
}

impl ScopeField {
    fn into_scopes(self) -> Vec<String> {
        match self {
            Self::List(scopes) => scopes,
            Self::Delimited(scope) => scope.split_whitespace().map(str::to_string).collect(),
        }
    }
}

/// Turns a token endpoint response into a token or a classified error.
pub(crate) fn parse_token_response(
    status: StatusCode,
    body: &[u8],
) -> Result<TokenResult, TokenError> {
    let status_code = status.as_u16();

    let value = serde_json::from_slice::<Value>(body)
        .map_err(|err| TokenError::malformed(status_code, format!("invalid JSON: {err}"), body))?;

    let has_error_field = value.get("error").is_some_and(|error| !error.is_null());
    if !status.is_success() || has_error_field {
        return Err(provider_error(status, &value).into());
    }

    let token_body: TokenBody = serde_path_to_error::deserialize(&value).map_err(|err| {
        let path = err.path().to_string();
        TokenError::malformed(
            status_code,
            format!("unexpected value at '{path}': {}", err.into_inner()),
            &redacted_body(&value),
        )
    })?;

    let TokenBody {
        access_token,
        token_type,
        expires_in,
        refresh_token,
        scope,
    } = token_body;

    let Some(access_token) = access_token.filter(|token| !token.is_empty()) else {
        return Err(TokenError::malformed(
            status_code,
            "missing access_token",
            &redacted_body(&value),
        ));
    };

    let token_type = token_type.unwrap_or_else(|| DEFAULT_TOKEN_TYPE.to_string());
    let mut token = TokenResult::new(access_token, token_type);
    if let Some(expires_in) = expires_in {
        token = token.with_expires_in_seconds(expires_in);
    }
    if let Some(refresh_token) = refresh_token {
        token = token.with_refresh_token(refresh_token);
    }
    if let Some(scope) = scope {
        token = token.with_scope(scope.into_scopes());
    }
    Ok(token)
}

fn provider_error(status: StatusCode, value: &Value) -> ProviderError {
    let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);

    let message = text("error_description").or_else(|| text("message"));

    // Bodies without an `error` code are keyed by the HTTP status
    let (code, message) = match text("error") {
        Some(code) => (code, message),
        None => (
            status.as_u16().to_string(),
            message.or_else(|| status.canonical_reason().map(str::to_string)),
        ),
    };

    ProviderError {
        status: status.as_u16(),
        code,
        message,
    }
}

/// Returns the body with credential values replaced, for error reports.
fn redacted_body(value: &Value) -> Vec<u8> {
    let mut value = value.clone();
    if let Some(object) = value.as_object_mut() {
        for field in SECRET_FIELDS {
            if let Some(secret) = object.get_mut(field).filter(|secret| !secret.is_null()) {
                *secret = Value::from("[REDACTED]");
            }
        }
    }
    serde_json::to_vec(&value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn should_parse_minimal_token_response() {
        let body = br#"{"access_token":"abc","token_type":"bearer","expires_in":3600}"#;

        let token = parse_token_response(StatusCode::OK, body).expect("valid token");

        assert_eq!(
            token,
            TokenResult::new("abc", "bearer").with_expires_in_seconds(3600)
        );
    }

    #[test]
    fn should_parse_full_token_response() {
        let body = br#"{
            "access_token": "abc",
            "token_type": "bearer",
            "expires_in": 14124,
            "refresh_token": "def",
            "scope": ["chat:read", "chat:edit"]
        }"#;

        let token = parse_token_response(StatusCode::OK, body).expect("valid token");

        assert_eq!(token.refresh_token(), Some("def"));
        assert_eq!(
            token.scope(),
            Some(["chat:read".to_string(), "chat:edit".to_string()].as_slice())
        );
    }

    #[test]
    fn should_parse_space_delimited_scope() {
        let body = br#"{"access_token":"abc","token_type":"bearer","scope":"chat:read  chat:edit"}"#;

        let token = parse_token_response(StatusCode::OK, body).expect("valid token");

        assert!(token.has_scope("chat:read"));
        assert!(token.has_scope("chat:edit"));
        assert_eq!(token.scope().map(<[String]>::len), Some(2));
    }

    #[test]
    fn should_default_token_type() {
        let body = br#"{"access_token":"abc"}"#;

        let token = parse_token_response(StatusCode::OK, body).expect("valid token");

        assert_eq!(token.token_type(), DEFAULT_TOKEN_TYPE);
        assert!(token.expires_in_seconds().is_none());
    }

    #[test]
    fn should_classify_rfc_error_as_provider_error() {
        let body = br#"{"error":"invalid_grant"}"#;

        let error = parse_token_response(StatusCode::BAD_REQUEST, body).expect_err("should fail");

        let provider = error.as_provider_error().expect("provider error");
        assert_eq!(provider.status, 400);
        assert_eq!(provider.code, "invalid_grant");
        assert!(provider.message.is_none());
        assert!(error.to_string().contains("invalid_grant"));
    }

    #[test]
    fn should_keep_error_description() {
        let body = br#"{"error":"invalid_client","error_description":"unknown client"}"#;

        let error = parse_token_response(StatusCode::UNAUTHORIZED, body).expect_err("should fail");

        insta::assert_snapshot!(
            error,
            @"Token endpoint rejected the request (401): invalid_client - unknown client"
        );
    }

    #[test]
    fn should_classify_legacy_error_body() {
        let body = br#"{"status":400,"message":"Invalid refresh token"}"#;

        let error = parse_token_response(StatusCode::BAD_REQUEST, body).expect_err("should fail");

        let provider = error.as_provider_error().expect("provider error");
        assert_eq!(provider.code, "400");
        assert_eq!(provider.message.as_deref(), Some("Invalid refresh token"));
    }

    #[test]
    fn should_reject_error_field_with_success_status() {
        let body = br#"{"access_token":"abc","error":"temporarily_unavailable"}"#;

        let error = parse_token_response(StatusCode::OK, body).expect_err("should fail");

        let provider = error.as_provider_error().expect("provider error");
        assert_eq!(provider.status, 200);
        assert_eq!(provider.code, "temporarily_unavailable");
    }

    #[test]
    fn should_use_status_reason_without_error_details() {
        let error = parse_token_response(StatusCode::SERVICE_UNAVAILABLE, b"{}")
            .expect_err("should fail");

        let provider = error.as_provider_error().expect("provider error");
        assert_eq!(provider.code, "503");
        assert_eq!(provider.message.as_deref(), Some("Service Unavailable"));
    }

    #[test]
    fn should_ignore_null_error_field() {
        let body = br#"{"access_token":"abc","token_type":"bearer","error":null}"#;

        let token = parse_token_response(StatusCode::OK, body).expect("valid token");

        assert_eq!(token.access_token(), "abc");
    }

    #[rstest]
    #[case::html(StatusCode::OK, "<html>gateway</html>")]
    #[case::empty(StatusCode::OK, "")]
    #[case::truncated(StatusCode::OK, r#"{"access_token":"ab"#)]
    #[case::error_status_html(StatusCode::BAD_GATEWAY, "Bad Gateway")]
    fn should_reject_non_json_body(#[case] status: StatusCode, #[case] body: &str) {
        let error = parse_token_response(status, body.as_bytes()).expect_err("should fail");

        match error {
            TokenError::MalformedResponse {
                status: status_code,
                reason,
                body: raw,
            } => {
                assert_eq!(status_code, status.as_u16());
                assert!(reason.starts_with("invalid JSON"));
                assert_eq!(raw, body);
            }
            other => panic!("Expected MalformedResponse, got {other:?}"),
        }
    }

    #[rstest]
    #[case::missing(r#"{"token_type":"bearer"}"#)]
    #[case::empty(r#"{"access_token":"","token_type":"bearer"}"#)]
    #[case::null(r#"{"access_token":null}"#)]
    fn should_reject_missing_access_token(#[case] body: &str) {
        let error = parse_token_response(StatusCode::OK, body.as_bytes()).expect_err("should fail");

        match error {
            TokenError::MalformedResponse { reason, .. } => {
                assert_eq!(reason, "missing access_token");
            }
            other => panic!("Expected MalformedResponse, got {other:?}"),
        }
    }

    #[test]
    fn should_report_path_of_unexpected_value() {
        let body = br#"{"access_token":"abc","expires_in":"soon"}"#;

        let error = parse_token_response(StatusCode::OK, body).expect_err("should fail");

        match error {
            TokenError::MalformedResponse { reason, .. } => {
                assert!(reason.starts_with("unexpected value at 'expires_in'"));
            }
            other => panic!("Expected MalformedResponse, got {other:?}"),
        }
    }

    #[rstest]
    #[case::wrong_expiry_type(
        r#"{"access_token":"live-access","refresh_token":"live-refresh","expires_in":"3600"}"#
    )]
    #[case::empty_token_with_refresh(r#"{"access_token":"","refresh_token":"live-refresh"}"#)]
    fn should_redact_tokens_in_malformed_response(#[case] body: &str) {
        let error = parse_token_response(StatusCode::OK, body.as_bytes()).expect_err("should fail");

        let message = error.to_string();
        assert!(!message.contains("live-access"));
        assert!(!message.contains("live-refresh"));
        match error {
            TokenError::MalformedResponse { body, .. } => {
                assert!(body.contains(r#""refresh_token":"[REDACTED]""#));
            }
            other => panic!("Expected MalformedResponse, got {other:?}"),
        }
    }

    #[test]
    fn should_keep_diagnostics_in_redacted_body() {
        let body = br#"{"access_token":"live-access","expires_in":"soon","token_type":"bearer"}"#;

        let error = parse_token_response(StatusCode::OK, body).expect_err("should fail");

        insta::assert_snapshot!(error, @r#"
        Malformed token response (status 200): unexpected value at 'expires_in': invalid type: string "soon", expected u64
        {"access_token":"[REDACTED]","expires_in":"soon","token_type":"bearer"}
        "#);
    }

    #[rstest]
    #[case::array("[]")]
    #[case::string(r#""token""#)]
    #[case::null("null")]
    fn should_reject_non_object_body(#[case] body: &str) {
        let error = parse_token_response(StatusCode::OK, body.as_bytes()).expect_err("should fail");
        assert!(matches!(error, TokenError::MalformedResponse { .. }));
    }
}
