#![allow(
    clippy::missing_errors_doc,
    dead_code,
    missing_docs,
    clippy::expect_used
)]
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

pub const TOKEN_PATH: &str = "/oauth2/token";
pub const HTML_PATH: &str = "/maintenance/token";
pub const SLOW_PATH: &str = "/slow/token";

pub const CLIENT_ID: &str = "test-client";
pub const CLIENT_SECRET: &str = "test-secret";
pub const VALID_CODE: &str = "valid-code";
pub const VALID_REFRESH_TOKEN: &str = "valid-refresh-token";

/// What the token endpoint received.
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub content_type: Option<String>,
    pub query: HashMap<String, String>,
    pub form: HashMap<String, String>,
}

#[derive(Debug, Clone, Default)]
struct ServerState {
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
}

/// A token endpoint answering like Twitch does, on an ephemeral port.
#[derive(Debug)]
pub struct TokenServer {
    addr: SocketAddr,
    state: ServerState,
    handle: JoinHandle<()>,
}

impl TokenServer {
    pub async fn start() -> anyhow::Result<Self> {
        let state = ServerState::default();
        let router = Router::new()
            .route(TOKEN_PATH, post(token))
            .route(HTML_PATH, post(maintenance))
            .route(SLOW_PATH, post(slow))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        info!(%addr, "launching token server");

        let handle = tokio::spawn(async move {
            if let Err(error) = axum::serve(listener, router).await {
                error!(?error, "token server failed");
            }
        });

        Ok(Self {
            addr,
            state,
            handle,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub fn received(&self) -> Vec<ReceivedRequest> {
        self.state.received.lock().expect("lock").clone()
    }
}

impl Drop for TokenServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn token(
    State(state): State<ServerState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, Json<Value>) {
    let form = url::form_urlencoded::parse(body.as_bytes())
        .into_owned()
        .collect::<HashMap<String, String>>();
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    state
        .received
        .lock()
        .expect("lock")
        .push(ReceivedRequest {
            content_type,
            query: query.clone(),
            form: form.clone(),
        });

    let mut params = query;
    params.extend(form);

    if param(&params, "client_id") != Some(CLIENT_ID)
        || param(&params, "client_secret") != Some(CLIENT_SECRET)
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "status": 400, "message": "invalid client secret" })),
        );
    }

    match param(&params, "grant_type") {
        Some("client_credentials") => (
            StatusCode::OK,
            Json(json!({
                "access_token": "app-token",
                "expires_in": 5_011_271,
                "token_type": "bearer"
            })),
        ),
        Some("authorization_code") if param(&params, "code") == Some(VALID_CODE) => (
            StatusCode::OK,
            Json(json!({
                "access_token": "user-token",
                "expires_in": 14124,
                "refresh_token": "next-refresh-token",
                "scope": ["chat:read", "chat:edit"],
                "token_type": "bearer"
            })),
        ),
        Some("refresh_token")
            if param(&params, "refresh_token") == Some(VALID_REFRESH_TOKEN) =>
        {
            (
                StatusCode::OK,
                Json(json!({
                    "access_token": "refreshed-token",
                    "refresh_token": "next-refresh-token",
                    "scope": "chat:read chat:edit",
                    "token_type": "bearer"
                })),
            )
        }
        Some("authorization_code" | "refresh_token") => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid authorization code"
            })),
        ),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "unsupported_grant_type" })),
        ),
    }
}

fn param<'a>(params: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    params.get(name).map(String::as_str)
}

async fn maintenance() -> (StatusCode, &'static str) {
    (StatusCode::OK, "<html>Down for maintenance</html>")
}

async fn slow() -> StatusCode {
    tokio::time::sleep(Duration::from_secs(5)).await;
    StatusCode::OK
}
