#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Duration;
use serde_json::Value;
use tokio::task::JoinHandle;
use tower::ServiceExt;

use cloud_notes_api::auth::{Identity, ManualClock, TokenCodec};
use cloud_notes_api::database::MemoryNoteStore;
use cloud_notes_api::AppState;

pub const TEST_SECRET: &[u8] = b"integration-test-signing-secret";

/// In-process app over an in-memory store, with a clock the test controls.
pub struct TestApp {
    pub router: Router,
    pub clock: Arc<ManualClock>,
    pub codec: Arc<TokenCodec>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_login_identity("demo")
    }

    pub fn with_login_identity(login: &str) -> Self {
        let clock = Arc::new(ManualClock::starting_now());
        let codec = TokenCodec::new(TEST_SECRET, Duration::hours(24), clock.clone())
            .expect("test codec");
        let state = AppState::new(
            codec,
            Arc::new(MemoryNoteStore::new()),
            Identity::new(login).expect("login identity"),
        );
        let codec = state.codec.clone();

        Self {
            router: cloud_notes_api::app(state),
            clock,
            codec,
        }
    }

    pub fn token_for(&self, who: &str) -> String {
        self.token_with_ttl(who, Duration::hours(1))
    }

    pub fn token_with_ttl(&self, who: &str, ttl: Duration) -> String {
        let identity = Identity::new(who).expect("identity");
        self.codec.issue(&identity, Some(ttl)).expect("issue token")
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON body")
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(&bearer(token)), None).await
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// The same app served over real TCP for client-level tests.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub app: TestApp,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let app = TestApp::new();
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        let router = app.router.clone();
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self {
            port,
            base_url,
            app,
            handle,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
