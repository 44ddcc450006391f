//! Reusable test helpers for HTTP integration tests.
//!
//! Provides `TestApp` for building and sending requests through the full axum
//! router, plus session token minting for each role.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{self, header, Method, Request, Response};
use axum::Router;
use designos_server::api::{create_router, AppState};
use designos_server::auth::jwt;
use designos_server::config::Config;
use designos_server::permissions::PermissionResolver;
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

/// Full router over the `DesignOS` catalog with the test key pair.
pub struct TestApp {
    pub router: Router,
    pub config: Arc<Config>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(Config::default_for_test())
    }

    pub fn with_config(config: Config) -> Self {
        let resolver = PermissionResolver::designos().expect("DesignOS catalog is valid");
        Self::with_resolver(config, resolver)
    }

    /// Build the router over a custom tab catalog.
    pub fn with_resolver(config: Config, resolver: PermissionResolver) -> Self {
        let state = AppState::new(config.clone(), resolver);

        Self {
            router: create_router(state),
            config: Arc::new(config),
        }
    }

    /// Build an HTTP request with the given method and URI.
    pub fn request(method: Method, uri: &str) -> http::request::Builder {
        Request::builder().method(method).uri(uri)
    }

    /// GET `uri` with a bearer token for `role`.
    pub fn get_as(&self, role: &str, uri: &str) -> Request<Body> {
        Self::request(Method::GET, uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token_for(role)))
            .body(Body::empty())
            .unwrap()
    }

    /// GET `uri` with an already minted bearer token.
    pub fn get_with_token(token: &str, uri: &str) -> Request<Body> {
        Self::request(Method::GET, uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    /// GET `uri` without credentials.
    pub fn get_anonymous(uri: &str) -> Request<Body> {
        Self::request(Method::GET, uri).body(Body::empty()).unwrap()
    }

    /// Mint a session token for a fresh user holding `role`.
    pub fn token_for(&self, role: &str) -> String {
        generate_session_token(&self.config, role, self.config.jwt_access_expiry)
    }

    /// Send a request through the router via `tower::ServiceExt::oneshot`.
    pub async fn oneshot(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot request failed")
    }
}

/// Mint a session token with an explicit lifetime (negative for expired).
pub fn generate_session_token(config: &Config, role: &str, expiry_seconds: i64) -> String {
    let private_key = config
        .jwt_private_key
        .as_deref()
        .expect("test config carries a private key");
    jwt::generate_session_token(Uuid::now_v7(), role, private_key, expiry_seconds)
        .expect("Failed to generate session token")
}

/// Value of the `Location` header.
pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("response has a Location header")
        .to_str()
        .expect("Location is ASCII")
}

/// Collect a response body and parse it as JSON.
pub async fn body_to_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to collect response body")
        .to_bytes();
    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        let preview = String::from_utf8_lossy(&bytes);
        panic!("Failed to parse response as JSON: {e}\nBody: {preview}")
    })
}
