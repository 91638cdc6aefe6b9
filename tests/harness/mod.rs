//! Shared test infrastructure for HTTP-level tests.
//!
//! Builds `axum_test::TestServer`s from an `AppConfig` through the same
//! `ServerBuilder` path the binary uses.

#![allow(dead_code)]

use axum::http::{HeaderName, HeaderValue, header::AUTHORIZATION};
use axum_test::TestServer;
use crudkit::prelude::*;
use serde_json::{Value, json};

/// Server over the default demo configuration
pub fn default_server() -> TestServer {
    server_for(AppConfig::default_config())
}

/// Server over an arbitrary configuration
pub fn server_for(config: AppConfig) -> TestServer {
    let router = ServerBuilder::new()
        .with_config(config)
        .build()
        .expect("router should build");
    TestServer::new(router).expect("test server should start")
}

/// Configuration with one protected `notes` resource plus the demo users
pub fn protected_config() -> AppConfig {
    AppConfig::from_yaml_str(
        r#"
auth:
  secret: "test-secret"
  token_ttl_secs: 60
  users:
    - { username: ttg, password: password, identity: 667 }
resources:
  - singular: note
    plural: notes
    auth: authenticated
    fields:
      - { name: text, kind: string, max: 140 }
"#,
    )
    .expect("protected config should parse")
}

/// Log in through `POST /auth` and return the access token
pub async fn login(server: &TestServer) -> String {
    let response = server
        .post("/auth")
        .json(&json!({"username": "ttg", "password": "password"}))
        .await;
    let body: Value = response.json();
    body["access_token"]
        .as_str()
        .expect("login should return an access token")
        .to_string()
}

/// Authorization header carrying `token` with the Bearer scheme
pub fn bearer(token: &str) -> (HeaderName, HeaderValue) {
    (
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).expect("token is a valid header"),
    )
}
