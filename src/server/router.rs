//! Router builder utilities for token routes

use axum::{
    Json, Router,
    extract::{FromRef, State},
    routing::{get, post},
};
use chrono::Duration;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::core::auth::Credentials;
use crate::core::error::{ApiError, AuthError};
use crate::core::extractors::{BearerAuth, JsonBody};
use crate::core::token::{Claims, TokenIssuer};
use crate::server::host::ServerHost;

/// State shared by the token routes
#[derive(Clone, FromRef)]
pub struct AuthState {
    pub issuer: Arc<TokenIssuer>,
    pub credentials: Arc<Credentials>,
    pub token_ttl: Duration,
}

impl AuthState {
    pub fn from_host(host: &ServerHost) -> Self {
        Self {
            issuer: host.issuer.clone(),
            credentials: host.credentials.clone(),
            token_ttl: host.token_ttl,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct TokenRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

/// POST /auth
///
/// Exchanges `{"username", "password"}` for `{"access_token": "<jwt>"}`.
pub async fn issue_token(
    State(state): State<AuthState>,
    JsonBody(body): JsonBody,
) -> Result<Json<Value>, ApiError> {
    let request: TokenRequest = serde_json::from_value(body).unwrap_or_default();

    let Some(identity) = state
        .credentials
        .verify(&request.username, &request.password)
    else {
        tracing::warn!(username = %request.username, "Rejected login");
        return Err(AuthError::InvalidCredentials.into());
    };

    let mut claims = Claims::new();
    claims.insert("identity".to_string(), Value::from(identity));
    let token = state.issuer.issue(claims, state.token_ttl)?;

    tracing::info!(identity, "Issued access token");
    Ok(Json(json!({ "access_token": token })))
}

/// GET /private
///
/// Echoes the identity of the bearer.
pub async fn private_identity(BearerAuth(claims): BearerAuth) -> Json<Value> {
    Json(json!({
        "user_id": claims.get("identity").cloned().unwrap_or(Value::Null)
    }))
}

/// Build token routes
///
/// - POST /auth    - Issue a token from credentials
/// - GET  /private - Protected identity echo
pub fn build_auth_routes(state: AuthState) -> Router {
    Router::new()
        .route("/auth", post(issue_token))
        .route("/private", get(private_identity))
        .with_state(state)
}
