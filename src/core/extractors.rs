//! Axum extractors for request bodies and bearer tokens
//!
//! Both extractors reject with an [`ApiError`] so failures render with the
//! same JSON shapes as every other error.

use axum::Json;
use axum::extract::{FromRef, FromRequest, FromRequestParts, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use serde_json::Value;
use std::sync::Arc;

use crate::core::error::{ApiError, AuthError, ValidationError};
use crate::core::token::{Claims, TokenIssuer};

/// JSON body extractor that reports malformed input as a validation error
///
/// Unlike `Json<Value>`, any rejection (wrong content type, syntax error, ...)
/// becomes a 400 `Invalid JSON` response.
#[derive(Debug, Clone)]
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(payload)) => Ok(JsonBody(payload)),
            Err(rejection) => Err(ValidationError::InvalidJson {
                message: rejection.body_text(),
            }
            .into()),
        }
    }
}

/// Verified claims taken from an `Authorization: Bearer <token>` header
#[derive(Debug, Clone)]
pub struct BearerAuth(pub Claims);

impl<S> FromRequestParts<S> for BearerAuth
where
    Arc<TokenIssuer>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let issuer = Arc::<TokenIssuer>::from_ref(state);

        let token = bearer_token(parts).ok_or(AuthError::MissingToken)?;

        match issuer.verify(token) {
            Ok(claims) => Ok(BearerAuth(claims)),
            Err(e) => {
                tracing::warn!(reason = %e, "Rejected bearer token");
                Err(e.into())
            }
        }
    }
}

/// Pull the token out of the Authorization header, if it uses the Bearer scheme
fn bearer_token(parts: &Parts) -> Option<&str> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
