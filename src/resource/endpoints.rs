//! HTTP handlers for resource operations
//!
//! These are thin adapters: each one turns the HTTP request into a
//! [`ResourceRequest`] and lets the [`ResourceHandler`] answer it.

use axum::{
    Router,
    extract::{Path, State},
    middleware,
    routing::get,
};
use std::sync::Arc;

use super::handler::{ResourceHandler, ResourceRequest, ResourceResponse};
use crate::core::auth::require_bearer;
use crate::core::error::ApiError;
use crate::core::extractors::JsonBody;
use crate::core::token::TokenIssuer;

/// State shared by the routes of one resource
#[derive(Clone)]
pub struct ResourceState {
    pub handler: Arc<ResourceHandler>,
}

/// GET /{plural}
pub async fn list_records(
    State(state): State<ResourceState>,
) -> Result<ResourceResponse, ApiError> {
    state.handler.handle(ResourceRequest::List).await
}

/// POST /{plural}
pub async fn create_record(
    State(state): State<ResourceState>,
    JsonBody(payload): JsonBody,
) -> Result<ResourceResponse, ApiError> {
    state
        .handler
        .handle(ResourceRequest::Create { payload })
        .await
}

/// GET /{plural}/{id}
pub async fn get_record(
    State(state): State<ResourceState>,
    Path(id): Path<String>,
) -> Result<ResourceResponse, ApiError> {
    let id = state.handler.parse_id(&id)?;
    state.handler.handle(ResourceRequest::Retrieve { id }).await
}

/// PUT /{plural}/{id}
pub async fn update_record(
    State(state): State<ResourceState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody,
) -> Result<ResourceResponse, ApiError> {
    let id = state.handler.parse_id(&id)?;
    state
        .handler
        .handle(ResourceRequest::Update { id, payload })
        .await
}

/// DELETE /{plural}/{id}
pub async fn delete_record(
    State(state): State<ResourceState>,
    Path(id): Path<String>,
) -> Result<ResourceResponse, ApiError> {
    let id = state.handler.parse_id(&id)?;
    state.handler.handle(ResourceRequest::Delete { id }).await
}

/// Build the routing table for one resource
///
/// - GET    /{plural}      → List
/// - POST   /{plural}      → Create
/// - GET    /{plural}/{id} → Retrieve
/// - PUT    /{plural}/{id} → Update
/// - DELETE /{plural}/{id} → Delete
///
/// Resources with an `authenticated` policy get every route behind the
/// bearer-token check.
pub fn build_resource_routes(handler: Arc<ResourceHandler>, issuer: Arc<TokenIssuer>) -> Router {
    let plural = handler.plural().to_string();
    let requires_token = handler.definition().auth.requires_token();
    let state = ResourceState { handler };

    let router = Router::new()
        .route(
            &format!("/{}", plural),
            get(list_records).post(create_record),
        )
        .route(
            &format!("/{}/{{id}}", plural),
            get(get_record).put(update_record).delete(delete_record),
        )
        .with_state(state);

    if requires_token {
        router.route_layer(middleware::from_fn_with_state(issuer, require_bearer))
    } else {
        router
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResourceDefinition;
    use crate::core::auth::AuthPolicy;
    use crate::core::field::{FieldKind, FieldSpec};
    use crate::storage::InMemoryRecordStore;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header::AUTHORIZATION};
    use chrono::Duration;
    use serde_json::Map;
    use tower::ServiceExt;

    fn notes(auth: AuthPolicy) -> Arc<ResourceHandler> {
        let definition = ResourceDefinition::new(
            "note",
            "notes",
            vec![FieldSpec::required("text", FieldKind::String)],
        )
        .with_auth(auth);
        Arc::new(ResourceHandler::new(
            definition,
            Arc::new(InMemoryRecordStore::new()),
        ))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_public_routes_answer() {
        let issuer = Arc::new(TokenIssuer::new("k"));
        let app = build_resource_routes(notes(AuthPolicy::Public), issuer);

        let response = app.oneshot(get("/notes")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_non_integer_id_is_not_found() {
        let issuer = Arc::new(TokenIssuer::new("k"));
        let app = build_resource_routes(notes(AuthPolicy::Public), issuer);

        let response = app.oneshot(get("/notes/-1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_authenticated_routes_need_token() {
        let issuer = Arc::new(TokenIssuer::new("k"));
        let app = build_resource_routes(notes(AuthPolicy::Authenticated), issuer.clone());

        let response = app.clone().oneshot(get("/notes")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let token = issuer.issue(Map::new(), Duration::seconds(30)).unwrap();
        let request = Request::builder()
            .uri("/notes")
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unrouted_method_is_rejected() {
        let issuer = Arc::new(TokenIssuer::new("k"));
        let app = build_resource_routes(notes(AuthPolicy::Public), issuer);

        let request = Request::builder()
            .method("PATCH")
            .uri("/notes/1")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
