//! REST API exposure
//!
//! Consumes a `ServerHost` and produces the Axum `Router`: health and hello
//! routes, token routes, every resource's CRUD routes, and any custom routes.

use super::super::host::ServerHost;
use crate::server::router::{AuthState, build_auth_routes};
use anyhow::Result;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// REST API exposure implementation
pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from a host
    ///
    /// When the configuration sets `api_prefix`, every route is nested under it.
    pub fn build_router(host: Arc<ServerHost>, custom_routes: Vec<Router>) -> Result<Router> {
        let health_routes = Self::health_routes();
        let auth_routes = build_auth_routes(AuthState::from_host(&host));
        let resource_routes = host.resource_registry.build_routes(host.issuer.clone());

        let mut app = health_routes.merge(auth_routes).merge(resource_routes);

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        let prefix = host
            .config
            .api_prefix
            .as_deref()
            .map(|p| p.trim_matches('/'))
            .filter(|p| !p.is_empty());
        if let Some(prefix) = prefix {
            app = Router::new().nest(&format!("/{}", prefix), app);
        }

        Ok(app.layer(TraceLayer::new_for_http()))
    }

    /// Build health check and hello routes
    fn health_routes() -> Router {
        Router::new()
            .route("/", get(Self::hello))
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    /// Health check endpoint handler
    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "crudkit"
        }))
    }

    async fn hello() -> Json<Value> {
        Json(json!({ "hello": "world" }))
    }
}
