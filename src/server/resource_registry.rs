//! Resource registry for managing resource handlers and generating CRUD routes

use axum::Router;
use indexmap::IndexMap;
use std::sync::Arc;

use crate::core::token::TokenIssuer;
use crate::resource::{ResourceHandler, build_resource_routes};

/// Registry for all resources in the application
///
/// Keyed by plural name, in registration order.
#[derive(Default)]
pub struct ResourceRegistry {
    handlers: IndexMap<String, Arc<ResourceHandler>>,
}

impl ResourceRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            handlers: IndexMap::new(),
        }
    }

    /// Register a resource handler
    ///
    /// The plural name is used as the key; registering it again replaces the
    /// previous handler.
    pub fn register(&mut self, handler: ResourceHandler) {
        let plural = handler.plural().to_string();
        self.handlers.insert(plural, Arc::new(handler));
    }

    /// Get the handler for a resource
    pub fn get(&self, plural: &str) -> Option<&Arc<ResourceHandler>> {
        self.handlers.get(plural)
    }

    /// Build a router with all registered resource routes
    pub fn build_routes(&self, issuer: Arc<TokenIssuer>) -> Router {
        let mut router = Router::new();

        for handler in self.handlers.values() {
            router = router.merge(build_resource_routes(handler.clone(), issuer.clone()));
        }

        router
    }

    /// Get all registered resource names
    pub fn resource_names(&self) -> Vec<&str> {
        self.handlers.keys().map(|s| s.as_str()).collect()
    }
}
