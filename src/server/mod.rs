//! Server module for building HTTP servers with auto-registered routes
//!
//! This module provides a `ServerBuilder` that registers:
//! - CRUD routes for every configured resource
//! - Token routes (`/auth`, `/private`)
//! - Health and hello routes

pub mod builder;
pub mod exposure;
pub mod host;
pub mod resource_registry;
pub mod router;

pub use builder::ServerBuilder;
pub use host::ServerHost;
pub use resource_registry::ResourceRegistry;
