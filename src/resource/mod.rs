//! CRUD resources: request handling and HTTP endpoints

pub mod endpoints;
pub mod handler;

pub use endpoints::{ResourceState, build_resource_routes};
pub use handler::{ResourceHandler, ResourceRequest, ResourceResponse};
