//! # crudkit
//!
//! Declarative CRUD resources over HTTP, with field validation, an in-memory
//! record store and JWT bearer authentication.
//!
//! ## Features
//!
//! - **Configuration-Based**: Declare resources and their fields in YAML
//! - **Validation**: Type, presence, bounds and email checks with bundled or first-error reporting
//! - **Record Store**: Ordered in-memory store with monotonic integer ids
//! - **Generated Routes**: List/create/retrieve/update/delete per resource
//! - **Bearer Tokens**: HS256 tokens with expiration, a credentials endpoint and protected routes
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use crudkit::prelude::*;
//!
//! let config = AppConfig::from_yaml_str(r#"
//! resources:
//!   - singular: user
//!     plural: subscribers
//!     fields:
//!       - { name: name, kind: string, max: 64 }
//!       - { name: email, kind: email }
//! "#)?;
//!
//! ServerBuilder::new()
//!     .with_config(config)
//!     .serve("127.0.0.1:5000")
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod resource;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        auth::{AuthPolicy, Credentials, UserCredential},
        error::{ApiError, AuthError, ConfigError, ResourceError, StoreError, ValidationError},
        extractors::{BearerAuth, JsonBody},
        field::{FieldKind, FieldSpec, FieldValue},
        record::Record,
        store::RecordStore,
        token::{Claims, TokenIssuer},
        validation::{ErrorMode, FieldErrors, Fields, Validator, validate},
    };

    // === Resources ===
    pub use crate::resource::{ResourceHandler, ResourceRequest, ResourceResponse};

    // === Storage ===
    pub use crate::storage::InMemoryRecordStore;

    // === Config ===
    pub use crate::config::{AppConfig, AuthConfig, ResourceDefinition};

    // === Server ===
    pub use crate::server::{ResourceRegistry, ServerBuilder, ServerHost};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
}
