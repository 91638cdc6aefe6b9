//! Typed error handling for crudkit
//!
//! Every failure a request can hit is a variant of [`ApiError`]. Each category
//! knows its HTTP status and a stable error code, and renders itself as a JSON
//! body through [`IntoResponse`].
//!
//! # Error Categories
//!
//! - [`ResourceError`]: the addressed record does not exist
//! - [`ValidationError`]: the payload failed field validation or is not JSON
//! - [`AuthError`]: token or credential failures
//! - [`StoreError`]: the record store could not be accessed
//!
//! [`ConfigError`] is raised while loading configuration, before any request
//! is served, and reaches callers through `anyhow`.
//!
//! # Example
//!
//! ```rust,ignore
//! match handler.handle(ResourceRequest::Retrieve { id: 999 }).await {
//!     Ok(response) => println!("{:?}", response),
//!     Err(ApiError::Resource(ResourceError::NotFound { resource })) => {
//!         println!("no such {}", resource);
//!     }
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! ```

use crate::core::validation::FieldErrors;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use std::fmt;

/// The main error type returned by handlers
#[derive(Debug)]
pub enum ApiError {
    /// Record lookups that came back empty
    Resource(ResourceError),

    /// Payload validation failures
    Validation(ValidationError),

    /// Token and credential failures
    Auth(AuthError),

    /// Record store failures
    Store(StoreError),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Resource(e) => write!(f, "{}", e),
            ApiError::Validation(e) => write!(f, "{}", e),
            ApiError::Auth(e) => write!(f, "{}", e),
            ApiError::Store(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Resource(e) => Some(e),
            ApiError::Validation(e) => Some(e),
            ApiError::Auth(e) => Some(e),
            ApiError::Store(e) => Some(e),
        }
    }
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Resource(e) => e.status_code(),
            ApiError::Validation(e) => e.status_code(),
            ApiError::Auth(e) => e.status_code(),
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Resource(e) => e.error_code(),
            ApiError::Validation(e) => e.error_code(),
            ApiError::Auth(e) => e.error_code(),
            ApiError::Store(_) => "STORE_ERROR",
        }
    }

    /// JSON body sent to the client
    pub fn to_body(&self) -> Value {
        match self {
            ApiError::Resource(e) => json!({ "Error": e.to_string() }),
            ApiError::Validation(ValidationError::FieldErrors(errors)) => json!({
                "error": "Validation failed",
                "errors": errors
            }),
            ApiError::Validation(ValidationError::InvalidJson { message }) => json!({
                "error": "Invalid JSON",
                "details": message
            }),
            ApiError::Auth(AuthError::InvalidCredentials) => json!({
                "error": "Invalid credentials"
            }),
            ApiError::Auth(AuthError::Signing(_)) => json!({
                "error": "Failed to issue token"
            }),
            ApiError::Auth(e) => json!({
                "error": "Unauthorized",
                "details": e.to_string()
            }),
            ApiError::Store(e) => json!({ "error": e.to_string() }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "{}", self);
        }
        (status, Json(self.to_body())).into_response()
    }
}

// =============================================================================
// Resource Errors
// =============================================================================

/// Errors related to addressing a record
#[derive(Debug)]
pub enum ResourceError {
    /// No record with the requested id; `resource` is the singular name
    NotFound { resource: String },
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::NotFound { resource } => {
                write!(f, "{} not found", capitalize(resource))
            }
        }
    }
}

impl std::error::Error for ResourceError {}

impl ResourceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ResourceError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ResourceError::NotFound { .. } => "RESOURCE_NOT_FOUND",
        }
    }
}

impl From<ResourceError> for ApiError {
    fn from(err: ResourceError) -> Self {
        ApiError::Resource(err)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug)]
pub enum ValidationError {
    /// One message per failing field
    FieldErrors(FieldErrors),

    /// Body is missing or is not valid JSON
    InvalidJson { message: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|(field, message)| format!("{}: {}", field, message))
                    .collect();
                write!(f, "Validation errors: {}", msgs.join(", "))
            }
            ValidationError::InvalidJson { message } => {
                write!(f, "Invalid JSON: {}", message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ValidationError::FieldErrors(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ValidationError::InvalidJson { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::FieldErrors(_) => "VALIDATION_ERROR",
            ValidationError::InvalidJson { .. } => "INVALID_JSON",
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(ValidationError::FieldErrors(errors))
    }
}

// =============================================================================
// Auth Errors
// =============================================================================

/// Token and credential failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("token signature is invalid")]
    SignatureInvalid,

    #[error("token has expired")]
    Expired,

    #[error("token is malformed")]
    Malformed,

    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::SignatureInvalid => "TOKEN_SIGNATURE_INVALID",
            AuthError::Expired => "TOKEN_EXPIRED",
            AuthError::Malformed => "TOKEN_MALFORMED",
            AuthError::MissingToken => "TOKEN_MISSING",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::Signing(_) => "TOKEN_SIGNING_FAILED",
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err)
    }
}

// =============================================================================
// Store Errors
// =============================================================================

/// Record store failures
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),

    #[error("record store has no ids left to assign")]
    IdsExhausted,
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Configuration problems detected while loading or validating an `AppConfig`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("resource name must not be empty")]
    EmptyName,

    #[error("resource '{plural}' collides with a built-in route")]
    ReservedName { plural: String },

    #[error("resource '{plural}' must be a single path segment of [A-Za-z0-9_-]")]
    InvalidName { plural: String },

    #[error("token_ttl_secs must be between 1 and {max}, got {secs}")]
    InvalidTokenTtl { secs: i64, max: i64 },

    #[error("resource '{plural}' is declared more than once")]
    DuplicateResource { plural: String },

    #[error("field '{field}' is declared more than once in '{resource}'")]
    DuplicateField { resource: String, field: String },

    #[error("default for '{resource}.{field}' does not satisfy the field's constraints")]
    InvalidDefault { resource: String, field: String },

    #[error("seed record for '{resource}' is invalid: {message}")]
    InvalidSeed { resource: String, message: String },

    #[error("seed id {id} is used more than once in '{resource}'")]
    DuplicateSeedId { resource: String, id: u64 },
}
