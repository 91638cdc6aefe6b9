//! Core module containing fundamental traits and types

pub mod auth;
pub mod error;
pub mod extractors;
pub mod field;
pub mod record;
pub mod store;
pub mod token;
pub mod validation;

pub use auth::{AuthPolicy, Credentials, UserCredential};
pub use error::{ApiError, AuthError, ConfigError, ResourceError, StoreError, ValidationError};
pub use field::{FieldKind, FieldSpec, FieldValue};
pub use record::Record;
pub use store::RecordStore;
pub use token::{Claims, TokenIssuer};
pub use validation::{ErrorMode, FieldErrors, Fields, Validator};
