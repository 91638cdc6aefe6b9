//! Per-resource request handling
//!
//! [`ResourceHandler`] is transport-agnostic: it takes a tagged
//! [`ResourceRequest`], validates and touches the record store, and answers
//! with a [`ResourceResponse`] or an [`ApiError`]. Each request is terminal
//! after one response.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use std::sync::Arc;

use crate::config::ResourceDefinition;
use crate::core::error::{ApiError, ResourceError};
use crate::core::record::Record;
use crate::core::store::RecordStore;
use crate::core::validation::Validator;

/// One inbound operation on a resource
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceRequest {
    List,
    Create { payload: Value },
    Retrieve { id: u64 },
    Update { id: u64, payload: Value },
    Delete { id: u64 },
}

impl ResourceRequest {
    pub fn operation(&self) -> &'static str {
        match self {
            ResourceRequest::List => "list",
            ResourceRequest::Create { .. } => "create",
            ResourceRequest::Retrieve { .. } => "retrieve",
            ResourceRequest::Update { .. } => "update",
            ResourceRequest::Delete { .. } => "delete",
        }
    }
}

/// Successful outcome of a [`ResourceRequest`]
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceResponse {
    Listed(Vec<Record>),
    Created(Record),
    Found(Record),
    Updated(Record),
    Deleted,
}

impl ResourceResponse {
    pub fn status(&self) -> StatusCode {
        match self {
            ResourceResponse::Listed(_) => StatusCode::OK,
            ResourceResponse::Created(_) => StatusCode::CREATED,
            ResourceResponse::Found(_) => StatusCode::OK,
            ResourceResponse::Updated(_) => StatusCode::OK,
            ResourceResponse::Deleted => StatusCode::NO_CONTENT,
        }
    }
}

impl IntoResponse for ResourceResponse {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ResourceResponse::Listed(records) => (status, Json(records)).into_response(),
            ResourceResponse::Created(record)
            | ResourceResponse::Found(record)
            | ResourceResponse::Updated(record) => (status, Json(record)).into_response(),
            ResourceResponse::Deleted => status.into_response(),
        }
    }
}

/// Validator + record store for one resource
pub struct ResourceHandler {
    definition: ResourceDefinition,
    validator: Validator,
    store: Arc<dyn RecordStore>,
}

impl ResourceHandler {
    pub fn new(definition: ResourceDefinition, store: Arc<dyn RecordStore>) -> Self {
        let validator = Validator::new(definition.fields.clone(), definition.error_mode());
        Self {
            definition,
            validator,
            store,
        }
    }

    pub fn definition(&self) -> &ResourceDefinition {
        &self.definition
    }

    pub fn plural(&self) -> &str {
        &self.definition.plural
    }

    /// Error returned for any id that does not resolve to a record
    pub fn not_found(&self) -> ApiError {
        ResourceError::NotFound {
            resource: self.definition.singular.clone(),
        }
        .into()
    }

    /// Parse an `{id}` path segment; anything but plain ASCII digits is "not found"
    pub fn parse_id(&self, raw: &str) -> Result<u64, ApiError> {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(self.not_found());
        }
        raw.parse::<u64>().map_err(|_| self.not_found())
    }

    /// Run one request to completion
    pub async fn handle(&self, request: ResourceRequest) -> Result<ResourceResponse, ApiError> {
        let operation = request.operation();
        let result = self.dispatch(request).await;

        match &result {
            Ok(response) => tracing::debug!(
                resource = %self.definition.plural,
                operation,
                status = response.status().as_u16(),
                "Handled resource request"
            ),
            Err(e) => tracing::warn!(
                resource = %self.definition.plural,
                operation,
                code = e.error_code(),
                "Resource request failed"
            ),
        }

        result
    }

    async fn dispatch(&self, request: ResourceRequest) -> Result<ResourceResponse, ApiError> {
        match request {
            ResourceRequest::List => Ok(ResourceResponse::Listed(self.store.list().await?)),

            ResourceRequest::Create { payload } => {
                let fields = self.validator.validate(&payload)?;
                let record = self.store.create(fields).await?;
                tracing::info!(resource = %self.definition.plural, id = record.id, "Created record");
                Ok(ResourceResponse::Created(record))
            }

            ResourceRequest::Retrieve { id } => self
                .store
                .get(id)
                .await?
                .map(ResourceResponse::Found)
                .ok_or_else(|| self.not_found()),

            ResourceRequest::Update { id, payload } => {
                let fields = self.validator.validate(&payload)?;
                let record = self
                    .store
                    .replace(id, fields)
                    .await?
                    .ok_or_else(|| self.not_found())?;
                tracing::info!(resource = %self.definition.plural, id, "Replaced record");
                Ok(ResourceResponse::Updated(record))
            }

            ResourceRequest::Delete { id } => {
                if self.store.delete(id).await? {
                    tracing::info!(resource = %self.definition.plural, id, "Deleted record");
                    Ok(ResourceResponse::Deleted)
                } else {
                    Err(self.not_found())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ValidationError;
    use crate::core::field::{FieldKind, FieldSpec, FieldValue};
    use crate::storage::InMemoryRecordStore;
    use serde_json::json;

    fn subscribers() -> ResourceHandler {
        let definition = ResourceDefinition::new(
            "user",
            "subscribers",
            vec![
                FieldSpec::required("name", FieldKind::String),
                FieldSpec::required("email", FieldKind::Email),
            ],
        );
        ResourceHandler::new(definition, Arc::new(InMemoryRecordStore::new()))
    }

    async fn create(handler: &ResourceHandler, name: &str) -> Record {
        let payload = json!({"name": name, "email": format!("{}@mail.com", name)});
        match handler.handle(ResourceRequest::Create { payload }).await.unwrap() {
            ResourceResponse::Created(record) => record,
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_then_retrieve() {
        let handler = subscribers();
        let created = create(&handler, "ada").await;

        let found = handler
            .handle(ResourceRequest::Retrieve { id: created.id })
            .await
            .unwrap();
        assert_eq!(found, ResourceResponse::Found(created));
    }

    #[tokio::test]
    async fn test_create_invalid_is_unprocessable() {
        let handler = subscribers();
        let err = handler
            .handle(ResourceRequest::Create {
                payload: json!({"name": "ada"}),
            })
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        match err {
            ApiError::Validation(ValidationError::FieldErrors(errors)) => {
                assert_eq!(errors["email"], "email is required");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_retrieve_missing_is_not_found() {
        let handler = subscribers();
        let err = handler
            .handle(ResourceRequest::Retrieve { id: 999 })
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_body(), json!({"Error": "User not found"}));
    }

    #[tokio::test]
    async fn test_list_returns_all() {
        let handler = subscribers();
        create(&handler, "a").await;
        create(&handler, "b").await;

        match handler.handle(ResourceRequest::List).await.unwrap() {
            ResourceResponse::Listed(records) => assert_eq!(records.len(), 2),
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let handler = subscribers();
        let created = create(&handler, "ada").await;

        let response = handler
            .handle(ResourceRequest::Update {
                id: created.id,
                payload: json!({"name": "grace", "email": "grace@mail.com"}),
            })
            .await
            .unwrap();

        let ResourceResponse::Updated(record) = response else {
            panic!("expected Updated");
        };
        assert_eq!(record.id, created.id);
        assert_eq!(record.field("name"), Some(&FieldValue::from("grace")));
    }

    #[tokio::test]
    async fn test_update_validates_before_lookup() {
        let handler = subscribers();
        let err = handler
            .handle(ResourceRequest::Update {
                id: 42,
                payload: json!({}),
            })
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let handler = subscribers();
        let err = handler
            .handle(ResourceRequest::Update {
                id: 42,
                payload: json!({"name": "x", "email": "x@mail.com"}),
            })
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_then_retrieve_is_not_found() {
        let handler = subscribers();
        let created = create(&handler, "ada").await;

        let deleted = handler
            .handle(ResourceRequest::Delete { id: created.id })
            .await
            .unwrap();
        assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

        let err = handler
            .handle(ResourceRequest::Retrieve { id: created.id })
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_parse_id() {
        let handler = subscribers();
        assert_eq!(handler.parse_id("12").unwrap(), 12);
        assert!(handler.parse_id("abc").is_err());
        assert!(handler.parse_id("-1").is_err());
        assert!(handler.parse_id("+1").is_err());
        assert!(handler.parse_id(" 1").is_err());
        assert!(handler.parse_id("").is_err());
        assert!(handler.parse_id("99999999999999999999").is_err());
    }

    #[test]
    fn test_operation_names() {
        assert_eq!(ResourceRequest::List.operation(), "list");
        assert_eq!(ResourceRequest::Delete { id: 1 }.operation(), "delete");
    }
}
