//! Property tests for validation and the resource handler

use crudkit::prelude::*;
use proptest::prelude::*;
use serde_json::{Value, json};
use std::sync::Arc;

fn tag_handler() -> ResourceHandler {
    let definition = ResourceDefinition::new(
        "tag",
        "tags",
        vec![
            FieldSpec::required("label", FieldKind::String).with_max(32),
            FieldSpec::optional("weight", FieldKind::Integer)
                .with_min(0)
                .with_default(1),
        ],
    );
    ResourceHandler::new(definition, Arc::new(InMemoryRecordStore::new()))
}

fn record_of(response: ResourceResponse) -> Record {
    match response {
        ResourceResponse::Created(record)
        | ResourceResponse::Found(record)
        | ResourceResponse::Updated(record) => record,
        other => panic!("expected a record, got {:?}", other),
    }
}

proptest! {
    #[test]
    fn created_records_read_back_unchanged(
        label in "[a-z]{1,32}",
        weight in 0i64..10_000,
    ) {
        let handler = tag_handler();
        tokio_test::block_on(async {
            let created = record_of(
                handler
                    .handle(ResourceRequest::Create {
                        payload: json!({"label": label, "weight": weight}),
                    })
                    .await
                    .unwrap(),
            );
            let found = record_of(
                handler
                    .handle(ResourceRequest::Retrieve { id: created.id })
                    .await
                    .unwrap(),
            );

            prop_assert_eq!(&found, &created);
            prop_assert_eq!(found.field("weight"), Some(&FieldValue::Integer(weight)));
            Ok(())
        })?;
    }

    #[test]
    fn deleted_records_are_gone(count in 1usize..8, victim in 0usize..8) {
        let handler = tag_handler();
        tokio_test::block_on(async {
            let mut ids = Vec::new();
            for i in 0..count {
                let record = record_of(
                    handler
                        .handle(ResourceRequest::Create {
                            payload: json!({"label": format!("t{}", i)}),
                        })
                        .await
                        .unwrap(),
                );
                ids.push(record.id);
            }
            let id = ids[victim % count];

            let deleted = handler.handle(ResourceRequest::Delete { id }).await.unwrap();
            prop_assert_eq!(deleted, ResourceResponse::Deleted);

            let missing = handler.handle(ResourceRequest::Retrieve { id }).await;
            prop_assert!(matches!(missing, Err(ApiError::Resource(_))));

            // Ids are never reused
            let next = record_of(
                handler
                    .handle(ResourceRequest::Create { payload: json!({"label": "late"}) })
                    .await
                    .unwrap(),
            );
            prop_assert!(!ids.contains(&next.id));
            Ok(())
        })?;
    }

    #[test]
    fn missing_required_field_is_always_rejected(
        weight in proptest::option::of(0i64..100),
        extra in "[a-z]{1,8}",
    ) {
        let specs = vec![
            FieldSpec::required("label", FieldKind::String),
            FieldSpec::optional("weight", FieldKind::Integer),
        ];
        let mut payload = serde_json::Map::new();
        if let Some(w) = weight {
            payload.insert("weight".into(), json!(w));
        }
        payload.insert(format!("x_{}", extra), json!(true));

        for mode in [ErrorMode::Bundle, ErrorMode::FirstError] {
            let errors = validate(&Value::Object(payload.clone()), &specs, mode).unwrap_err();
            prop_assert_eq!(errors.get("label").map(String::as_str), Some("label is required"));
        }
    }

    #[test]
    fn valid_payloads_keep_declared_fields_only(
        label in "[a-z]{1,32}",
        noise in proptest::collection::vec("[A-Z]{1,6}", 0..4),
    ) {
        let validator = Validator::new(
            vec![FieldSpec::required("label", FieldKind::String)],
            ErrorMode::Bundle,
        );
        let mut payload = serde_json::Map::new();
        payload.insert("label".into(), json!(&label));
        for key in &noise {
            payload.insert(key.clone(), json!(1));
        }

        let fields = validator.validate(&Value::Object(payload)).unwrap();

        prop_assert_eq!(fields.len(), 1);
        prop_assert_eq!(fields.get("label"), Some(&FieldValue::String(label)));
    }
}
