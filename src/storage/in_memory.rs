//! In-memory implementation of RecordStore

use crate::core::error::StoreError;
use crate::core::record::Record;
use crate::core::store::RecordStore;
use crate::core::validation::Fields;
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

#[derive(Debug)]
struct StoreState {
    records: Vec<Record>,
    next_id: u64,
}

/// In-memory record store
///
/// Lives for the process lifetime; nothing is persisted. Uses RwLock for
/// thread-safe access, and clones share the same records.
#[derive(Clone, Debug)]
pub struct InMemoryRecordStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryRecordStore {
    /// Create an empty store; the first id assigned is 1
    pub fn new() -> Self {
        Self::from_state(StoreState {
            records: Vec::new(),
            next_id: 1,
        })
    }

    /// Create a store pre-populated with `records`
    ///
    /// Ids assigned afterwards continue after the largest seeded id. Fails if
    /// a seeded id leaves no room for the next one.
    pub fn with_records(records: Vec<Record>) -> Result<Self, StoreError> {
        let next_id = match records.iter().map(|r| r.id).max() {
            Some(max) => max.checked_add(1).ok_or(StoreError::IdsExhausted)?,
            None => 1,
        };
        Ok(Self::from_state(StoreState { records, next_id }))
    }

    fn from_state(state: StoreState) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::Unavailable(format!("lock poisoned: {}", e))
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn list(&self) -> Result<Vec<Record>, StoreError> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.records.clone())
    }

    async fn get(&self, id: u64) -> Result<Option<Record>, StoreError> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.records.iter().find(|r| r.id == id).cloned())
    }

    async fn create(&self, fields: Fields) -> Result<Record, StoreError> {
        let mut state = self.state.write().map_err(poisoned)?;

        let id = state.next_id;
        state.next_id = id.checked_add(1).ok_or(StoreError::IdsExhausted)?;

        let record = Record::new(id, fields);
        state.records.push(record.clone());

        Ok(record)
    }

    async fn replace(&self, id: u64, fields: Fields) -> Result<Option<Record>, StoreError> {
        let mut state = self.state.write().map_err(poisoned)?;

        let Some(index) = state.records.iter().position(|r| r.id == id) else {
            return Ok(None);
        };

        state.records.remove(index);
        let record = Record::new(id, fields);
        state.records.push(record.clone());

        Ok(Some(record))
    }

    async fn delete(&self, id: u64) -> Result<bool, StoreError> {
        let mut state = self.state.write().map_err(poisoned)?;

        let before = state.records.len();
        state.records.retain(|r| r.id != id);

        Ok(state.records.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::FieldValue;

    fn fields(name: &str) -> Fields {
        let mut fields = Fields::new();
        fields.insert("name".into(), FieldValue::from(name));
        fields
    }

    #[tokio::test]
    async fn test_create_assigns_monotonic_ids() {
        let store = InMemoryRecordStore::new();

        let a = store.create(fields("a")).await.unwrap();
        let b = store.create(fields("b")).await.unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn test_ids_continue_after_seed() {
        let store = InMemoryRecordStore::with_records(vec![
            Record::new(1, fields("one")),
            Record::new(3, fields("three")),
        ])
        .unwrap();

        let created = store.create(fields("next")).await.unwrap();
        assert_eq!(created.id, 4);
    }

    #[test]
    fn test_seed_at_max_id_is_rejected() {
        let result = InMemoryRecordStore::with_records(vec![Record::new(u64::MAX, fields("x"))]);
        assert!(matches!(result, Err(StoreError::IdsExhausted)));
    }

    #[tokio::test]
    async fn test_create_fails_once_ids_run_out() {
        let store =
            InMemoryRecordStore::with_records(vec![Record::new(u64::MAX - 1, fields("last"))])
                .unwrap();

        let result = store.create(fields("overflow")).await;
        assert!(matches!(result, Err(StoreError::IdsExhausted)));

        // The seeded record is the only one, and its id was not handed out again
        let records = store.list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, u64::MAX - 1);
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let store = InMemoryRecordStore::new();
        let a = store.create(fields("a")).await.unwrap();
        assert!(store.delete(a.id).await.unwrap());

        let b = store.create(fields("b")).await.unwrap();
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn test_get_record() {
        let store = InMemoryRecordStore::new();
        let created = store.create(fields("a")).await.unwrap();

        assert_eq!(store.get(created.id).await.unwrap(), Some(created));
        assert_eq!(store.get(999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let store = InMemoryRecordStore::new();
        for name in ["a", "b", "c"] {
            store.create(fields(name)).await.unwrap();
        }

        let ids: Vec<u64> = store.list().await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_replace_moves_record_to_end() {
        let store = InMemoryRecordStore::new();
        for name in ["a", "b", "c"] {
            store.create(fields(name)).await.unwrap();
        }

        let replaced = store.replace(1, fields("a2")).await.unwrap().unwrap();
        assert_eq!(replaced.id, 1);
        assert_eq!(replaced.field("name"), Some(&FieldValue::from("a2")));

        let ids: Vec<u64> = store.list().await.unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn test_replace_missing_returns_none() {
        let store = InMemoryRecordStore::new();
        assert_eq!(store.replace(7, fields("x")).await.unwrap(), None);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_record() {
        let store = InMemoryRecordStore::new();
        let created = store.create(fields("a")).await.unwrap();

        assert!(store.delete(created.id).await.unwrap());
        assert!(!store.delete(created.id).await.unwrap());
        assert_eq!(store.get(created.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clones_share_records() {
        let store = InMemoryRecordStore::new();
        let clone = store.clone();
        clone.create(fields("a")).await.unwrap();

        assert_eq!(store.list().await.unwrap().len(), 1);
    }
}
