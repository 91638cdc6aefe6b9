//! Record store trait

use crate::core::error::StoreError;
use crate::core::record::Record;
use crate::core::validation::Fields;
use async_trait::async_trait;

/// Ordered collection of records keyed by integer id
///
/// Implementations assign ids on create and keep them unique within the store.
/// Fields handed to the store are already validated.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records, in store order
    async fn list(&self) -> Result<Vec<Record>, StoreError>;

    /// Get a record by id
    async fn get(&self, id: u64) -> Result<Option<Record>, StoreError>;

    /// Append a record with a newly assigned id
    async fn create(&self, fields: Fields) -> Result<Record, StoreError>;

    /// Replace a record's fields entirely
    ///
    /// The previous record is removed and the replacement, keeping the same id,
    /// is appended at the end of the store order. Returns `None` if no record
    /// has that id.
    async fn replace(&self, id: u64, fields: Fields) -> Result<Option<Record>, StoreError>;

    /// Delete a record, returning whether one was removed
    async fn delete(&self, id: u64) -> Result<bool, StoreError>;
}
