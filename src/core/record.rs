//! Stored records

use crate::core::field::FieldValue;
use crate::core::validation::Fields;
use serde::{Deserialize, Serialize};

/// A stored resource instance
///
/// Serializes flat, with the id first: `{"id": 4, "name": "...", "email": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,

    #[serde(flatten)]
    pub fields: Fields,
}

impl Record {
    pub fn new(id: u64, fields: Fields) -> Self {
        Self { id, fields }
    }

    /// Get a field value by name
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}
