//! DocumentStore trait definition

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::StoreError;

/// Loosely typed document body
pub type Fields = Map<String, Value>;

/// A document together with its id
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

/// Minimal document database capability
///
/// Each call is atomic for the single document it touches. Nothing spans
/// calls: a read followed by an update can interleave with another writer,
/// so callers that need read-modify-write must serialize themselves.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document by id
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Every document whose `field` equals `value`
    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError>;

    /// Insert a document under a freshly assigned id and return the id
    async fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError>;

    /// Create or replace the document with the given id
    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Merge `fields` into an existing document
    ///
    /// Returns `StoreError::NotFound` if the document does not exist.
    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;
}
