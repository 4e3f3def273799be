//! Document store error types

use thiserror::Error;

/// Errors that can occur while reading or writing documents
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced document does not exist
    #[error("document {collection}/{id} not found")]
    NotFound { collection: String, id: String },

    /// A stored document is missing fields or holds malformed values
    #[error("corrupted document {collection}/{id}: {reason}")]
    DataCorruption {
        collection: String,
        id: String,
        reason: String,
    },

    /// JSON encoding or decoding failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem access failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other backend failure
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub(crate) fn corruption(
        collection: impl Into<String>,
        id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        StoreError::DataCorruption {
            collection: collection.into(),
            id: id.into(),
            reason: reason.into(),
        }
    }
}
