//! JSON-file document store

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use super::memory::{Collection, MemoryDocumentStore};
use super::{Document, DocumentStore, Fields, StoreError};

/// File extension for collection files
const COLLECTION_EXT: &str = "json";

/// Document store persisted as one pretty-printed JSON file per collection
///
/// All collections are loaded at open. Every mutation rewrites the touched
/// collection file through a temporary file and a rename, so a crash never
/// leaves a half-written collection behind.
pub struct JsonFileDocumentStore {
    dir: PathBuf,
    inner: MemoryDocumentStore,
    write_lock: Mutex<()>,
}

impl JsonFileDocumentStore {
    /// Open the store in `dir`, creating the directory if needed
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).await?;

        let mut collections = HashMap::new();
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(COLLECTION_EXT) {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let content = fs::read_to_string(&path).await?;
            let collection: Collection = serde_json::from_str(&content)?;
            debug!(collection = name, documents = collection.len(), "loaded collection");
            collections.insert(name.to_string(), collection);
        }

        Ok(Self {
            dir,
            inner: MemoryDocumentStore::with_collections(collections),
            write_lock: Mutex::new(()),
        })
    }

    /// Directory holding the collection files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn collection_path(&self, collection: &str) -> Result<PathBuf, StoreError> {
        let valid = !collection.is_empty()
            && collection
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::Backend(format!(
                "invalid collection name: {collection:?}"
            )));
        }
        Ok(self.dir.join(format!("{collection}.{COLLECTION_EXT}")))
    }

    async fn persist(&self, collection: &str) -> Result<(), StoreError> {
        let path = self.collection_path(collection)?;
        let snapshot = self.inner.snapshot(collection).await;
        let content = serde_json::to_string_pretty(&snapshot)?;

        let tmp = path.with_extension(format!("{COLLECTION_EXT}.tmp"));
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for JsonFileDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        self.inner.get(collection, id).await
    }

    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Document>, StoreError> {
        self.inner.query_eq(collection, field, value).await
    }

    async fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError> {
        self.collection_path(collection)?;
        let _guard = self.write_lock.lock().await;
        let id = self.inner.add(collection, fields).await?;
        self.persist(collection).await?;
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        self.collection_path(collection)?;
        let _guard = self.write_lock.lock().await;
        self.inner.set(collection, id, fields).await?;
        self.persist(collection).await
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError> {
        self.collection_path(collection)?;
        let _guard = self.write_lock.lock().await;
        self.inner.update(collection, id, fields).await?;
        self.persist(collection).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn empty_directory_opens_empty_store() {
        let temp_dir = tempdir().unwrap();
        let store = JsonFileDocumentStore::open(temp_dir.path()).await.unwrap();
        assert!(store.get("interviews", "x").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn documents_survive_reopen() {
        let temp_dir = tempdir().unwrap();

        let id = {
            let store = JsonFileDocumentStore::open(temp_dir.path()).await.unwrap();
            let id = store
                .add("interviews", fields(json!({"role": "sre", "status": "active"})))
                .await
                .unwrap();
            store
                .update("interviews", &id, fields(json!({"status": "completed"})))
                .await
                .unwrap();
            id
        };

        let store = JsonFileDocumentStore::open(temp_dir.path()).await.unwrap();
        let doc = store.get("interviews", &id).await.unwrap().unwrap();
        assert_eq!(doc.fields["role"], "sre");
        assert_eq!(doc.fields["status"], "completed");
    }

    #[tokio::test]
    async fn writes_one_file_per_collection() {
        let temp_dir = tempdir().unwrap();
        let store = JsonFileDocumentStore::open(temp_dir.path()).await.unwrap();
        store
            .set("users", "alice", fields(json!({"uid": "alice"})))
            .await
            .unwrap();
        store.add("interviews", Fields::new()).await.unwrap();

        assert!(temp_dir.path().join("users.json").exists());
        assert!(temp_dir.path().join("interviews.json").exists());
        assert!(!temp_dir.path().join("users.json.tmp").exists());
    }

    #[tokio::test]
    async fn creates_missing_directory() {
        let temp_dir = tempdir().unwrap();
        let nested = temp_dir.path().join("data").join("rehearse");
        let store = JsonFileDocumentStore::open(&nested).await.unwrap();
        store.add("interviews", Fields::new()).await.unwrap();
        assert!(nested.join("interviews.json").exists());
        assert_eq!(store.dir(), nested.as_path());
    }

    #[tokio::test]
    async fn rejects_path_like_collection_names() {
        let temp_dir = tempdir().unwrap();
        let store = JsonFileDocumentStore::open(temp_dir.path()).await.unwrap();
        let err = store.add("../escape", Fields::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[tokio::test]
    async fn malformed_collection_file_fails_open() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(temp_dir.path().join("interviews.json"), "{not json").unwrap();
        let result = JsonFileDocumentStore::open(temp_dir.path()).await;
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }

    #[tokio::test]
    async fn update_missing_document_leaves_no_file() {
        let temp_dir = tempdir().unwrap();
        let store = JsonFileDocumentStore::open(temp_dir.path()).await.unwrap();
        let err = store
            .update("interviews", "ghost", Fields::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert!(!temp_dir.path().join("interviews.json").exists());
    }
}
