//! In-memory implementations of DataService and ObjectStorage for testing
//! and development

use crate::core::error::StorageError;
use crate::core::field::FieldValue;
use crate::core::query::{Page, RecordQuery};
use crate::core::{Data, DataService, ObjectStorage};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory record service
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
/// Soft-deleted records stay retrievable by id but are left out of
/// `list`, `search` and `query`.
#[derive(Clone)]
pub struct InMemoryDataService<T: Data> {
    records: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Data> InMemoryDataService<T> {
    /// Create a new empty service
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a service holding `records`
    pub fn with_records(records: impl IntoIterator<Item = T>) -> Self {
        let map = records.into_iter().map(|r| (r.id(), r)).collect();
        Self {
            records: Arc::new(RwLock::new(map)),
        }
    }

    fn live(&self) -> Result<Vec<T>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.values().filter(|r| !r.is_deleted()).cloned().collect())
    }
}

impl<T: Data> Default for InMemoryDataService<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Data> DataService<T> for InMemoryDataService<T> {
    async fn create(&self, entity: T) -> Result<T> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        if records.contains_key(&entity.id()) {
            return Err(anyhow!(
                "{} {} already exists",
                T::resource_name_singular(),
                entity.id()
            ));
        }
        records.insert(entity.id(), entity.clone());

        Ok(entity)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<T>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<T>> {
        self.live()
    }

    async fn update(&self, id: &Uuid, entity: T) -> Result<T> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        records
            .get_mut(id)
            .ok_or_else(|| anyhow!("{} {} not found", T::resource_name_singular(), id))?;

        records.insert(*id, entity.clone());

        Ok(entity)
    }

    async fn delete(&self, id: &Uuid) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        records.remove(id);

        Ok(())
    }

    async fn search(&self, field: &str, value: &str) -> Result<Vec<T>> {
        Ok(self
            .live()?
            .into_iter()
            .filter(|record| {
                record
                    .field_value(field)
                    .is_some_and(|v| field_text(&v).as_deref() == Some(value))
            })
            .collect())
    }

    async fn query(&self, query: &RecordQuery) -> Result<Page<T>> {
        Ok(query.apply(self.live()?))
    }
}

/// Text form of a field value for exact-match search
fn field_text(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::String(s) => Some(s.clone()),
        FieldValue::Integer(i) => Some(i.to_string()),
        FieldValue::Decimal(d) => Some(d.to_string()),
        FieldValue::Boolean(b) => Some(b.to_string()),
        FieldValue::Uuid(u) => Some(u.to_string()),
        FieldValue::Date(d) => Some(d.to_string()),
        FieldValue::DateTime(dt) => Some(dt.to_rfc3339()),
        FieldValue::Null => None,
    }
}

#[derive(Debug, Clone)]
struct StoredObject {
    bytes: Vec<u8>,
    content_type: String,
}

/// In-memory blob store
///
/// URLs are `{base_url}/{key}`; nothing is served from them.
#[derive(Clone)]
pub struct InMemoryObjectStorage {
    base_url: String,
    objects: Arc<RwLock<HashMap<String, StoredObject>>>,
}

impl InMemoryObjectStorage {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            objects: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Bytes and content type stored under `key`
    pub fn object(&self, key: &str) -> Result<Option<(Vec<u8>, String)>> {
        let objects = self
            .objects
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(objects
            .get(key)
            .map(|o| (o.bytes.clone(), o.content_type.clone())))
    }

    /// Keys currently stored, sorted
    pub fn keys(&self) -> Result<Vec<String>> {
        let objects = self
            .objects
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut keys: Vec<String> = objects.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

impl Default for InMemoryObjectStorage {
    fn default() -> Self {
        Self::new("memory://documents")
    }
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    async fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        if key.is_empty() {
            return Err(StorageError::UploadFailed {
                key: key.to_string(),
                message: "empty key".to_string(),
            }
            .into());
        }
        let mut objects = self
            .objects
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        objects.insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );

        Ok(())
    }

    async fn url(&self, key: &str) -> Result<String> {
        if !self.exists(key).await? {
            return Err(StorageError::NotFound {
                key: key.to_string(),
            }
            .into());
        }
        Ok(format!("{}/{}", self.base_url, key))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut objects = self
            .objects
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        objects.remove(key);

        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let objects = self
            .objects
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(objects.contains_key(key))
    }
}
