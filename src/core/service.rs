//! Collaborator traits for record access and object storage
//!
//! The hosted database and blob store stay external. The workflow only
//! talks to them through these traits.

use crate::core::Data;
use crate::core::query::{Page, RecordQuery};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Service trait for managing records of one collection
///
/// Implementations provide CRUD operations for a specific record type.
/// The desk is agnostic to the underlying storage mechanism.
#[async_trait]
pub trait DataService<T: Data>: Send + Sync {
    /// Insert a new record
    async fn create(&self, entity: T) -> Result<T>;

    /// Get a record by ID
    async fn get(&self, id: &Uuid) -> Result<Option<T>>;

    /// List all live records
    async fn list(&self) -> Result<Vec<T>>;

    /// Update an existing record
    async fn update(&self, id: &Uuid, entity: T) -> Result<T>;

    /// Delete a record
    async fn delete(&self, id: &Uuid) -> Result<()>;

    /// Search live records by exact field value
    async fn search(&self, field: &str, value: &str) -> Result<Vec<T>>;

    /// Filter, order and paginate live records
    async fn query(&self, query: &RecordQuery) -> Result<Page<T>>;
}

/// Blob store holding rendered order documents
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `bytes` under `key`, replacing any previous object
    async fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<()>;

    /// Retrieval URL for the object stored under `key`
    async fn url(&self, key: &str) -> Result<String>;

    /// Remove the object stored under `key`
    async fn delete(&self, key: &str) -> Result<()>;

    /// Whether an object is stored under `key`
    async fn exists(&self, key: &str) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Customer;

    // The traits compile and can be used in generic contexts
    #[allow(dead_code)]
    async fn generic_create<T, S>(service: &S, entity: T) -> Result<T>
    where
        T: Data,
        S: DataService<T>,
    {
        service.create(entity).await
    }

    #[allow(dead_code)]
    fn object_safe(_: &dyn DataService<Customer>, _: &dyn ObjectStorage) {}

    #[test]
    fn test_traits_compile() {}
}
