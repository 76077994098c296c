//! Document storage for admins, events, officers and gallery images.
//!
//! Records are JSON documents keyed by `(collection, id)`. The
//! [`DocumentStore`] trait is the only seam the rest of the crate talks to;
//! [`RedisStore`] backs production and [`MemoryStore`] backs tests.

pub mod admin;
pub mod event;
pub mod gallery;
pub mod memory;
pub mod officer;
pub mod redis_store;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Async access to schema-less documents grouped by collection name.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a single document.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<String>, StoreError>;

    /// Insert a document only if `id` is not already taken.
    ///
    /// Returns `false` without writing when the id exists. The existence
    /// check and the write are a single atomic step.
    async fn insert(&self, collection: &str, id: &str, doc: &str) -> Result<bool, StoreError>;

    /// Overwrite an existing document. Returns `false` if `id` is absent.
    async fn replace(&self, collection: &str, id: &str, doc: &str) -> Result<bool, StoreError>;

    /// Remove a document. Returns `false` if `id` is absent.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError>;

    /// All documents in a collection, in no particular order.
    async fn list(&self, collection: &str) -> Result<Vec<String>, StoreError>;
}

pub async fn get_doc<T>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
) -> Result<Option<T>, StoreError>
where
    T: DeserializeOwned,
{
    match store.get(collection, id).await? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

pub async fn insert_doc<T>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
    doc: &T,
) -> Result<bool, StoreError>
where
    T: Serialize,
{
    let json = serde_json::to_string(doc)?;
    store.insert(collection, id, &json).await
}

pub async fn replace_doc<T>(
    store: &dyn DocumentStore,
    collection: &str,
    id: &str,
    doc: &T,
) -> Result<bool, StoreError>
where
    T: Serialize,
{
    let json = serde_json::to_string(doc)?;
    store.replace(collection, id, &json).await
}

/// Load and decode every document in a collection.
///
/// Documents that fail to decode are skipped and logged rather than failing
/// the whole listing.
pub async fn list_docs<T>(store: &dyn DocumentStore, collection: &str) -> Result<Vec<T>, StoreError>
where
    T: DeserializeOwned,
{
    let raw = store.list(collection).await?;
    let mut docs = Vec::with_capacity(raw.len());
    for json in raw {
        match serde_json::from_str::<T>(&json) {
            Ok(doc) => docs.push(doc),
            Err(e) => {
                tracing::warn!(collection = %collection, error = %e, "Skipping undecodable document");
            }
        }
    }
    Ok(docs)
}
