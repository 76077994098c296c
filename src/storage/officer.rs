//! Officer operations.
//!
//! Collection `officers`, keyed by officer id.

use super::{insert_doc, list_docs, replace_doc, DocumentStore, StoreError};
use crate::models::Officer;

pub const COLLECTION: &str = "officers";

pub async fn insert_officer(store: &dyn DocumentStore, officer: &Officer) -> Result<bool, StoreError> {
    insert_doc(store, COLLECTION, &officer.id, officer).await
}

pub async fn replace_officer(
    store: &dyn DocumentStore,
    officer: &Officer,
) -> Result<bool, StoreError> {
    replace_doc(store, COLLECTION, &officer.id, officer).await
}

pub async fn delete_officer(store: &dyn DocumentStore, id: &str) -> Result<bool, StoreError> {
    store.delete(COLLECTION, id).await
}

/// All officers by ascending display order.
pub async fn list_officers(store: &dyn DocumentStore) -> Result<Vec<Officer>, StoreError> {
    let mut officers: Vec<Officer> = list_docs(store, COLLECTION).await?;
    officers.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
    Ok(officers)
}
