//! Event operations.
//!
//! Collection `events`, keyed by event id.

use super::{get_doc, insert_doc, list_docs, replace_doc, DocumentStore, StoreError};
use crate::models::Event;

pub const COLLECTION: &str = "events";

pub async fn insert_event(store: &dyn DocumentStore, event: &Event) -> Result<bool, StoreError> {
    insert_doc(store, COLLECTION, &event.id, event).await
}

pub async fn get_event(store: &dyn DocumentStore, id: &str) -> Result<Option<Event>, StoreError> {
    get_doc(store, COLLECTION, id).await
}

pub async fn replace_event(store: &dyn DocumentStore, event: &Event) -> Result<bool, StoreError> {
    replace_doc(store, COLLECTION, &event.id, event).await
}

pub async fn delete_event(store: &dyn DocumentStore, id: &str) -> Result<bool, StoreError> {
    store.delete(COLLECTION, id).await
}

/// All events, earliest date first.
///
/// Events on the same date keep creation order.
pub async fn list_events(store: &dyn DocumentStore) -> Result<Vec<Event>, StoreError> {
    let mut events: Vec<Event> = list_docs(store, COLLECTION).await?;
    events.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then(a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });
    Ok(events)
}
