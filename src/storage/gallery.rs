//! Gallery image operations.
//!
//! Collection `gallery`, keyed by image id.

use super::{insert_doc, list_docs, DocumentStore, StoreError};
use crate::models::GalleryImage;

pub const COLLECTION: &str = "gallery";

pub async fn insert_image(store: &dyn DocumentStore, image: &GalleryImage) -> Result<bool, StoreError> {
    insert_doc(store, COLLECTION, &image.id, image).await
}

pub async fn delete_image(store: &dyn DocumentStore, id: &str) -> Result<bool, StoreError> {
    store.delete(COLLECTION, id).await
}

/// All images by ascending display order.
pub async fn list_images(store: &dyn DocumentStore) -> Result<Vec<GalleryImage>, StoreError> {
    let mut images: Vec<GalleryImage> = list_docs(store, COLLECTION).await?;
    images.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
    Ok(images)
}
