//! Gallery API endpoints.

use crate::auth::middleware::{AdminSession, AppState};
use crate::error::AppError;
use crate::models::{GalleryImage, GalleryImageCreate, MessageResponse, ID_LEN};
use crate::routes::{validate_id, AppJson};
use crate::storage;
use axum::{
    extract::{Path, State},
    Json,
};

/// GET /api/gallery — All images by display order
pub async fn list_images(
    State(state): State<AppState>,
) -> Result<Json<Vec<GalleryImage>>, AppError> {
    let images = storage::gallery::list_images(state.store.as_ref()).await?;
    Ok(Json(images))
}

/// POST /api/gallery — Add image
pub async fn create_image(
    AdminSession { username }: AdminSession,
    State(state): State<AppState>,
    AppJson(req): AppJson<GalleryImageCreate>,
) -> Result<Json<GalleryImage>, AppError> {
    let image = GalleryImage::new(req);
    image.validate()?;

    if !storage::gallery::insert_image(state.store.as_ref(), &image).await? {
        return Err(AppError::Internal(format!("Image id collision: {}", image.id)));
    }

    tracing::info!(action = "image_created", image_id = %image.id, admin = %username, "Gallery image added");

    Ok(Json(image))
}

/// DELETE /api/gallery/{id} — Remove image
pub async fn delete_image(
    AdminSession { username }: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    validate_id(&id, "image ID", ID_LEN)?;

    if !storage::gallery::delete_image(state.store.as_ref(), &id).await? {
        return Err(AppError::NotFound("Image not found".to_string()));
    }

    tracing::info!(action = "image_deleted", image_id = %id, admin = %username, "Gallery image deleted");

    Ok(Json(MessageResponse::new("Image deleted successfully")))
}
