//! Officer API endpoints.

use crate::auth::middleware::{AdminSession, AppState};
use crate::error::AppError;
use crate::models::{new_id, MessageResponse, Officer, OfficerCreate, ID_LEN};
use crate::routes::{validate_id, AppJson};
use crate::storage;
use axum::{
    extract::{Path, State},
    Json,
};

/// GET /api/officers — All officers by display order
pub async fn list_officers(State(state): State<AppState>) -> Result<Json<Vec<Officer>>, AppError> {
    let officers = storage::officer::list_officers(state.store.as_ref()).await?;
    Ok(Json(officers))
}

/// POST /api/officers — Create officer
pub async fn create_officer(
    AdminSession { username }: AdminSession,
    State(state): State<AppState>,
    AppJson(req): AppJson<OfficerCreate>,
) -> Result<Json<Officer>, AppError> {
    let officer = Officer::with_id(new_id(), req);
    officer.validate()?;

    if !storage::officer::insert_officer(state.store.as_ref(), &officer).await? {
        return Err(AppError::Internal(format!(
            "Officer id collision: {}",
            officer.id
        )));
    }

    tracing::info!(action = "officer_created", officer_id = %officer.id, admin = %username, "Officer created");

    Ok(Json(officer))
}

/// PUT /api/officers/{id} — Replace officer
pub async fn update_officer(
    AdminSession { username }: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<OfficerCreate>,
) -> Result<Json<Officer>, AppError> {
    validate_id(&id, "officer ID", ID_LEN)?;

    let officer = Officer::with_id(id, req);
    officer.validate()?;

    if !storage::officer::replace_officer(state.store.as_ref(), &officer).await? {
        return Err(AppError::NotFound("Officer not found".to_string()));
    }

    tracing::info!(action = "officer_updated", officer_id = %officer.id, admin = %username, "Officer updated");

    Ok(Json(officer))
}

/// DELETE /api/officers/{id} — Delete officer
pub async fn delete_officer(
    AdminSession { username }: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    validate_id(&id, "officer ID", ID_LEN)?;

    if !storage::officer::delete_officer(state.store.as_ref(), &id).await? {
        return Err(AppError::NotFound("Officer not found".to_string()));
    }

    tracing::info!(action = "officer_deleted", officer_id = %id, admin = %username, "Officer deleted");

    Ok(Json(MessageResponse::new("Officer deleted successfully")))
}
