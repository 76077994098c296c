//! Event API endpoints.

use crate::auth::middleware::{AdminSession, AppState};
use crate::error::AppError;
use crate::models::{Event, EventCreate, EventUpdate, MessageResponse, ID_LEN};
use crate::routes::{validate_id, AppJson};
use crate::storage;
use axum::{
    extract::{Path, State},
    Json,
};

/// GET /api/events — All events, earliest date first
pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, AppError> {
    let events = storage::event::list_events(state.store.as_ref()).await?;
    Ok(Json(events))
}

/// POST /api/events — Create event
pub async fn create_event(
    AdminSession { username }: AdminSession,
    State(state): State<AppState>,
    AppJson(req): AppJson<EventCreate>,
) -> Result<Json<Event>, AppError> {
    let event = Event::new(req);
    event.validate()?;

    if !storage::event::insert_event(state.store.as_ref(), &event).await? {
        return Err(AppError::Internal(format!("Event id collision: {}", event.id)));
    }

    tracing::info!(action = "event_created", event_id = %event.id, admin = %username, "Event created");

    Ok(Json(event))
}

/// PUT /api/events/{id} — Update the fields present in the body
pub async fn update_event(
    AdminSession { username }: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(update): AppJson<EventUpdate>,
) -> Result<Json<Event>, AppError> {
    validate_id(&id, "event ID", ID_LEN)?;

    let mut event = storage::event::get_event(state.store.as_ref(), &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    event.apply(update);
    event.validate()?;

    // Deleted between read and write
    if !storage::event::replace_event(state.store.as_ref(), &event).await? {
        return Err(AppError::NotFound("Event not found".to_string()));
    }

    tracing::info!(action = "event_updated", event_id = %id, admin = %username, "Event updated");

    Ok(Json(event))
}

/// DELETE /api/events/{id} — Delete event
pub async fn delete_event(
    AdminSession { username }: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    validate_id(&id, "event ID", ID_LEN)?;

    if !storage::event::delete_event(state.store.as_ref(), &id).await? {
        return Err(AppError::NotFound("Event not found".to_string()));
    }

    tracing::info!(action = "event_deleted", event_id = %id, admin = %username, "Event deleted");

    Ok(Json(MessageResponse::new("Event deleted successfully")))
}
