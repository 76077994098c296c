//! API route handlers.

pub mod auth;
pub mod events;
pub mod gallery;
pub mod meta;
pub mod officers;

use crate::auth::middleware::AppState;
use crate::error::AppError;
use crate::middleware::{cors_layer, security_headers};
use axum::{
    extract::{DefaultBodyLimit, FromRequest, Request},
    routing::{delete, get, post, put},
    Json, Router,
};
use tower_http::trace::TraceLayer;

/// Validate that a string is a valid nanoid (alphanumeric, hyphens, underscores).
pub fn validate_id(id: &str, label: &str, expected_len: usize) -> Result<(), AppError> {
    if id.len() != expected_len
        || !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::BadRequest(format!("Invalid {} format", label)));
    }
    Ok(())
}

/// JSON body extractor whose rejections use the API's error shape.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = axum::extract::rejection::JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(AppJson(value))
    }
}

/// Build the API router with all endpoints.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api", get(meta::root))
        .route("/api/", get(meta::root))
        .route("/api/seed", post(meta::seed))
        // Auth endpoints
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/verify", get(auth::verify))
        // Events
        .route(
            "/api/events",
            get(events::list_events).post(events::create_event),
        )
        .route(
            "/api/events/{id}",
            put(events::update_event).delete(events::delete_event),
        )
        // Officers
        .route(
            "/api/officers",
            get(officers::list_officers).post(officers::create_officer),
        )
        .route(
            "/api/officers/{id}",
            put(officers::update_officer).delete(officers::delete_officer),
        )
        // Gallery
        .route(
            "/api/gallery",
            get(gallery::list_images).post(gallery::create_image),
        )
        .route("/api/gallery/{id}", delete(gallery::delete_image))
}

/// Full application: routes, state, and the HTTP middleware stack.
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    api_router()
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(security_headers))
        .with_state(state)
}
