//! Service info and seeding endpoints.

use crate::models::{ApiInfo, MessageResponse};
use axum::Json;

/// GET /api/ — Service name and version
pub async fn root() -> Json<ApiInfo> {
    Json(ApiInfo {
        message: "GSA API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /api/seed — Placeholder, writes nothing
pub async fn seed() -> Json<MessageResponse> {
    tracing::info!(action = "seed_requested", "Seed requested (no-op)");
    Json(MessageResponse::new("Database seeded successfully"))
}
