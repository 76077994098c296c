//! Axum extractors for authentication.

use crate::auth::token::TokenIssuer;
use crate::config::Config;
use crate::error::AppError;
use crate::storage::DocumentStore;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;

/// The single message returned for every bearer-token failure.
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired token";

/// Application state shared across handlers.
///
/// Built once at startup and dropped at shutdown.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub tokens: Arc<TokenIssuer>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, config: Config) -> Self {
        let tokens = TokenIssuer::new(config.jwt_secret.as_bytes(), config.token_ttl_secs);
        Self {
            store,
            tokens: Arc::new(tokens),
            config: Arc::new(config),
        }
    }
}

/// Authenticated admin extractor.
///
/// Extracts and verifies the token from the `Authorization: Bearer {token}`
/// header. Returns 401 Unauthorized if missing or invalid, before the
/// handler body (or its JSON body extractor) runs.
#[derive(Debug)]
pub struct AdminSession {
    pub username: String,
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            tracing::debug!("Missing or malformed authorization header");
            AppError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string())
        })?;

        let username = state
            .tokens
            .verify(token)
            .map_err(|_| AppError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string()))?;

        Ok(AdminSession { username })
    }
}

/// Pull a non-empty token out of an `Authorization: Bearer` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let header = parts.headers.get("authorization")?.to_str().ok()?;
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}
