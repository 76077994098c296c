//! Auth API endpoints.

use crate::auth::middleware::{AdminSession, AppState};
use crate::auth::password::{
    hash_password_blocking, verify_password_blocking, verify_password_without_account,
};
use crate::error::AppError;
use crate::models::{new_id, unix_now, CredentialsRequest, StoredAdmin, TokenResponse, VerifyResponse};
use crate::routes::AppJson;
use crate::storage;
use axum::{extract::State, Json};
use zeroize::Zeroizing;

const USERNAME_TAKEN: &str = "Username already exists";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

fn token_response(state: &AppState, username: String) -> Result<Json<TokenResponse>, AppError> {
    let token = state
        .tokens
        .issue(&username)
        .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))?;
    Ok(Json(TokenResponse { token, username }))
}

/// POST /api/auth/register — Create an admin account and sign in
pub async fn register(
    State(state): State<AppState>,
    AppJson(req): AppJson<CredentialsRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    req.validate_new_account()?;

    // Cheap pre-check so an obvious duplicate doesn't pay for a bcrypt hash.
    // The insert below is the authoritative uniqueness check.
    if storage::admin::get_admin(state.store.as_ref(), &req.username)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest(USERNAME_TAKEN.to_string()));
    }

    let CredentialsRequest { username, password } = req;
    let password_hash =
        hash_password_blocking(Zeroizing::new(password), state.config.bcrypt_cost).await?;

    let admin = StoredAdmin {
        id: new_id(),
        username,
        password_hash,
        created_at: unix_now(),
    };

    if !storage::admin::insert_admin(state.store.as_ref(), &admin).await? {
        tracing::warn!(action = "register_conflict", username = %admin.username, "Lost registration race");
        return Err(AppError::BadRequest(USERNAME_TAKEN.to_string()));
    }

    tracing::info!(action = "admin_registered", username = %admin.username, "Admin registered");

    token_response(&state, admin.username)
}

/// POST /api/auth/login — Exchange credentials for a token
pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<CredentialsRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let CredentialsRequest { username, password } = req;
    let password = Zeroizing::new(password);

    let admin = storage::admin::get_admin(state.store.as_ref(), &username).await?;

    let valid = match admin {
        Some(admin) => verify_password_blocking(password, admin.password_hash).await,
        None => verify_password_without_account(password, state.config.bcrypt_cost).await,
    };

    if !valid {
        tracing::warn!(action = "auth_failed", username = %username, "Invalid credentials");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    tracing::info!(action = "auth_success", username = %username, "Admin logged in");

    token_response(&state, username)
}

/// GET /api/auth/verify — Check the presented bearer token
pub async fn verify(session: AdminSession) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        valid: true,
        username: session.username,
    })
}
