//! Password hashing with bcrypt.
//!
//! bcrypt is deliberately slow, so the async helpers run it on the blocking
//! thread pool instead of the request executor.

use crate::error::AppError;
use zeroize::Zeroizing;

/// Hash a password with a random salt at the given cost.
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, cost)
}

/// Check a password against a stored digest.
///
/// A malformed digest counts as a mismatch.
pub fn verify_password(password: &str, digest: &str) -> bool {
    match bcrypt::verify(password, digest) {
        Ok(valid) => valid,
        Err(e) => {
            tracing::warn!(error = %e, "Stored password digest is malformed");
            false
        }
    }
}

pub async fn hash_password_blocking(
    password: Zeroizing<String>,
    cost: u32,
) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Password hashing error: {}", e)))
}

pub async fn verify_password_blocking(password: Zeroizing<String>, digest: String) -> bool {
    match tokio::task::spawn_blocking(move || verify_password(&password, &digest)).await {
        Ok(valid) => valid,
        Err(e) => {
            tracing::error!(error = %e, "Password verification task failed");
            false
        }
    }
}

/// Spend the same bcrypt work as a real check when there is no account to
/// check against, so login timing does not reveal which usernames exist.
/// Always fails.
pub async fn verify_password_without_account(password: Zeroizing<String>, cost: u32) -> bool {
    if let Err(e) = tokio::task::spawn_blocking(move || hash_password(&password, cost)).await {
        tracing::error!(error = %e, "Password verification task failed");
    }
    false
}
