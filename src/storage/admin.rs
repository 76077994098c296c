//! Admin account operations.
//!
//! Collection `admins`, keyed by username.

use super::{get_doc, insert_doc, DocumentStore, StoreError};
use crate::models::StoredAdmin;

pub const COLLECTION: &str = "admins";

pub async fn get_admin(
    store: &dyn DocumentStore,
    username: &str,
) -> Result<Option<StoredAdmin>, StoreError> {
    get_doc(store, COLLECTION, username).await
}

/// Persist a new admin. Returns `false` if the username is already taken.
pub async fn insert_admin(store: &dyn DocumentStore, admin: &StoredAdmin) -> Result<bool, StoreError> {
    insert_doc(store, COLLECTION, &admin.username, admin).await
}
