//! Request and response models for the API.
//!
//! All models use serde for serialization/deserialization.
//! Stored records are the same structs the API returns, except for
//! [`StoredAdmin`], which never leaves the server.

use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Length of server-generated record ids.
pub const ID_LEN: usize = 12;

/// Generate a new record id.
pub fn new_id() -> String {
    nanoid::nanoid!(ID_LEN)
}

/// Seconds since the Unix epoch.
pub fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(field, format!("{} must not be empty", field)));
    }
    Ok(())
}

// ============================================================================
// Auth Models
// ============================================================================

/// Maximum password length in bytes; bcrypt ignores anything past 72.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Body of both `/auth/register` and `/auth/login`.
#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for CredentialsRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl CredentialsRequest {
    /// Rules applied to new accounts. Login does not validate, so a
    /// malformed username simply fails as unknown credentials.
    pub fn validate_new_account(&self) -> Result<(), AppError> {
        if self.username.len() < 2 || self.username.len() > 64 {
            return Err(AppError::validation(
                "username",
                "Username must be 2-64 characters",
            ));
        }
        if !self
            .username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(AppError::validation(
                "username",
                "Username may only contain alphanumeric characters, hyphens, and underscores",
            ));
        }
        if self.password.is_empty() {
            return Err(AppError::validation("password", "Password must not be empty"));
        }
        if self.password.len() > MAX_PASSWORD_BYTES {
            return Err(AppError::validation(
                "password",
                format!("Password must be at most {} bytes", MAX_PASSWORD_BYTES),
            ));
        }
        Ok(())
    }
}

/// Response to a successful register or login.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub username: String,
}

/// Response of `GET /auth/verify`.
#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub username: String,
}

/// Admin account as stored. Keyed by username.
#[derive(Clone, Serialize, Deserialize)]
pub struct StoredAdmin {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: u64,
}

impl std::fmt::Debug for StoredAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredAdmin")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .finish()
    }
}

// ============================================================================
// Event Models
// ============================================================================

fn default_event_type() -> String {
    "general".to_string()
}

/// Body of `POST /events`.
#[derive(Debug, Deserialize)]
pub struct EventCreate {
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub location: String,
    #[serde(default = "default_event_type")]
    pub event_type: String,
}

/// Body of `PUT /events/{id}`. Absent fields keep their current value.
#[derive(Debug, Default, Deserialize)]
pub struct EventUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub event_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub time: String,
    pub location: String,
    pub event_type: String,
    pub created_at: u64,
}

impl Event {
    pub fn new(req: EventCreate) -> Self {
        Event {
            id: new_id(),
            title: req.title,
            description: req.description,
            date: req.date,
            time: req.time,
            location: req.location,
            event_type: req.event_type,
            created_at: unix_now(),
        }
    }

    pub fn apply(&mut self, update: EventUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(date) = update.date {
            self.date = date;
        }
        if let Some(time) = update.time {
            self.time = time;
        }
        if let Some(location) = update.location {
            self.location = location;
        }
        if let Some(event_type) = update.event_type {
            self.event_type = event_type;
        }
    }

    /// Dates must be `YYYY-MM-DD` so that string order is calendar order.
    pub fn validate(&self) -> Result<(), AppError> {
        require_non_empty("title", &self.title)?;
        require_non_empty("date", &self.date)?;
        require_non_empty("time", &self.time)?;
        require_non_empty("location", &self.location)?;
        require_non_empty("event_type", &self.event_type)?;

        // chrono tolerates signs and padding; only the canonical rendering
        // sorts correctly as a string.
        let canonical = chrono::NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map(|d| d.format("%Y-%m-%d").to_string() == self.date)
            .unwrap_or(false);
        if !canonical {
            return Err(AppError::validation("date", "Date must be YYYY-MM-DD"));
        }
        Ok(())
    }
}

// ============================================================================
// Officer Models
// ============================================================================

/// Body of `POST /officers` and `PUT /officers/{id}`.
#[derive(Debug, Deserialize)]
pub struct OfficerCreate {
    pub name: String,
    pub role: String,
    pub bio: String,
    pub image_url: String,
    pub email: Option<String>,
    #[serde(default)]
    pub order: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Officer {
    pub id: String,
    pub name: String,
    pub role: String,
    pub bio: String,
    pub image_url: String,
    pub email: Option<String>,
    pub order: i64,
}

impl Officer {
    pub fn with_id(id: String, req: OfficerCreate) -> Self {
        Officer {
            id,
            name: req.name,
            role: req.role,
            bio: req.bio,
            image_url: req.image_url,
            email: req.email.filter(|e| !e.trim().is_empty()),
            order: req.order,
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        require_non_empty("name", &self.name)?;
        require_non_empty("role", &self.role)?;
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(AppError::validation("email", "Email must contain '@'"));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Gallery Models
// ============================================================================

/// Body of `POST /gallery`.
#[derive(Debug, Deserialize)]
pub struct GalleryImageCreate {
    pub url: String,
    pub caption: String,
    #[serde(default)]
    pub order: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub id: String,
    pub url: String,
    pub caption: String,
    pub order: i64,
}

impl GalleryImage {
    pub fn new(req: GalleryImageCreate) -> Self {
        GalleryImage {
            id: new_id(),
            url: req.url,
            caption: req.caption,
            order: req.order,
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        require_non_empty("url", &self.url)
    }
}

// ============================================================================
// Misc Models
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}

/// Response of `GET /api/`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiInfo {
    pub message: String,
    pub version: String,
}
