use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account. Accounts are append-only: nothing in the engine
/// updates or deletes one once it exists.
///
/// The password is stored and compared as plain text. The engine offers
/// no authentication security; the session gate is a convenience, not a
/// boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// A captured or imported photo, owned by exactly one account.
///
/// `data_url` holds the full image payload as a base64 data URL; size is
/// unbounded and never validated on the way in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub filename: String,
    pub data_url: String,
    pub uploaded_at: DateTime<Utc>,
    /// No operation in the engine populates comments; the field keeps the
    /// stored photo shape stable for shells that render them.
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// A comment on a photo. Nothing in the engine creates, reads, or removes
/// one; the shape exists for the photo payload above.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub photo_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}
