//! Database row types, mapped field-for-field from SQLite rows.
//! Distinct from the gripe-types models; the conversions below are the
//! one place the corrupt-storage policy is applied, so a row that no
//! longer parses fails the operation instead of vanishing silently.

use chrono::{DateTime, Utc};
use gripe_types::models::{Account, Comment, Photo};
use uuid::Uuid;

use crate::{Result, StoreError};

pub struct AccountRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub created_at: String,
}

pub struct PhotoRow {
    pub id: String,
    pub owner_id: String,
    pub filename: String,
    pub data_url: String,
    pub uploaded_at: String,
}

pub struct CommentRow {
    pub id: String,
    pub photo_id: String,
    pub author_id: String,
    pub text: String,
    pub created_at: String,
}

pub struct SessionRow {
    pub account_id: String,
    pub started_at: String,
}

/// Parsed session slot. The engine layer attaches the account itself.
pub struct SessionRecord {
    pub account_id: Uuid,
    pub started_at: DateTime<Utc>,
}

pub fn parse_uuid(entity: &'static str, value: &str) -> Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| StoreError::Corrupt {
        entity,
        reason: format!("bad id {value:?}: {e}"),
    })
}

pub fn parse_timestamp(entity: &'static str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt {
            entity,
            reason: format!("bad timestamp {value:?}: {e}"),
        })
}

impl TryFrom<AccountRow> for Account {
    type Error = StoreError;

    fn try_from(row: AccountRow) -> Result<Account> {
        Ok(Account {
            id: parse_uuid("accounts", &row.id)?,
            username: row.username,
            email: row.email,
            password: row.password,
            created_at: parse_timestamp("accounts", &row.created_at)?,
        })
    }
}

impl TryFrom<CommentRow> for Comment {
    type Error = StoreError;

    fn try_from(row: CommentRow) -> Result<Comment> {
        Ok(Comment {
            id: parse_uuid("comments", &row.id)?,
            photo_id: parse_uuid("comments", &row.photo_id)?,
            author_id: parse_uuid("comments", &row.author_id)?,
            text: row.text,
            created_at: parse_timestamp("comments", &row.created_at)?,
        })
    }
}

impl TryFrom<SessionRow> for SessionRecord {
    type Error = StoreError;

    fn try_from(row: SessionRow) -> Result<SessionRecord> {
        Ok(SessionRecord {
            account_id: parse_uuid("session", &row.account_id)?,
            started_at: parse_timestamp("session", &row.started_at)?,
        })
    }
}

impl PhotoRow {
    /// Comments are fetched separately (batch query) and attached here.
    pub fn into_photo(self, comments: Vec<Comment>) -> Result<Photo> {
        Ok(Photo {
            id: parse_uuid("photos", &self.id)?,
            owner_id: parse_uuid("photos", &self.owner_id)?,
            filename: self.filename,
            data_url: self.data_url,
            uploaded_at: parse_timestamp("photos", &self.uploaded_at)?,
            comments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_row_converts_to_model() {
        let row = AccountRow {
            id: "6787f9a4-5f2f-4b8e-9c43-6b1a816f0c6d".into(),
            username: "mike".into(),
            email: "mike@example.com".into(),
            password: "hunter2".into(),
            created_at: "2026-03-01T10:15:00+00:00".into(),
        };

        let account = Account::try_from(row).unwrap();
        assert_eq!(account.username, "mike");
        assert_eq!(account.created_at.to_rfc3339(), "2026-03-01T10:15:00+00:00");
    }

    #[test]
    fn corrupt_id_is_reported_not_swallowed() {
        let row = AccountRow {
            id: "not-a-uuid".into(),
            username: "mike".into(),
            email: "mike@example.com".into(),
            password: "hunter2".into(),
            created_at: "2026-03-01T10:15:00+00:00".into(),
        };

        match Account::try_from(row) {
            Err(StoreError::Corrupt { entity, .. }) => assert_eq!(entity, "accounts"),
            other => panic!("expected Corrupt, got {other:?}"),
        }
    }

    #[test]
    fn corrupt_timestamp_names_the_entity() {
        let row = PhotoRow {
            id: "6787f9a4-5f2f-4b8e-9c43-6b1a816f0c6d".into(),
            owner_id: "2787f9a4-5f2f-4b8e-9c43-6b1a816f0c6d".into(),
            filename: "photo_1.jpg".into(),
            data_url: "data:image/jpeg;base64,AAAA".into(),
            uploaded_at: "yesterday".into(),
        };

        match row.into_photo(vec![]) {
            Err(StoreError::Corrupt { entity, .. }) => assert_eq!(entity, "photos"),
            other => panic!("expected Corrupt, got {other:?}"),
        }
    }
}
