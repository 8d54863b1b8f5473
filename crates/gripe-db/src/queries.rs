use std::collections::HashMap;

use chrono::{DateTime, Utc};
use gripe_types::models::{Account, Comment, Photo};
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use crate::models::{AccountRow, CommentRow, PhotoRow, SessionRecord, SessionRow};
use crate::{Database, Result, StoreError};

impl Database {
    // -- Accounts --

    /// Append an account. Uniqueness lives in the schema; a violated
    /// UNIQUE constraint comes back as `Conflict` naming the field.
    pub fn insert_account(&self, account: &Account) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO accounts (id, username, email, password, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    account.id.to_string(),
                    account.username,
                    account.email,
                    account.password,
                    account.created_at.to_rfc3339(),
                ],
            )
            .map_err(map_account_conflict)?;
            Ok(())
        })
    }

    pub fn account_by_username(&self, username: &str) -> Result<Option<Account>> {
        self.with_conn(|conn| {
            query_account(
                conn,
                "SELECT id, username, email, password, created_at FROM accounts WHERE username = ?1",
                username,
            )
        })
    }

    pub fn account_by_email(&self, email: &str) -> Result<Option<Account>> {
        self.with_conn(|conn| {
            query_account(
                conn,
                "SELECT id, username, email, password, created_at FROM accounts WHERE email = ?1",
                email,
            )
        })
    }

    pub fn account_by_id(&self, id: Uuid) -> Result<Option<Account>> {
        self.with_conn(|conn| {
            query_account(
                conn,
                "SELECT id, username, email, password, created_at FROM accounts WHERE id = ?1",
                &id.to_string(),
            )
        })
    }

    // -- Photos --

    pub fn insert_photo(&self, photo: &Photo) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO photos (id, owner_id, filename, data_url, uploaded_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![
                    photo.id.to_string(),
                    photo.owner_id.to_string(),
                    photo.filename,
                    photo.data_url,
                    photo.uploaded_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
    }

    /// All photos for one owner, oldest first. Comments are fetched in
    /// one batch query and attached to their photos.
    pub fn photos_by_owner(&self, owner_id: Uuid) -> Result<Vec<Photo>> {
        self.with_conn(|conn| {
            let rows = query_photos_by_owner(conn, &owner_id.to_string())?;

            let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
            let mut by_photo: HashMap<String, Vec<Comment>> = HashMap::new();
            for comment in query_comments_for_photos(conn, &ids)? {
                let photo_id = comment.photo_id.clone();
                by_photo
                    .entry(photo_id)
                    .or_default()
                    .push(Comment::try_from(comment)?);
            }

            rows.into_iter()
                .map(|row| {
                    let comments = by_photo.remove(&row.id).unwrap_or_default();
                    row.into_photo(comments)
                })
                .collect()
        })
    }

    /// Remove every photo owned by `owner_id`. Comments go with their
    /// photos (ON DELETE CASCADE). Returns how many photos were removed.
    pub fn delete_photos_by_owner(&self, owner_id: Uuid) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let removed = conn.execute(
                "DELETE FROM photos WHERE owner_id = ?1",
                [owner_id.to_string()],
            )?;
            Ok(removed)
        })
    }

    // -- Session --

    pub fn save_session(&self, account_id: Uuid, started_at: DateTime<Utc>) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO session (slot, account_id, started_at) VALUES (1, ?1, ?2)",
                rusqlite::params![account_id.to_string(), started_at.to_rfc3339()],
            )?;
            Ok(())
        })
    }

    pub fn load_session(&self) -> Result<Option<SessionRecord>> {
        self.with_conn(|conn| {
            let row = query_session(conn)?;
            row.map(SessionRecord::try_from).transpose()
        })
    }

    /// Clear the session slot. Returns false when no session was saved,
    /// so signing out twice is harmless.
    pub fn clear_session(&self) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let removed = conn.execute("DELETE FROM session WHERE slot = 1", [])?;
            Ok(removed > 0)
        })
    }
}

fn query_account(conn: &Connection, sql: &str, value: &str) -> Result<Option<Account>> {
    let mut stmt = conn.prepare(sql)?;

    let row = stmt
        .query_row([value], |row| {
            Ok(AccountRow {
                id: row.get(0)?,
                username: row.get(1)?,
                email: row.get(2)?,
                password: row.get(3)?,
                created_at: row.get(4)?,
            })
        })
        .optional()?;

    row.map(Account::try_from).transpose()
}

fn query_photos_by_owner(conn: &Connection, owner_id: &str) -> Result<Vec<PhotoRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, owner_id, filename, data_url, uploaded_at
         FROM photos
         WHERE owner_id = ?1
         ORDER BY uploaded_at, rowid",
    )?;

    let rows = stmt
        .query_map([owner_id], |row| {
            Ok(PhotoRow {
                id: row.get(0)?,
                owner_id: row.get(1)?,
                filename: row.get(2)?,
                data_url: row.get(3)?,
                uploaded_at: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Batch-fetch comments for a set of photo IDs.
fn query_comments_for_photos(conn: &Connection, photo_ids: &[String]) -> Result<Vec<CommentRow>> {
    if photo_ids.is_empty() {
        return Ok(vec![]);
    }

    let placeholders: Vec<String> = (1..=photo_ids.len()).map(|i| format!("?{}", i)).collect();
    let sql = format!(
        "SELECT id, photo_id, author_id, text, created_at FROM comments WHERE photo_id IN ({})",
        placeholders.join(", ")
    );

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::types::ToSql> = photo_ids
        .iter()
        .map(|id| id as &dyn rusqlite::types::ToSql)
        .collect();

    let rows = stmt
        .query_map(params.as_slice(), |row| {
            Ok(CommentRow {
                id: row.get(0)?,
                photo_id: row.get(1)?,
                author_id: row.get(2)?,
                text: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_session(conn: &Connection) -> Result<Option<SessionRow>> {
    let row = conn
        .query_row(
            "SELECT account_id, started_at FROM session WHERE slot = 1",
            [],
            |row| {
                Ok(SessionRow {
                    account_id: row.get(0)?,
                    started_at: row.get(1)?,
                })
            },
        )
        .optional()?;

    Ok(row)
}

fn map_account_conflict(err: rusqlite::Error) -> StoreError {
    if let rusqlite::Error::SqliteFailure(e, Some(msg)) = &err {
        if e.code == rusqlite::ErrorCode::ConstraintViolation {
            if msg.contains("accounts.username") {
                return StoreError::Conflict { field: "username" };
            }
            if msg.contains("accounts.email") {
                return StoreError::Conflict { field: "email" };
            }
        }
    }
    StoreError::Sqlite(err)
}
