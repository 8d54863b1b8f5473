use rusqlite::Connection;
use tracing::info;

use crate::Result;

/// Versioned migrations behind a schema_version gate. Timestamps carry
/// no SQL defaults: callers insert explicit RFC 3339 strings so the row
/// always matches what the model layer handed down.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE accounts (
                id          TEXT PRIMARY KEY,
                username    TEXT NOT NULL UNIQUE,
                email       TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL,
                created_at  TEXT NOT NULL
            );

            CREATE TABLE photos (
                id          TEXT PRIMARY KEY,
                owner_id    TEXT NOT NULL REFERENCES accounts(id),
                filename    TEXT NOT NULL,
                data_url    TEXT NOT NULL,
                uploaded_at TEXT NOT NULL
            );

            CREATE INDEX idx_photos_owner
                ON photos(owner_id, uploaded_at);

            CREATE TABLE comments (
                id          TEXT PRIMARY KEY,
                photo_id    TEXT NOT NULL REFERENCES photos(id) ON DELETE CASCADE,
                author_id   TEXT NOT NULL REFERENCES accounts(id),
                text        TEXT NOT NULL,
                created_at  TEXT NOT NULL
            );

            CREATE INDEX idx_comments_photo
                ON comments(photo_id);

            -- Single-slot table: at most one signed-in account at a time
            CREATE TABLE session (
                slot        INTEGER PRIMARY KEY CHECK (slot = 1),
                account_id  TEXT NOT NULL REFERENCES accounts(id),
                started_at  TEXT NOT NULL
            );

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    Ok(())
}
