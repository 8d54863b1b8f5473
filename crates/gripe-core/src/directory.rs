//! Account directory: registration and credential checks.
//!
//! Accounts are append-only. There is no password policy, no email
//! format validation, and no normalization; username and email are
//! matched case-sensitively, exactly as stored.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use gripe_db::{Database, StoreError};
use gripe_types::models::Account;

use crate::error::DirectoryError;

pub struct Directory<'a> {
    db: &'a Database,
}

impl<'a> Directory<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create a new account. Rejected when any stored account already
    /// has this exact username or this exact email.
    pub fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Account, DirectoryError> {
        // Pre-check both fields so the rejection names the right one;
        // the UNIQUE constraints remain the backstop under a race.
        if self.db.account_by_username(username)?.is_some() {
            return Err(DirectoryError::UsernameTaken);
        }
        if self.db.account_by_email(email)?.is_some() {
            return Err(DirectoryError::EmailTaken);
        }

        let account = Account {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            created_at: Utc::now(),
        };

        self.db.insert_account(&account).map_err(map_conflict)?;

        info!("Registered account {}", account.username);
        Ok(account)
    }

    /// Exact string equality against the stored password is the entire
    /// check. Unknown username and wrong password are indistinguishable
    /// to the caller.
    pub fn login(&self, username: &str, password: &str) -> Result<Account, DirectoryError> {
        let account = self
            .db
            .account_by_username(username)?
            .ok_or(DirectoryError::InvalidCredentials)?;

        if account.password != password {
            return Err(DirectoryError::InvalidCredentials);
        }

        info!("Login for {}", account.username);
        Ok(account)
    }
}

fn map_conflict(err: StoreError) -> DirectoryError {
    match err {
        StoreError::Conflict { field: "username" } => DirectoryError::UsernameTaken,
        StoreError::Conflict { field: "email" } => DirectoryError::EmailTaken,
        other => DirectoryError::Store(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gripe_db::Database;

    fn directory_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn register_then_login_round_trip() {
        let db = directory_db();
        let directory = Directory::new(&db);

        let account = directory
            .register("alice", "a@x.com", "pw1")
            .unwrap();
        assert_eq!(account.username, "alice");
        assert_eq!(account.email, "a@x.com");

        let found = directory.login("alice", "pw1").unwrap();
        assert_eq!(found.id, account.id);
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let db = directory_db();
        let directory = Directory::new(&db);
        directory.register("alice", "a@x.com", "pw1").unwrap();

        match directory.register("alice", "b@x.com", "pw2") {
            Err(DirectoryError::UsernameTaken) => {}
            other => panic!("expected UsernameTaken, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let db = directory_db();
        let directory = Directory::new(&db);
        directory.register("alice", "a@x.com", "pw1").unwrap();

        match directory.register("bob", "a@x.com", "pw2") {
            Err(DirectoryError::EmailTaken) => {}
            other => panic!("expected EmailTaken, got {other:?}"),
        }
    }

    #[test]
    fn login_fails_on_any_single_character_deviation() {
        let db = directory_db();
        let directory = Directory::new(&db);
        directory.register("alice", "a@x.com", "pw1").unwrap();

        for (username, password) in [
            ("alice", "pw2"),
            ("alice", "pw"),
            ("alice", "pw1 "),
            ("Alice", "pw1"),
            ("alic", "pw1"),
            ("bob", "pw1"),
        ] {
            match directory.login(username, password) {
                Err(DirectoryError::InvalidCredentials) => {}
                other => panic!("{username}/{password} should be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn matching_is_case_sensitive_for_email_too() {
        let db = directory_db();
        let directory = Directory::new(&db);
        directory.register("alice", "a@x.com", "pw1").unwrap();

        // Different case means a different email; allowed.
        directory.register("bob", "A@x.com", "pw2").unwrap();
    }
}
