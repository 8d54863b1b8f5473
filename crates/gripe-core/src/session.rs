//! Explicit session context with an explicit lifecycle: restore on
//! start, establish on login/registration, clear on logout. The session
//! is the sole authorization gate; components that need the current
//! account take it from here rather than from any ambient global.

use chrono::{DateTime, Utc};
use tracing::info;

use gripe_db::{Database, StoreError};
use gripe_types::models::Account;

/// The signed-in account and when it signed in.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    pub account: Account,
    pub started_at: DateTime<Utc>,
}

pub struct Session {
    active: Option<ActiveSession>,
}

impl Session {
    /// Process-start path: reinstate the persisted session if one was
    /// saved. Accounts are never deleted, so a session row referencing
    /// a missing account is corrupt storage, not a signed-out state.
    pub fn restore(db: &Database) -> Result<Self, StoreError> {
        let Some(record) = db.load_session()? else {
            return Ok(Self { active: None });
        };

        let account =
            db.account_by_id(record.account_id)?
                .ok_or_else(|| StoreError::Corrupt {
                    entity: "session",
                    reason: format!("references missing account {}", record.account_id),
                })?;

        info!("Restored session for {}", account.username);
        Ok(Self {
            active: Some(ActiveSession {
                account,
                started_at: record.started_at,
            }),
        })
    }

    /// Persist the single session slot and hold the account in memory.
    /// Called by both login and registration; an earlier session is
    /// replaced.
    pub fn establish(&mut self, db: &Database, account: Account) -> Result<&Account, StoreError> {
        let started_at = Utc::now();
        db.save_session(account.id, started_at)?;

        info!("Session established for {}", account.username);
        let active = self.active.insert(ActiveSession {
            account,
            started_at,
        });
        Ok(&active.account)
    }

    /// Clear the in-memory account and delete the persisted row
    /// entirely. Returns false when there was nothing to clear.
    pub fn logout(&mut self, db: &Database) -> Result<bool, StoreError> {
        self.active = None;
        let removed = db.clear_session()?;
        if removed {
            info!("Session cleared");
        }
        Ok(removed)
    }

    pub fn account(&self) -> Option<&Account> {
        self.active.as_ref().map(|active| &active.account)
    }

    pub fn active(&self) -> Option<&ActiveSession> {
        self.active.as_ref()
    }

    /// Derived, not stored: authenticated iff an account is present.
    pub fn is_authenticated(&self) -> bool {
        self.active.is_some()
    }
}
