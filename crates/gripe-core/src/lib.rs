//! Engine behind the photo-complaint app: local accounts, a single
//! persisted session, and a per-account photo library over the embedded
//! store. Submission of complaints lives in `gripe-dispatch`.

pub mod capture;
pub mod directory;
pub mod error;
pub mod library;
pub mod session;

pub use error::{CaptureError, DirectoryError, EngineError, LibraryError};

use std::path::Path;

use gripe_db::{Database, StoreError};
use gripe_types::models::Account;

use crate::directory::Directory;
use crate::library::PhotoLibrary;
use crate::session::Session;

/// Facade tying the account directory and the session lifecycle to one
/// database. Opening the engine attempts a session restore; login and
/// registration both establish the session; the library is only
/// reachable through an authenticated session.
pub struct Engine {
    db: Database,
    session: Session,
}

impl Engine {
    pub fn open(path: &Path) -> Result<Self, EngineError> {
        let db = Database::open(path)?;
        let session = Session::restore(&db)?;
        Ok(Self { db, session })
    }

    /// Throwaway engine over an in-memory store.
    pub fn open_in_memory() -> Result<Self, EngineError> {
        let db = Database::open_in_memory()?;
        let session = Session::restore(&db)?;
        Ok(Self { db, session })
    }

    /// Register a new account and sign it in.
    pub fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<&Account, DirectoryError> {
        let account = Directory::new(&self.db).register(username, email, password)?;
        Ok(self.session.establish(&self.db, account)?)
    }

    /// Sign in with stored credentials.
    pub fn login(&mut self, username: &str, password: &str) -> Result<&Account, DirectoryError> {
        let account = Directory::new(&self.db).login(username, password)?;
        Ok(self.session.establish(&self.db, account)?)
    }

    /// Sign out. Returns false when no one was signed in.
    pub fn logout(&mut self) -> Result<bool, StoreError> {
        self.session.logout(&self.db)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Photo library scoped to the signed-in account.
    pub fn library(&self) -> Result<PhotoLibrary<'_>, EngineError> {
        let account = self
            .session
            .account()
            .ok_or(EngineError::NotAuthenticated)?;
        Ok(PhotoLibrary::open(&self.db, account.id)?)
    }

    pub fn db(&self) -> &Database {
        &self.db
    }
}
