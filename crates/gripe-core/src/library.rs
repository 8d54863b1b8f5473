//! Owner-scoped photo repository. Each instance is opened for exactly
//! one account and exposes only that account's photos; cross-owner
//! access does not exist at this layer.

use std::path::Path;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use gripe_db::Database;
use gripe_types::data_url;
use gripe_types::models::Photo;

use crate::error::LibraryError;

pub struct PhotoLibrary<'a> {
    db: &'a Database,
    owner_id: Uuid,
    photos: Vec<Photo>,
}

impl<'a> PhotoLibrary<'a> {
    /// Load the owner's photos once; the in-memory view tracks every
    /// mutation made through this instance.
    pub fn open(db: &'a Database, owner_id: Uuid) -> Result<Self, LibraryError> {
        let photos = db.photos_by_owner(owner_id)?;
        debug!("Photo library opened for {owner_id} ({} photos)", photos.len());
        Ok(Self {
            db,
            owner_id,
            photos,
        })
    }

    /// Insertion-ordered view of this owner's photos.
    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    /// Store a photo. No validation of payload format, size, or
    /// filename; the write touches exactly one row.
    pub fn add_photo(&mut self, filename: &str, data_url: &str) -> Result<Photo, LibraryError> {
        let photo = Photo {
            id: Uuid::new_v4(),
            owner_id: self.owner_id,
            filename: filename.to_string(),
            data_url: data_url.to_string(),
            uploaded_at: Utc::now(),
            comments: Vec::new(),
        };

        self.db.insert_photo(&photo)?;
        info!("Added photo {} for {}", photo.filename, self.owner_id);

        self.photos.push(photo.clone());
        Ok(photo)
    }

    /// Remove every photo this owner has. Irreversible; confirmation is
    /// the caller's concern. Returns how many photos were removed.
    pub fn clear_all(&mut self) -> Result<usize, LibraryError> {
        let removed = self.db.delete_photos_by_owner(self.owner_id)?;
        info!("Cleared {removed} photo(s) for {}", self.owner_id);
        self.photos.clear();
        Ok(removed)
    }

    /// File-selection surface: import one file. The format is sniffed
    /// from the file's content; a file that is not a recognizable image
    /// is silently ignored.
    pub fn import_file(&mut self, path: &Path) -> Result<Option<Photo>, LibraryError> {
        let bytes = std::fs::read(path).map_err(|source| LibraryError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let format = match image::guess_format(&bytes) {
            Ok(format) => format,
            Err(_) => {
                debug!("Ignoring non-image file {}", path.display());
                return Ok(None);
            }
        };

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let encoded = data_url::encode(format.to_mime_type(), &bytes);
        let photo = self.add_photo(&filename, &encoded)?;
        Ok(Some(photo))
    }
}
