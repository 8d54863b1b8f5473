use thiserror::Error;

use gripe_db::StoreError;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("an account with this username already exists")]
    UsernameTaken,

    #[error("an account with this email already exists")]
    EmailTaken,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("could not read {path}: {source}")]
    FileRead {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("camera permission denied")]
    PermissionDenied,

    #[error("no camera device available")]
    NoDevice,

    #[error("camera stream already released")]
    StreamEnded,

    #[error("captured frame has invalid dimensions")]
    BadFrame,

    #[error("failed to encode captured frame: {0}")]
    Encode(#[from] image::ImageError),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no account is signed in")]
    NotAuthenticated,

    #[error(transparent)]
    Library(#[from] LibraryError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
