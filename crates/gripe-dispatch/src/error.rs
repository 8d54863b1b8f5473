use thiserror::Error;

/// Photo-level upload errors. These never fail a submission; the flow
/// records them as failure markers and moves on.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("image host returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("image host request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("email delivery returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("email request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Submission-level failures. `Validation` returns the flow to Idle
/// with the draft untouched; `Mail` is terminal for the attempt.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Mail(#[from] MailError),

    #[error("submission task aborted: {0}")]
    Aborted(String),
}
