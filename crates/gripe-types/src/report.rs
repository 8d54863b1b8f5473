//! Per-submission results handed back to the embedding shell.

use serde::{Deserialize, Serialize};

/// Marker written into the email body when a photo fails to upload.
pub const UPLOAD_FAILED_MARKER: &str = "Upload failed";

/// What happened to one selected photo during the upload stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum UploadResult {
    Uploaded { url: String },
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadOutcome {
    pub filename: String,
    pub result: UploadResult,
}

impl UploadOutcome {
    /// Render this outcome as one line of the "Uploaded Photos" email
    /// section. Failure reasons are logged, not mailed; the body carries
    /// only the marker.
    pub fn body_line(&self) -> String {
        match &self.result {
            UploadResult::Uploaded { url } => format!("{}: {}", self.filename, url),
            UploadResult::Failed { .. } => format!("{}: {}", self.filename, UPLOAD_FAILED_MARKER),
        }
    }

    pub fn is_uploaded(&self) -> bool {
        matches!(self.result, UploadResult::Uploaded { .. })
    }
}

/// The record of one successful submission: the composed body that was
/// mailed, the per-photo upload outcomes in selection order, and the
/// timestamp line embedded in the body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionReport {
    pub body: String,
    pub uploads: Vec<UploadOutcome>,
    pub sent_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_line_formats() {
        let ok = UploadOutcome {
            filename: "p1.jpg".into(),
            result: UploadResult::Uploaded {
                url: "https://img.example/p1".into(),
            },
        };
        assert_eq!(ok.body_line(), "p1.jpg: https://img.example/p1");

        let failed = UploadOutcome {
            filename: "p2.jpg".into(),
            result: UploadResult::Failed {
                reason: "status 500".into(),
            },
        };
        assert_eq!(failed.body_line(), "p2.jpg: Upload failed");
    }
}
