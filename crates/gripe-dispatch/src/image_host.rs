//! Image-hosting seam. One upload per photo; a non-success status is a
//! photo-level failure the flow recovers from, never a submission
//! failure.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

use crate::config::DispatchConfig;
use crate::error::HostError;

#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload one image payload; returns its publicly resolvable URL.
    async fn upload(&self, filename: &str, mime: &str, bytes: Vec<u8>) -> Result<String, HostError>;
}

/// Cloudinary unsigned upload: one multipart POST per photo carrying
/// the binary payload, the upload preset, and a generated public id.
pub struct CloudinaryHost {
    client: Client,
    upload_url: String,
    upload_preset: String,
}

impl CloudinaryHost {
    pub fn new(client: Client, config: &DispatchConfig) -> Self {
        Self {
            client,
            upload_url: config.cloudinary_upload_url(),
            upload_preset: config.upload_preset.clone(),
        }
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[async_trait]
impl ImageHost for CloudinaryHost {
    async fn upload(&self, filename: &str, mime: &str, bytes: Vec<u8>) -> Result<String, HostError> {
        // public id: submission time plus the filename up to its first dot
        let stem = filename
            .split_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(filename);
        let public_id = format!("complaint_{}_{}", Utc::now().timestamp_millis(), stem);

        let part = Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(mime)?;
        let form = Form::new()
            .part("file", part)
            .text("upload_preset", self.upload_preset.clone())
            .text("public_id", public_id);

        let resp = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(HostError::Status { status, body });
        }

        let payload: UploadResponse = resp.json().await?;
        debug!("Uploaded {} -> {}", filename, payload.secure_url);
        Ok(payload.secure_url)
    }
}

/// Scripted host for flow tests: records every upload, succeeds with a
/// derived URL unless the filename was marked as failing.
pub struct MockImageHost {
    fail: HashSet<String>,
    uploads: Mutex<Vec<String>>,
}

impl MockImageHost {
    pub fn new() -> Self {
        Self {
            fail: HashSet::new(),
            uploads: Mutex::new(Vec::new()),
        }
    }

    /// Host that fails uploads for exactly these filenames.
    pub fn failing(filenames: &[&str]) -> Self {
        Self {
            fail: filenames.iter().map(|f| f.to_string()).collect(),
            uploads: Mutex::new(Vec::new()),
        }
    }

    /// Filenames uploaded so far, in call order.
    pub fn uploaded(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageHost for MockImageHost {
    async fn upload(&self, filename: &str, _mime: &str, _bytes: Vec<u8>) -> Result<String, HostError> {
        self.uploads.lock().unwrap().push(filename.to_string());

        if self.fail.contains(filename) {
            return Err(HostError::Status {
                status: 500,
                body: "mock upload failure".to_string(),
            });
        }
        Ok(format!("https://images.example/{filename}"))
    }
}
