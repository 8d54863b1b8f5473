//! Service configuration from the environment.
//!
//! Missing identifiers are carried as empty strings and only rejected
//! when a submission reaches its validation stage; constructing a
//! config never fails.

/// Sender label attached to every complaint email.
pub const DEFAULT_SENDER_NAME: &str = "Photo Complaint System";

const DEFAULT_CLOUDINARY_API_URL: &str = "https://api.cloudinary.com/v1_1";
const DEFAULT_EMAILJS_API_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Cloudinary cloud name (`GRIPE_CLOUDINARY_CLOUD_NAME`).
    pub cloud_name: String,
    /// Cloudinary unsigned upload preset (`GRIPE_CLOUDINARY_UPLOAD_PRESET`).
    pub upload_preset: String,
    /// EmailJS service id (`GRIPE_EMAILJS_SERVICE_ID`).
    pub service_id: String,
    /// EmailJS template id (`GRIPE_EMAILJS_TEMPLATE_ID`).
    pub template_id: String,
    /// EmailJS public key (`GRIPE_EMAILJS_PUBLIC_KEY`).
    pub public_key: String,
    /// Sender label (`GRIPE_SENDER_NAME`).
    pub sender_name: String,
    /// Image host API base; tests point this at a local stub
    /// (`GRIPE_CLOUDINARY_API_URL`).
    pub cloudinary_api_url: String,
    /// Email delivery endpoint (`GRIPE_EMAILJS_API_URL`).
    pub emailjs_api_url: String,
}

impl DispatchConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        Self {
            cloud_name: env_or("GRIPE_CLOUDINARY_CLOUD_NAME", ""),
            upload_preset: env_or("GRIPE_CLOUDINARY_UPLOAD_PRESET", ""),
            service_id: env_or("GRIPE_EMAILJS_SERVICE_ID", ""),
            template_id: env_or("GRIPE_EMAILJS_TEMPLATE_ID", ""),
            public_key: env_or("GRIPE_EMAILJS_PUBLIC_KEY", ""),
            sender_name: env_or("GRIPE_SENDER_NAME", DEFAULT_SENDER_NAME),
            cloudinary_api_url: env_or("GRIPE_CLOUDINARY_API_URL", DEFAULT_CLOUDINARY_API_URL),
            emailjs_api_url: env_or("GRIPE_EMAILJS_API_URL", DEFAULT_EMAILJS_API_URL),
        }
    }

    /// All five service identifiers are present. Checked by the
    /// submission flow's validation stage, not at construction.
    pub fn is_complete(&self) -> bool {
        !(self.cloud_name.is_empty()
            || self.upload_preset.is_empty()
            || self.service_id.is_empty()
            || self.template_id.is_empty()
            || self.public_key.is_empty())
    }

    /// Full upload endpoint for this cloud.
    pub fn cloudinary_upload_url(&self) -> String {
        format!("{}/{}/image/upload", self.cloudinary_api_url, self.cloud_name)
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
