//! Email delivery seam. One request per submission; a failure here is
//! terminal for the attempt with no retry.

use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::config::DispatchConfig;
use crate::error::MailError;

/// Template parameters the delivery service interpolates: a sender
/// label, a timestamp string, and the fully composed body. There are no
/// structured subject or attachment fields.
#[derive(Debug, Clone, Serialize)]
pub struct EmailParams {
    pub name: String,
    pub time: String,
    pub message: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, params: &EmailParams) -> Result<(), MailError>;
}

/// EmailJS REST delivery: one JSON POST carrying the service, template,
/// and public key identifiers plus the template parameters.
pub struct EmailJsMailer {
    client: Client,
    api_url: String,
    service_id: String,
    template_id: String,
    public_key: String,
}

impl EmailJsMailer {
    pub fn new(client: Client, config: &DispatchConfig) -> Self {
        Self {
            client,
            api_url: config.emailjs_api_url.clone(),
            service_id: config.service_id.clone(),
            template_id: config.template_id.clone(),
            public_key: config.public_key.clone(),
        }
    }
}

#[derive(Serialize)]
struct EmailRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a EmailParams,
}

#[async_trait]
impl Mailer for EmailJsMailer {
    async fn send(&self, params: &EmailParams) -> Result<(), MailError> {
        let request = EmailRequest {
            service_id: &self.service_id,
            template_id: &self.template_id,
            user_id: &self.public_key,
            template_params: params,
        };

        let resp = self
            .client
            .post(&self.api_url)
            .json(&request)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(MailError::Status { status, body });
        }

        debug!("Email accepted by delivery service");
        Ok(())
    }
}

/// Recording mailer for flow tests; optionally scripted to fail.
pub struct MockMailer {
    fail_with: Option<String>,
    sent: Mutex<Vec<EmailParams>>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self {
            fail_with: None,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Mailer whose every send fails with this message.
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Every send observed so far.
    pub fn sent(&self) -> Vec<EmailParams> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, params: &EmailParams) -> Result<(), MailError> {
        if let Some(body) = &self.fail_with {
            return Err(MailError::Status {
                status: 500,
                body: body.clone(),
            });
        }
        self.sent.lock().unwrap().push(params.clone());
        Ok(())
    }
}
