//! Complaint dispatch: uploads selected photos to an image host and
//! sends one composed email per submission.
//!
//! The flow itself is [`submit`]; [`Dispatcher`] wires it to the
//! production services and can run it detached, the way a UI shell
//! fires a submission and keeps rendering.

pub mod compose;
pub mod config;
pub mod error;
pub mod image_host;
pub mod mailer;
pub mod progress;
mod submit;

pub use compose::ComplaintDraft;
pub use config::DispatchConfig;
pub use error::{HostError, MailError, SubmitError};
pub use image_host::{CloudinaryHost, ImageHost, MockImageHost};
pub use mailer::{EmailJsMailer, EmailParams, Mailer, MockMailer};
pub use progress::{Phase, SubmissionProgress};
pub use submit::submit;

use std::sync::Arc;

use reqwest::Client;
use tokio::task::JoinHandle;
use uuid::Uuid;

use gripe_types::models::Photo;
use gripe_types::report::SubmissionReport;

/// Submission runner bound to a configuration and a pair of services.
pub struct Dispatcher {
    config: DispatchConfig,
    host: Arc<dyn ImageHost>,
    mailer: Arc<dyn Mailer>,
}

impl Dispatcher {
    /// Production dispatcher: Cloudinary and EmailJS over one shared
    /// HTTP client.
    pub fn new(config: DispatchConfig) -> Self {
        let client = Client::new();
        let host = Arc::new(CloudinaryHost::new(client.clone(), &config));
        let mailer = Arc::new(EmailJsMailer::new(client, &config));
        Self {
            config,
            host,
            mailer,
        }
    }

    /// Dispatcher over caller-supplied services.
    pub fn with_services(
        config: DispatchConfig,
        host: Arc<dyn ImageHost>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            config,
            host,
            mailer,
        }
    }

    /// Run one attempt on the current task.
    pub async fn submit(
        &self,
        draft: &mut ComplaintDraft,
        photos: &[Photo],
        selected: &[Uuid],
        progress: &SubmissionProgress,
    ) -> Result<SubmissionReport, SubmitError> {
        submit(
            draft,
            photos,
            selected,
            &self.config,
            self.host.as_ref(),
            self.mailer.as_ref(),
            progress,
        )
        .await
    }

    /// Run one attempt on a background task and hand back its progress.
    ///
    /// Dropping the handle detaches the attempt: requests already in
    /// flight run to completion or failure, and their results are
    /// discarded. Nothing cancels the underlying network calls.
    pub fn spawn(
        &self,
        mut draft: ComplaintDraft,
        photos: Vec<Photo>,
        selected: Vec<Uuid>,
    ) -> SubmissionHandle {
        let progress = Arc::new(SubmissionProgress::new());
        let config = self.config.clone();
        let host = Arc::clone(&self.host);
        let mailer = Arc::clone(&self.mailer);
        let task_progress = Arc::clone(&progress);

        let task = tokio::spawn(async move {
            submit(
                &mut draft,
                &photos,
                &selected,
                &config,
                host.as_ref(),
                mailer.as_ref(),
                &task_progress,
            )
            .await
        });

        SubmissionHandle { progress, task }
    }
}

/// A detached submission attempt: shared progress plus the task's
/// eventual outcome.
pub struct SubmissionHandle {
    progress: Arc<SubmissionProgress>,
    task: JoinHandle<Result<SubmissionReport, SubmitError>>,
}

impl SubmissionHandle {
    pub fn progress(&self) -> Arc<SubmissionProgress> {
        Arc::clone(&self.progress)
    }

    /// Wait for the attempt and take its outcome.
    pub async fn wait(self) -> Result<SubmissionReport, SubmitError> {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(err) => Err(SubmitError::Aborted(err.to_string())),
        }
    }
}
