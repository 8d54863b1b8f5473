//! The complaint submission flow: validate, upload each selected photo
//! in order, compose one body, send one email.

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use gripe_types::data_url;
use gripe_types::models::Photo;
use gripe_types::report::{SubmissionReport, UploadOutcome, UploadResult};

use crate::compose::{ComplaintDraft, compose_body};
use crate::config::DispatchConfig;
use crate::error::SubmitError;
use crate::image_host::ImageHost;
use crate::mailer::{EmailParams, Mailer};
use crate::progress::{Phase, SubmissionProgress};

/// Run one submission attempt.
///
/// Uploads are strictly sequential; the order of lines in the body
/// matches the order of `selected`. A photo-level upload failure is
/// recorded as a marker and the flow continues; only validation and
/// the email send itself can fail the attempt. On success the draft is
/// cleared; on failure it is preserved for manual resubmission.
pub async fn submit(
    draft: &mut ComplaintDraft,
    photos: &[Photo],
    selected: &[Uuid],
    config: &DispatchConfig,
    host: &dyn ImageHost,
    mailer: &dyn Mailer,
    progress: &SubmissionProgress,
) -> Result<SubmissionReport, SubmitError> {
    progress.set_phase(Phase::Validating);

    // Service configuration first, then the form fields. A rejection
    // returns the attempt to Idle; it never reaches the network.
    if !config.is_complete() {
        return reject(
            progress,
            "Configuration error: missing service settings; check your environment.",
        );
    }
    if draft.subject.trim().is_empty() || draft.message.trim().is_empty() {
        return reject(progress, "Please fill in both subject and message fields.");
    }

    progress.set_status("Processing...");

    // -- Upload stage --
    progress.set_phase(Phase::UploadingImages);

    // Selected ids with no matching photo are skipped silently.
    let picked: Vec<&Photo> = selected
        .iter()
        .filter_map(|id| photos.iter().find(|photo| photo.id == *id))
        .collect();

    if !picked.is_empty() {
        progress.set_status(format!("Uploading {} image(s)...", picked.len()));
    }

    let mut uploads = Vec::with_capacity(picked.len());
    for photo in picked {
        let outcome = upload_photo(host, photo).await;
        if let UploadResult::Failed { reason } = &outcome.result {
            warn!("Upload of {} failed: {}", outcome.filename, reason);
        }
        uploads.push(outcome);
    }

    // -- Email stage --
    progress.set_phase(Phase::SendingEmail);
    progress.set_status("Sending email...");

    let sent_at = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
    let body = compose_body(draft, &uploads, &sent_at);
    let params = EmailParams {
        name: config.sender_name.clone(),
        time: sent_at.clone(),
        message: body.clone(),
    };

    if let Err(err) = mailer.send(&params).await {
        progress.set_status(format!("Failed to send complaint: {err}"));
        progress.set_phase(Phase::Failed);
        return Err(err.into());
    }

    let failures = uploads.iter().filter(|u| !u.is_uploaded()).count();
    info!(
        "Complaint sent ({} photo(s), {} upload failure(s))",
        uploads.len(),
        failures
    );

    progress.set_status("Complaint sent successfully!");
    progress.set_phase(Phase::Succeeded);
    draft.clear();

    Ok(SubmissionReport {
        body,
        uploads,
        sent_at,
    })
}

fn reject(
    progress: &SubmissionProgress,
    message: &str,
) -> Result<SubmissionReport, SubmitError> {
    progress.set_status(message);
    progress.set_phase(Phase::Idle);
    Err(SubmitError::Validation(message.to_string()))
}

/// Decode the stored payload and upload it. Every error becomes a
/// failure outcome for this photo alone.
async fn upload_photo(host: &dyn ImageHost, photo: &Photo) -> UploadOutcome {
    let result = match data_url::decode(&photo.data_url) {
        Ok(decoded) => match host.upload(&photo.filename, &decoded.mime, decoded.bytes).await {
            Ok(url) => UploadResult::Uploaded { url },
            Err(err) => UploadResult::Failed {
                reason: err.to_string(),
            },
        },
        Err(err) => UploadResult::Failed {
            reason: err.to_string(),
        },
    };

    UploadOutcome {
        filename: photo.filename.clone(),
        result,
    }
}
