//! Complaint form state and the plain-text email body.
//!
//! The body is the entire payload of a complaint: subject, message, any
//! raw URLs the user typed, and the per-photo upload results are all
//! embedded as text sections. The delivery API carries no structured
//! fields beyond this (and the sender label and timestamp).

use gripe_types::report::UploadOutcome;

/// Form state for one complaint. `image_urls` is caller-supplied free
/// text, embedded in the body unvalidated.
#[derive(Debug, Clone, Default)]
pub struct ComplaintDraft {
    pub subject: String,
    pub message: String,
    pub image_urls: String,
}

impl ComplaintDraft {
    pub fn new(subject: &str, message: &str) -> Self {
        Self {
            subject: subject.to_string(),
            message: message.to_string(),
            image_urls: String::new(),
        }
    }

    /// The non-blank lines of the raw URL text, trimmed. Used by
    /// preview surfaces; the email body embeds the raw text as typed.
    pub fn image_url_lines(&self) -> Vec<&str> {
        self.image_urls
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }

    /// Reset every field, as a successful submission does.
    pub fn clear(&mut self) {
        self.subject.clear();
        self.message.clear();
        self.image_urls.clear();
    }
}

/// Compose the email body. Section order is fixed: subject, message,
/// raw image URLs (only when non-blank), uploaded-photo lines (only
/// when at least one photo was selected), timestamp.
pub fn compose_body(draft: &ComplaintDraft, uploads: &[UploadOutcome], sent_at: &str) -> String {
    let mut body = format!("Subject: {}\n\n", draft.subject);
    body.push_str(&format!("Message:\n{}\n\n", draft.message));

    if !draft.image_urls.trim().is_empty() {
        body.push_str(&format!("Image URLs:\n{}\n\n", draft.image_urls));
    }

    if !uploads.is_empty() {
        let lines: Vec<String> = uploads.iter().map(UploadOutcome::body_line).collect();
        body.push_str(&format!("Uploaded Photos:\n{}\n\n", lines.join("\n")));
    }

    body.push_str(&format!("Sent at: {sent_at}"));
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use gripe_types::report::UploadResult;

    fn outcome(filename: &str, result: UploadResult) -> UploadOutcome {
        UploadOutcome {
            filename: filename.to_string(),
            result,
        }
    }

    #[test]
    fn body_with_every_section_in_order() {
        let draft = ComplaintDraft {
            subject: "Broken bench".into(),
            message: "The bench in the park is broken.".into(),
            image_urls: "https://example.com/a.jpg\nhttps://example.com/b.jpg".into(),
        };
        let uploads = [
            outcome(
                "p1.jpg",
                UploadResult::Uploaded {
                    url: "https://cdn.example/p1".into(),
                },
            ),
            outcome(
                "p2.jpg",
                UploadResult::Failed {
                    reason: "status 500".into(),
                },
            ),
        ];

        let body = compose_body(&draft, &uploads, "2026-03-01 10:15:00 UTC");

        assert_eq!(
            body,
            "Subject: Broken bench\n\n\
             Message:\nThe bench in the park is broken.\n\n\
             Image URLs:\nhttps://example.com/a.jpg\nhttps://example.com/b.jpg\n\n\
             Uploaded Photos:\np1.jpg: https://cdn.example/p1\np2.jpg: Upload failed\n\n\
             Sent at: 2026-03-01 10:15:00 UTC"
        );
    }

    #[test]
    fn optional_sections_are_omitted_when_empty() {
        let draft = ComplaintDraft::new("Subject", "Message");
        let body = compose_body(&draft, &[], "2026-03-01 10:15:00 UTC");

        assert!(!body.contains("Image URLs:"));
        assert!(!body.contains("Uploaded Photos:"));
        assert!(body.ends_with("Sent at: 2026-03-01 10:15:00 UTC"));
    }

    #[test]
    fn whitespace_only_url_text_is_treated_as_absent() {
        let mut draft = ComplaintDraft::new("Subject", "Message");
        draft.image_urls = "   \n  ".into();

        let body = compose_body(&draft, &[], "now");
        assert!(!body.contains("Image URLs:"));
    }

    #[test]
    fn url_lines_are_trimmed_and_filtered() {
        let mut draft = ComplaintDraft::new("s", "m");
        draft.image_urls = "  https://a.example/x.jpg  \n\n https://b.example/y.jpg\n".into();

        assert_eq!(
            draft.image_url_lines(),
            ["https://a.example/x.jpg", "https://b.example/y.jpg"]
        );
    }

    #[test]
    fn clear_resets_every_field() {
        let mut draft = ComplaintDraft {
            subject: "s".into(),
            message: "m".into(),
            image_urls: "u".into(),
        };
        draft.clear();

        assert!(draft.subject.is_empty());
        assert!(draft.message.is_empty());
        assert!(draft.image_urls.is_empty());
    }
}
