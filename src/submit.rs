//! Issue submission. A draft is validated locally, classified by the
//! server, and only then submitted; a submission the server recognizes as a
//! duplicate is reported as an upvote of the original, not a new issue.

use serde_json::json;

use crate::client::{CivicClient, MultipartPayload};
use crate::error::{CivicError, Result};
use crate::responses::{ClassifyResponse, SubmitResponse};
use crate::types::IssueDraft;

/// The classifier's verdict for the draft, kept around after a failed
/// submission so the user can see what was attempted.
#[derive(Debug, Clone)]
pub struct Classification {
    pub department: String,
    pub severity: String,
}

#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// Merged into an existing issue as an upvote; no new record exists.
    Duplicate { original_issue_id: Option<u64> },
    Created {
        id: Option<u64>,
        department: String,
        severity: String,
    },
}

impl SubmitOutcome {
    pub fn notice(&self) -> String {
        match self {
            SubmitOutcome::Duplicate {
                original_issue_id: Some(id),
            } => format!(
                "This issue is a duplicate of issue #{id}. \
                 Your submission has been recorded as an upvote."
            ),
            SubmitOutcome::Duplicate {
                original_issue_id: None,
            } => "This issue duplicates an existing report. \
                  Your submission has been recorded as an upvote."
                .to_string(),
            SubmitOutcome::Created {
                severity,
                department,
                ..
            } => format!(
                "Issue submitted successfully! Severity: {severity}, Department: {department}"
            ),
        }
    }
}

pub struct ReportSession {
    pub draft: IssueDraft,
    preview: Option<Classification>,
    in_flight: bool,
}

impl ReportSession {
    pub fn new(draft: IssueDraft) -> Self {
        Self {
            draft,
            preview: None,
            in_flight: false,
        }
    }

    /// The last classification attempted, cleared only on success.
    pub fn preview(&self) -> Option<&Classification> {
        self.preview.as_ref()
    }

    /// Gates voice capture and other cross-component activity.
    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// Validate, classify, submit. On success the draft and preview are
    /// reset; on failure both are retained. The in-flight flag drops on
    /// every exit path.
    pub async fn submit(&mut self, client: &mut CivicClient) -> Result<SubmitOutcome> {
        if self.in_flight {
            return Err(CivicError::Validation(
                "A submission is already in progress.".to_string(),
            ));
        }

        self.in_flight = true;
        let result = self.submit_inner(client).await;
        self.in_flight = false;

        if result.is_ok() {
            self.draft = IssueDraft::default();
            self.preview = None;
        }
        result
    }

    async fn submit_inner(&mut self, client: &mut CivicClient) -> Result<SubmitOutcome> {
        let title = self.draft.title.trim().to_string();
        if title.is_empty() {
            return Err(CivicError::Validation("Title is required.".to_string()));
        }
        let description = self.draft.description.trim().to_string();
        if description.is_empty() {
            return Err(CivicError::Validation(
                "Description is required.".to_string(),
            ));
        }

        let classify: ClassifyResponse = client
            .post(
                "/api/classify-issue/",
                json!({
                    "description": description,
                    "latitude": self.draft.latitude,
                    "longitude": self.draft.longitude,
                }),
            )
            .await?;

        // An unclassified issue must never reach the submission endpoint.
        let department = classify.department.unwrap_or_default();
        let severity = classify.severity.unwrap_or_default();
        if department.trim().is_empty() || severity.trim().is_empty() {
            return Err(CivicError::Classification);
        }
        self.preview = Some(Classification {
            department: department.clone(),
            severity: severity.clone(),
        });

        let mut payload = MultipartPayload::new()
            .text("title", title)
            .text("description", description)
            .text("latitude", self.draft.latitude_field())
            .text("longitude", self.draft.longitude_field());
        if let Some(photo) = &self.draft.photo {
            payload = payload.file("photo", photo)?;
        }
        let payload = payload
            .text("category", department.clone())
            .text("severity", severity.clone());

        let response: SubmitResponse = client
            .post_multipart("/api/issues/submit/", &payload)
            .await?;

        if response.is_duplicate {
            Ok(SubmitOutcome::Duplicate {
                original_issue_id: response.original_issue_id,
            })
        } else {
            Ok(SubmitOutcome::Created {
                id: response.id,
                department,
                severity,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_notice_names_the_original() {
        let outcome = SubmitOutcome::Duplicate {
            original_issue_id: Some(42),
        };
        let notice = outcome.notice();
        assert!(notice.contains("42"));
        assert!(notice.contains("upvote"));
    }

    #[test]
    fn created_notice_shows_classification() {
        let outcome = SubmitOutcome::Created {
            id: Some(7),
            department: "Water Board".to_string(),
            severity: "High".to_string(),
        };
        let notice = outcome.notice();
        assert!(notice.contains("Water Board"));
        assert!(notice.contains("High"));
    }
}
