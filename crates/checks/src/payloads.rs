//! Request payloads for creating, updating and listing check runs.
//!
//! Unset optional fields are omitted from the serialised JSON rather than sent
//! as `null`: for `PATCH` requests GitHub treats an explicit `null` as "clear
//! this field", which is never what an unset option means here.

use serde::{Deserialize, Serialize};

use crate::{CheckConclusion, CheckStatus, CommitSha, GitHubError, Timestamp};

/// GitHub rejects requests carrying more annotations than this; callers must
/// batch larger sets over several updates.
pub const MAX_ANNOTATIONS_PER_REQUEST: usize = 50;

/// Maximum number of action buttons a check run may expose.
pub const MAX_ACTIONS: usize = 3;

// ---------------------------------------------------------------------------
// Output and annotations
// ---------------------------------------------------------------------------

/// Severity of an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationLevel {
    Notice,
    Warning,
    Failure,
}

/// A finding attached to a specific line range of a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRunAnnotation {
    pub path: String,
    pub start_line: u32,
    pub end_line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_column: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_column: Option<u32>,
    pub annotation_level: AnnotationLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_details: Option<String>,
}

/// The `output` object sent when creating or updating a check run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRunOutput {
    pub title: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<CheckRunAnnotation>,
}

impl CheckRunOutput {
    pub fn new(title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            text: None,
            annotations: Vec::new(),
        }
    }
}

/// A button GitHub renders on the check run, delivering a
/// `check_run.requested_action` webhook when pressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRunAction {
    pub label: String,
    pub description: String,
    pub identifier: String,
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Body of `POST /repos/{owner}/{repo}/check-runs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCheckRunOptions {
    pub name: String,
    pub head_sha: CommitSha,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CheckStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<CheckConclusion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<CheckRunOutput>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<CheckRunAction>,
}

impl CreateCheckRunOptions {
    /// Creates a payload carrying only the two required fields.
    pub fn new(name: impl Into<String>, head_sha: CommitSha) -> Self {
        Self {
            name: name.into(),
            head_sha,
            details_url: None,
            external_id: None,
            status: None,
            conclusion: None,
            started_at: None,
            completed_at: None,
            output: None,
            actions: Vec::new(),
        }
    }

    /// Checks the constraints GitHub enforces on this payload.
    pub fn validate(&self) -> Result<(), GitHubError> {
        if self.name.trim().is_empty() {
            return Err(invalid("check run name must not be empty"));
        }
        validate_common(
            self.status,
            self.conclusion,
            self.output.as_ref(),
            &self.actions,
        )
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// Body of `PATCH /repos/{owner}/{repo}/check-runs/{check_run_id}`.
///
/// Every field is optional; only the ones that are set are changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateCheckRunOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CheckStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<CheckConclusion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<CheckRunOutput>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<CheckRunAction>,
}

impl UpdateCheckRunOptions {
    /// Checks the constraints GitHub enforces on this payload.
    pub fn validate(&self) -> Result<(), GitHubError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(invalid("check run name must not be empty"));
            }
        }
        validate_common(
            self.status,
            self.conclusion,
            self.output.as_ref(),
            &self.actions,
        )
    }
}

fn validate_common(
    status: Option<CheckStatus>,
    conclusion: Option<CheckConclusion>,
    output: Option<&CheckRunOutput>,
    actions: &[CheckRunAction],
) -> Result<(), GitHubError> {
    match (status, conclusion) {
        (Some(status), Some(_)) if status != CheckStatus::Completed => {
            return Err(invalid(format!(
                "a conclusion requires status 'completed', got '{status}'"
            )));
        }
        (Some(CheckStatus::Completed), None) => {
            return Err(invalid("status 'completed' requires a conclusion"));
        }
        _ => {}
    }

    if let Some(output) = output {
        if output.annotations.len() > MAX_ANNOTATIONS_PER_REQUEST {
            return Err(invalid(format!(
                "{} annotations exceed the limit of {MAX_ANNOTATIONS_PER_REQUEST} per request",
                output.annotations.len()
            )));
        }
    }

    if actions.len() > MAX_ACTIONS {
        return Err(invalid(format!(
            "{} actions exceed the limit of {MAX_ACTIONS}",
            actions.len()
        )));
    }

    Ok(())
}

fn invalid(reason: impl Into<String>) -> GitHubError {
    GitHubError::InvalidPayload {
        reason: reason.into(),
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

/// Which check runs to return when several share a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckRunFilter {
    /// Only the most recent run of each name (GitHub's default).
    Latest,
    All,
}

/// Query parameters for listing the check runs of a check suite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListCheckRunsOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CheckStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<CheckRunFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sha() -> CommitSha {
        CommitSha::new("ce587453ced02b1526dfb4cb910479d431683101").expect("non-empty sha")
    }

    fn annotation(line: u32) -> CheckRunAnnotation {
        CheckRunAnnotation {
            path: "src/lib.rs".to_string(),
            start_line: line,
            end_line: line,
            start_column: None,
            end_column: None,
            annotation_level: AnnotationLevel::Warning,
            message: "unused variable".to_string(),
            title: None,
            raw_details: None,
        }
    }

    #[test]
    fn test_create_payload_omits_unset_fields() {
        let mut opts = CreateCheckRunOptions::new("reviewdog", sha());
        opts.status = Some(CheckStatus::InProgress);

        let json = serde_json::to_value(&opts).expect("serialize");

        assert_eq!(
            json,
            serde_json::json!({
                "name": "reviewdog",
                "head_sha": "ce587453ced02b1526dfb4cb910479d431683101",
                "status": "in_progress"
            })
        );
    }

    #[test]
    fn test_update_payload_serializes_output_and_annotations() {
        let mut output = CheckRunOutput::new("lint", "1 warning");
        output.annotations.push(annotation(3));
        let opts = UpdateCheckRunOptions {
            status: Some(CheckStatus::Completed),
            conclusion: Some(CheckConclusion::Neutral),
            output: Some(output),
            ..Default::default()
        };

        let json = serde_json::to_value(&opts).expect("serialize");

        assert_eq!(json["conclusion"], "neutral");
        assert_eq!(json["output"]["annotations"][0]["annotation_level"], "warning");
        assert_eq!(json["output"]["annotations"][0]["start_line"], 3);
        assert!(json["output"]["annotations"][0].get("title").is_none());
        assert!(json.get("name").is_none());
    }

    #[test]
    fn test_empty_update_serializes_to_empty_object() {
        let json = serde_json::to_value(UpdateCheckRunOptions::default()).expect("serialize");
        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn test_validate_accepts_conclusion_without_status() {
        let opts = UpdateCheckRunOptions {
            conclusion: Some(CheckConclusion::Success),
            ..Default::default()
        };
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_conclusion_with_non_completed_status() {
        let opts = UpdateCheckRunOptions {
            status: Some(CheckStatus::InProgress),
            conclusion: Some(CheckConclusion::Success),
            ..Default::default()
        };
        assert!(matches!(opts.validate(), Err(GitHubError::InvalidPayload { .. })));
    }

    #[test]
    fn test_validate_rejects_completed_without_conclusion() {
        let mut opts = CreateCheckRunOptions::new("reviewdog", sha());
        opts.status = Some(CheckStatus::Completed);
        assert!(matches!(opts.validate(), Err(GitHubError::InvalidPayload { .. })));
    }

    #[test]
    fn test_validate_rejects_too_many_annotations() {
        let mut output = CheckRunOutput::new("lint", "many findings");
        output.annotations = (1..=51).map(annotation).collect();
        let opts = UpdateCheckRunOptions {
            output: Some(output),
            ..Default::default()
        };

        let err = opts.validate().expect_err("51 annotations must be rejected");
        assert!(err.to_string().contains("51 annotations"));
    }

    #[test]
    fn test_validate_accepts_annotation_limit_exactly() {
        let mut output = CheckRunOutput::new("lint", "many findings");
        output.annotations = (1..=50).map(annotation).collect();
        let opts = UpdateCheckRunOptions {
            output: Some(output),
            ..Default::default()
        };
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_too_many_actions() {
        let mut opts = CreateCheckRunOptions::new("reviewdog", sha());
        opts.actions = (0..4)
            .map(|i| CheckRunAction {
                label: format!("Fix {i}"),
                description: "Apply suggestion".to_string(),
                identifier: format!("fix_{i}"),
            })
            .collect();
        assert!(matches!(opts.validate(), Err(GitHubError::InvalidPayload { .. })));
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let opts = CreateCheckRunOptions::new("  ", sha());
        assert!(opts.validate().is_err());
    }

    #[test]
    fn test_list_options_serialize_as_query_fields() {
        let opts = ListCheckRunsOptions {
            check_name: Some("reviewdog".to_string()),
            filter: Some(CheckRunFilter::All),
            per_page: Some(100),
            ..Default::default()
        };
        let json = serde_json::to_value(&opts).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({ "check_name": "reviewdog", "filter": "all", "per_page": 100 })
        );
    }
}
