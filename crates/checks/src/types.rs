//! Value types mirroring the GitHub REST schema for check runs, workflow runs,
//! and pull request diffs.
//!
//! These types are owned by the remote API: field names and enum spellings
//! follow GitHub's JSON exactly so they can be (de)serialised without any
//! translation layer. Request payloads live in [`crate::payloads`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CheckRunId, CheckSuiteId, CommitSha, WorkflowRunId};

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly. Serialised as an RFC 3339 string, which is what GitHub expects
/// for `started_at` and `completed_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

// ---------------------------------------------------------------------------
// Status and conclusion
// ---------------------------------------------------------------------------

/// Progress of a check run.
///
/// `waiting`, `requested` and `pending` may only be set by GitHub Actions;
/// they are accepted here because the API reports them back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Queued,
    InProgress,
    Completed,
    Waiting,
    Requested,
    Pending,
}

impl CheckStatus {
    /// Returns the wire spelling of this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Waiting => "waiting",
            Self::Requested => "requested",
            Self::Pending => "pending",
        }
    }
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CheckStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(Self::Queued),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "waiting" => Ok(Self::Waiting),
            "requested" => Ok(Self::Requested),
            "pending" => Ok(Self::Pending),
            other => Err(format!("unknown check status '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------

/// Final outcome of a completed check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckConclusion {
    ActionRequired,
    Cancelled,
    Failure,
    Neutral,
    Success,
    Skipped,
    Stale,
    TimedOut,
}

impl CheckConclusion {
    /// Returns the wire spelling of this conclusion.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ActionRequired => "action_required",
            Self::Cancelled => "cancelled",
            Self::Failure => "failure",
            Self::Neutral => "neutral",
            Self::Success => "success",
            Self::Skipped => "skipped",
            Self::Stale => "stale",
            Self::TimedOut => "timed_out",
        }
    }
}

impl std::fmt::Display for CheckConclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CheckConclusion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "action_required" => Ok(Self::ActionRequired),
            "cancelled" => Ok(Self::Cancelled),
            "failure" => Ok(Self::Failure),
            "neutral" => Ok(Self::Neutral),
            "success" => Ok(Self::Success),
            "skipped" => Ok(Self::Skipped),
            "stale" => Ok(Self::Stale),
            "timed_out" => Ok(Self::TimedOut),
            other => Err(format!("unknown check conclusion '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Check runs
// ---------------------------------------------------------------------------

/// The `output` object as GitHub reports it on a check run.
///
/// Annotations are not echoed back; only their count is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckRunOutputSummary {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub text: Option<String>,
    #[serde(default)]
    pub annotations_count: u64,
}

/// Reference to the check suite a check run belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSuiteRef {
    pub id: CheckSuiteId,
}

/// A check run as returned by the GitHub API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRun {
    pub id: CheckRunId,
    pub name: String,
    pub head_sha: CommitSha,
    pub status: Option<CheckStatus>,
    pub conclusion: Option<CheckConclusion>,
    pub external_id: Option<String>,
    pub details_url: Option<String>,
    pub html_url: Option<String>,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub output: Option<CheckRunOutputSummary>,
    pub check_suite: Option<CheckSuiteRef>,
}

/// One page of check runs belonging to a check suite.
///
/// `total_count` is the number of matching runs across all pages, so it may
/// exceed `check_runs.len()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckRunList {
    pub total_count: u64,
    #[serde(default)]
    pub check_runs: Vec<CheckRun>,
}

// ---------------------------------------------------------------------------
// Workflow runs
// ---------------------------------------------------------------------------

/// The subset of a GitHub Actions workflow run needed to find its check suite.
///
/// `status` and `conclusion` are kept as strings because workflow runs use a
/// wider vocabulary than check runs (e.g. `startup_failure`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRun {
    pub id: WorkflowRunId,
    pub check_suite_id: Option<CheckSuiteId>,
    pub head_sha: Option<CommitSha>,
    pub status: Option<String>,
    pub conclusion: Option<String>,
}

// ---------------------------------------------------------------------------
// Diffs
// ---------------------------------------------------------------------------

/// The unified diff of a pull request, exactly as the API returned it.
///
/// The bytes are never decoded or normalised; diffs may contain content in
/// any encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestDiff(Vec<u8>);

impl PullRequestDiff {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for PullRequestDiff {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}
