//! Error type shared by the [`crate::CheckRunApi`] port and the check-run façade.
//!
//! Infrastructure adapters translate their transport-specific failures into
//! [`GitHubError`] so the façade can log and retry without knowing which HTTP
//! client produced them.

use thiserror::Error;

use crate::WorkflowRunId;

/// Failures raised while talking to the GitHub API or preparing a request for it.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// The request never produced an HTTP response (DNS, TLS, connection reset,
    /// client-side timeout).
    #[error("GitHub request failed: {message}")]
    Transport {
        /// Description of the underlying transport failure.
        message: String,
    },

    /// GitHub answered with a non-success status code.
    #[error("GitHub API returned {status}: {message}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// GitHub's `message` field, or the canonical reason phrase when the
        /// body carried none.
        message: String,
        /// Raw response body. Empty when the body could not be read.
        body: String,
    },

    /// A success response whose body did not match the expected schema.
    #[error("Failed to decode GitHub response: {message}")]
    Decode {
        /// Description of the decoding failure.
        message: String,
    },

    /// No workflow run id was available, so the current run's check suite
    /// cannot be located.
    #[error("No workflow run id available to locate an existing check run")]
    MissingWorkflowRunId,

    /// The workflow run exists but GitHub did not report a check suite for it.
    #[error("Workflow run {run_id} has no associated check suite")]
    MissingCheckSuite {
        /// The workflow run that was looked up.
        run_id: WorkflowRunId,
    },

    /// An outgoing payload violates a constraint GitHub documents for it.
    ///
    /// Detected locally before any request is sent; never retried.
    #[error("Invalid check run payload: {reason}")]
    InvalidPayload {
        /// Which constraint was violated.
        reason: String,
    },

    /// The client was configured with values that cannot produce a request
    /// (e.g. an unparsable base URL or a token with invalid header bytes).
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },
}

impl GitHubError {
    /// Returns the raw response body captured with an [`GitHubError::Api`] error.
    ///
    /// `None` for errors that never saw a response.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::Api { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Returns the HTTP status for [`GitHubError::Api`] errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
