//! Port traits implemented by infrastructure crates.
//!
//! [`CheckRunApi`] is the narrow slice of the GitHub REST API the façade needs.
//! [`Sleeper`] abstracts the delay between retry attempts so it can be
//! replaced in tests.

use std::time::Duration;

use async_trait::async_trait;

use crate::{
    CheckRun, CheckRunId, CheckRunList, CheckSuiteId, CreateCheckRunOptions, GitHubError,
    ListCheckRunsOptions, PullRequestDiff, PullRequestNumber, RepositoryRef,
    UpdateCheckRunOptions, WorkflowRun, WorkflowRunId,
};

/// The remote operations used to report check runs.
///
/// Each method maps to exactly one REST call. Implementations must not retry
/// or fall back on their own: those policies belong to [`crate::CheckerClient`].
#[async_trait]
pub trait CheckRunApi: Send + Sync {
    /// Fetches the unified diff of a pull request, unmodified.
    async fn get_pull_request_raw_diff(
        &self,
        repo: &RepositoryRef,
        number: PullRequestNumber,
    ) -> Result<PullRequestDiff, GitHubError>;

    /// Fetches a GitHub Actions workflow run.
    async fn get_workflow_run(
        &self,
        repo: &RepositoryRef,
        run_id: WorkflowRunId,
    ) -> Result<WorkflowRun, GitHubError>;

    /// Lists the check runs belonging to a check suite.
    async fn list_check_runs_for_suite(
        &self,
        repo: &RepositoryRef,
        suite_id: CheckSuiteId,
        options: &ListCheckRunsOptions,
    ) -> Result<CheckRunList, GitHubError>;

    /// Creates a new check run.
    async fn create_check_run(
        &self,
        repo: &RepositoryRef,
        options: &CreateCheckRunOptions,
    ) -> Result<CheckRun, GitHubError>;

    /// Updates an existing check run.
    async fn update_check_run(
        &self,
        repo: &RepositoryRef,
        check_run_id: CheckRunId,
        options: &UpdateCheckRunOptions,
    ) -> Result<CheckRun, GitHubError>;
}

/// Suspends the caller between retry attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
