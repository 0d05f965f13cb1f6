//! The check-run façade used by CI reporters.
//!
//! [`Checker`] is the entire caller-facing surface: fetch a pull request diff,
//! create a check run, update a check run. [`CheckerClient`] implements it on
//! top of any [`CheckRunApi`], adding two behaviours the raw API lacks:
//!
//! - **Lookup before create.** A CI job may be restarted within the same
//!   workflow run. Before creating a check run, the client looks for one
//!   already attached to the workflow run's check suite and returns it
//!   instead of posting a duplicate. The create payload is validated only
//!   when a creation request is actually about to be sent.
//! - **Retried updates.** GitHub intermittently rejects valid credentials on
//!   update. Updates are attempted up to [`RetrySchedule::max_attempts`]
//!   times with a fixed pause in between.
//!
//! Lookup failures of any kind (missing run id, network error, API error)
//! fall through to creation. A transient error during lookup can therefore
//! still produce a duplicate check run; the lookup is best-effort only.

use async_trait::async_trait;
use tracing::{debug, error, info, instrument};

use crate::{
    CheckRun, CheckRunApi, CheckRunId, CreateCheckRunOptions, GitHubError,
    ListCheckRunsOptions, PullRequestDiff, PullRequestNumber, RepositoryRef, RetrySchedule,
    Sleeper, TokioSleeper, UpdateCheckRunOptions, WorkflowRunId,
};

/// Operations a CI reporter performs against the code host.
#[async_trait]
pub trait Checker: Send + Sync {
    /// Returns the unified diff of a pull request, byte for byte.
    ///
    /// Errors are returned unchanged; no retry is attempted.
    async fn get_pull_request_diff(
        &self,
        repo: &RepositoryRef,
        number: PullRequestNumber,
    ) -> Result<PullRequestDiff, GitHubError>;

    /// Returns the check run of the current workflow run, creating it if no
    /// existing one can be found.
    ///
    /// `workflow_run` identifies the current workflow run. `None` means it is
    /// unknown, in which case a new check run is always created.
    async fn create_check_run(
        &self,
        repo: &RepositoryRef,
        options: &CreateCheckRunOptions,
        workflow_run: Option<WorkflowRunId>,
    ) -> Result<CheckRun, GitHubError>;

    /// Updates a check run, retrying on failure.
    ///
    /// Returns the first successful response, or the error of the final
    /// attempt once the retry schedule is exhausted.
    async fn update_check_run(
        &self,
        repo: &RepositoryRef,
        check_run_id: CheckRunId,
        options: &UpdateCheckRunOptions,
    ) -> Result<CheckRun, GitHubError>;
}

/// [`Checker`] implementation over a [`CheckRunApi`].
pub struct CheckerClient<A, S = TokioSleeper> {
    api: A,
    sleeper: S,
    retry: RetrySchedule,
}

impl<A: CheckRunApi> CheckerClient<A> {
    /// Creates a client that waits on the tokio timer between update attempts.
    pub fn new(api: A) -> Self {
        Self::with_sleeper(api, TokioSleeper)
    }
}

impl<A: CheckRunApi, S: Sleeper> CheckerClient<A, S> {
    /// Creates a client with a custom [`Sleeper`] and the default retry schedule.
    pub fn with_sleeper(api: A, sleeper: S) -> Self {
        Self {
            api,
            sleeper,
            retry: RetrySchedule::default(),
        }
    }

    /// Replaces the retry schedule used by [`Checker::update_check_run`].
    pub fn with_retry_schedule(mut self, retry: RetrySchedule) -> Self {
        self.retry = retry;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    pub fn retry_schedule(&self) -> RetrySchedule {
        self.retry
    }

    /// Finds the first check run attached to the workflow run's check suite.
    ///
    /// `Ok(None)` means the lookup succeeded and the suite has no check runs.
    async fn find_existing_check_run(
        &self,
        repo: &RepositoryRef,
        workflow_run: Option<WorkflowRunId>,
    ) -> Result<Option<CheckRun>, GitHubError> {
        let run_id = workflow_run.ok_or(GitHubError::MissingWorkflowRunId)?;
        let run = self.api.get_workflow_run(repo, run_id).await?;
        let suite_id = run
            .check_suite_id
            .ok_or(GitHubError::MissingCheckSuite { run_id })?;

        let list = self
            .api
            .list_check_runs_for_suite(repo, suite_id, &ListCheckRunsOptions::default())
            .await?;
        if list.total_count == 0 {
            return Ok(None);
        }
        Ok(list.check_runs.into_iter().next())
    }
}

#[async_trait]
impl<A: CheckRunApi, S: Sleeper> Checker for CheckerClient<A, S> {
    #[instrument(skip_all, fields(repo = %repo, number = %number))]
    async fn get_pull_request_diff(
        &self,
        repo: &RepositoryRef,
        number: PullRequestNumber,
    ) -> Result<PullRequestDiff, GitHubError> {
        self.api.get_pull_request_raw_diff(repo, number).await
    }

    #[instrument(skip_all, fields(repo = %repo, name = %options.name))]
    async fn create_check_run(
        &self,
        repo: &RepositoryRef,
        options: &CreateCheckRunOptions,
        workflow_run: Option<WorkflowRunId>,
    ) -> Result<CheckRun, GitHubError> {
        match self.find_existing_check_run(repo, workflow_run).await {
            Ok(Some(existing)) => {
                info!(check_run_id = %existing.id, "Reusing existing check run");
                return Ok(existing);
            }
            Ok(None) => {
                debug!("No check run exists for the current check suite, creating new check");
            }
            Err(err) => {
                error!(error = %err, "Unable to find existing check, creating new check");
            }
        }

        options.validate()?;
        self.api.create_check_run(repo, options).await
    }

    #[instrument(skip_all, fields(repo = %repo, check_run_id = %check_run_id))]
    async fn update_check_run(
        &self,
        repo: &RepositoryRef,
        check_run_id: CheckRunId,
        options: &UpdateCheckRunOptions,
    ) -> Result<CheckRun, GitHubError> {
        options.validate()?;

        let mut attempt = 1;
        loop {
            let err = match self.api.update_check_run(repo, check_run_id, options).await {
                Ok(check_run) => return Ok(check_run),
                Err(err) => err,
            };

            match err.response_body() {
                Some(body) => {
                    error!(attempt, status = err.status(), body, "Failed to update check run")
                }
                None => error!(attempt, error = %err, "Failed to update check run"),
            }

            if !self.retry.has_attempt_after(attempt) {
                return Err(err);
            }

            debug!(attempt, "Retrying check run update");
            self.sleeper.sleep(self.retry.delay()).await;
            attempt += 1;
        }
    }
}
