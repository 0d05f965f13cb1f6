//! Check-run reporting domain for CI integrations.
//!
//! This crate contains the GitHub-owned value types a CI reporter exchanges
//! with the code host, the port traits infrastructure crates implement, and the
//! [`CheckerClient`] façade that layers lookup-before-create and retried
//! updates over any [`CheckRunApi`].
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate performs no network I/O.
//! It defines *what* is needed; the `github` crate defines *how* to reach the
//! REST API.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`CheckRunId`, `WorkflowRunId`, `RepositoryRef`, etc.) |
//! | [`types`] | Response types (`CheckRun`, `WorkflowRun`, `PullRequestDiff`, etc.) |
//! | [`payloads`] | Request payloads and their validation |
//! | [`errors`] | [`GitHubError`] |
//! | [`api`] | Port traits [`CheckRunApi`] and [`Sleeper`] |
//! | [`retry`] | [`RetrySchedule`] |
//! | [`checker`] | The [`Checker`] façade and [`CheckerClient`] |

pub mod api;
pub mod checker;
pub mod errors;
pub mod identifiers;
pub mod payloads;
pub mod retry;
pub mod types;

#[cfg(test)]
mod testing;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use api::{CheckRunApi, Sleeper, TokioSleeper};
pub use checker::{Checker, CheckerClient};
pub use errors::GitHubError;
pub use identifiers::{
    CheckRunId, CheckSuiteId, CommitSha, PullRequestNumber, RepositoryName, RepositoryOwner,
    RepositoryRef, WorkflowRunId,
};
pub use payloads::{
    AnnotationLevel, CheckRunAction, CheckRunAnnotation, CheckRunFilter, CheckRunOutput,
    CreateCheckRunOptions, ListCheckRunsOptions, UpdateCheckRunOptions, MAX_ACTIONS,
    MAX_ANNOTATIONS_PER_REQUEST,
};
pub use retry::RetrySchedule;
pub use types::{
    CheckConclusion, CheckRun, CheckRunList, CheckRunOutputSummary, CheckStatus, CheckSuiteRef,
    PullRequestDiff, Timestamp, WorkflowRun,
};
