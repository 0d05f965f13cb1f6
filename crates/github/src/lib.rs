//! GitHub REST infrastructure adapter.
//!
//! Implements the [`checks::CheckRunApi`] port with [`GitHubRestClient`], a thin
//! client built on `octocrab` for the five REST endpoints check reporting needs:
//!
//! | Operation | Endpoint |
//! |-----------|----------|
//! | Pull request diff | `GET /repos/{owner}/{repo}/pulls/{number}` (`application/vnd.github.v3.diff`) |
//! | Workflow run | `GET /repos/{owner}/{repo}/actions/runs/{run_id}` |
//! | Check runs of a suite | `GET /repos/{owner}/{repo}/check-suites/{suite_id}/check-runs` |
//! | Create check run | `POST /repos/{owner}/{repo}/check-runs` |
//! | Update check run | `PATCH /repos/{owner}/{repo}/check-runs/{check_run_id}` |
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules. Retry and
//! lookup-before-create live in [`checks::CheckerClient`]; every method here
//! issues exactly one request.

pub mod client;
pub mod config;

pub use client::GitHubRestClient;
pub use config::{GitHubClientConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT};
