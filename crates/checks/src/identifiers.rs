//! Newtype identifiers for GitHub-owned resources.
//!
//! Every remote concept that has an identity is represented as a distinct newtype
//! wrapping a primitive. This prevents accidentally interchanging, for example,
//! a [`CheckRunId`] with a [`WorkflowRunId`] even though both are `u64` under the
//! hood.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Macro for u64-wrapped newtypes (GitHub-assigned integers).
// Generates: struct (Copy), new(), as_u64(), Display.
// ---------------------------------------------------------------------------
macro_rules! u64_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Creates a new identifier from a raw integer.
            pub fn new(value: u64) -> Self {
                Self(value)
            }

            /// Returns the underlying integer value.
            pub fn as_u64(self) -> u64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers — GitHub-integer-backed
// ---------------------------------------------------------------------------

u64_id! {
    /// Identifies a check run within a repository.
    CheckRunId
}

u64_id! {
    /// Identifies the check suite that groups the check runs of one commit
    /// or workflow execution.
    CheckSuiteId
}

u64_id! {
    /// Identifies one execution of a CI workflow.
    ///
    /// GitHub Actions exposes it to jobs as `GITHUB_RUN_ID`.
    WorkflowRunId
}

u64_id! {
    /// A pull request number (the `#42` shown in the UI), not its global node id.
    PullRequestNumber
}

impl WorkflowRunId {
    /// Parses a workflow run id from its decimal string form.
    ///
    /// Surrounding whitespace is ignored. Returns `None` for empty input,
    /// anything that is not an unsigned decimal integer, and zero (GitHub
    /// never assigns run id `0`).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().parse::<u64>() {
            Ok(0) | Err(_) => None,
            Ok(id) => Some(Self(id)),
        }
    }
}

// ---------------------------------------------------------------------------
// Identifiers — String-backed
// ---------------------------------------------------------------------------

string_id! {
    /// The user or organisation login that owns a repository.
    RepositoryOwner
}

string_id! {
    /// The name of a repository, without its owner.
    RepositoryName
}

string_id! {
    /// A Git commit SHA, full or abbreviated, passed to GitHub verbatim.
    ///
    /// Only emptiness is rejected, and only by `new`; GitHub validates the rest.
    CommitSha
}

// ---------------------------------------------------------------------------
// Repository reference
// ---------------------------------------------------------------------------

/// A repository addressed as `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub owner: RepositoryOwner,
    pub name: RepositoryName,
}

impl RepositoryRef {
    /// Creates a reference from its two parts, returning `None` if either is empty.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Option<Self> {
        Some(Self {
            owner: RepositoryOwner::new(owner)?,
            name: RepositoryName::new(name)?,
        })
    }

    /// Parses the `owner/name` form used by `GITHUB_REPOSITORY`.
    ///
    /// Exactly one `/` is accepted and both halves must be non-empty.
    pub fn parse(full_name: &str) -> Option<Self> {
        let (owner, name) = full_name.trim().split_once('/')?;
        if name.contains('/') {
            return None;
        }
        Self::new(owner, name)
    }
}

impl std::fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_run_id_parse_accepts_decimal() {
        assert_eq!(WorkflowRunId::parse("123456789"), Some(WorkflowRunId::new(123456789)));
        assert_eq!(WorkflowRunId::parse(" 42\n"), Some(WorkflowRunId::new(42)));
    }

    #[test]
    fn test_workflow_run_id_parse_rejects_malformed() {
        assert_eq!(WorkflowRunId::parse(""), None);
        assert_eq!(WorkflowRunId::parse("   "), None);
        assert_eq!(WorkflowRunId::parse("abc"), None);
        assert_eq!(WorkflowRunId::parse("-5"), None);
        assert_eq!(WorkflowRunId::parse("12.5"), None);
        assert_eq!(WorkflowRunId::parse("0"), None);
        assert_eq!(WorkflowRunId::parse("99999999999999999999999"), None);
    }

    #[test]
    fn test_string_ids_reject_empty() {
        assert!(RepositoryOwner::new("").is_none());
        assert!(CommitSha::new("").is_none());
        assert_eq!(RepositoryName::new("docs").map(|n| n.to_string()), Some("docs".to_string()));
    }

    #[test]
    fn test_commit_sha_accepts_abbreviated_values() {
        let short = CommitSha::new("ce58745").expect("abbreviated sha");
        assert_eq!(short.as_str(), "ce58745");
        let parsed: CommitSha = serde_json::from_str("\"ce58745\"").expect("deserialize");
        assert_eq!(parsed, short);
    }

    #[test]
    fn test_repository_ref_parse() {
        let repo = RepositoryRef::parse("octo-org/hello-world").expect("valid repository");
        assert_eq!(repo.owner.as_str(), "octo-org");
        assert_eq!(repo.name.as_str(), "hello-world");
        assert_eq!(repo.to_string(), "octo-org/hello-world");
    }

    #[test]
    fn test_repository_ref_parse_rejects_bad_shapes() {
        assert!(RepositoryRef::parse("no-slash").is_none());
        assert!(RepositoryRef::parse("/name").is_none());
        assert!(RepositoryRef::parse("owner/").is_none());
        assert!(RepositoryRef::parse("a/b/c").is_none());
    }

    #[test]
    fn test_u64_ids_serialize_as_plain_integers() {
        let json = serde_json::to_string(&CheckRunId::new(555)).expect("serialize");
        assert_eq!(json, "555");
        let id: CheckSuiteId = serde_json::from_str("9001").expect("deserialize");
        assert_eq!(id.as_u64(), 9001);
    }
}
