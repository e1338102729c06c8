//! Core data types

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A local branch
///
/// Branches are compared by name only; `last_commit_date` is filled in by
/// the recency listing and absent everywhere else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Short branch name (e.g. `feature/login`)
    pub name: String,
    /// Committer date of the tip, `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_commit_date: Option<String>,
}

impl Branch {
    /// Create a branch without date information
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            last_commit_date: None,
        }
    }

    /// Create a branch carrying its last commit date
    pub fn with_date(name: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            last_commit_date: Some(date.into()),
        }
    }
}

/// Outcome of a purge classification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    purgeable: Vec<Branch>,
    warnings: Vec<String>,
}

impl ClassificationResult {
    pub(crate) fn new(purgeable: Vec<Branch>, warnings: Vec<String>) -> Self {
        Self {
            purgeable,
            warnings,
        }
    }

    /// Branches safe to offer for deletion, in first-seen order
    pub fn purgeable(&self) -> &[Branch] {
        &self.purgeable
    }

    /// Human-readable notes about detectors that failed
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Names of the purgeable branches
    pub fn names(&self) -> Vec<String> {
        self.purgeable.iter().map(|b| b.name.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.purgeable.is_empty()
    }
}

/// Opaque commit identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommitId(pub String);

/// Opaque tree identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreeId(pub String);

impl CommitId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TreeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One line of an upstream comparison
///
/// `equivalent` is true when an equivalent change already exists upstream
/// (`-` in `git cherry` output) and false for genuinely new work (`+`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamCommit {
    pub commit: CommitId,
    pub equivalent: bool,
}

/// Tip commit time of a local branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchActivity {
    pub name: String,
    pub committed_at: DateTime<FixedOffset>,
}

impl BranchActivity {
    /// Convert to a `Branch` carrying the short date
    pub fn to_branch(&self) -> Branch {
        Branch::with_date(
            self.name.clone(),
            self.committed_at.format("%Y-%m-%d").to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_serialization_skips_missing_date() {
        let out = toml::to_string(&Branch::new("feature")).unwrap();
        assert!(!out.contains("last_commit_date"));

        let out = toml::to_string(&Branch::with_date("feature", "2026-01-02")).unwrap();
        assert!(out.contains("last_commit_date = \"2026-01-02\""));
    }

    #[test]
    fn test_activity_short_date() {
        let activity = BranchActivity {
            name: "feature".to_string(),
            committed_at: DateTime::parse_from_rfc3339("2026-03-04T23:30:00+02:00").unwrap(),
        };
        assert_eq!(
            activity.to_branch(),
            Branch::with_date("feature", "2026-03-04")
        );
    }

    #[test]
    fn test_classification_names() {
        let result = ClassificationResult::new(
            vec![Branch::new("a"), Branch::new("b")],
            vec!["warn".to_string()],
        );
        assert_eq!(result.names(), vec!["a", "b"]);
        assert_eq!(result.warnings(), ["warn".to_string()]);
        assert!(!result.is_empty());
        assert!(ClassificationResult::default().is_empty());
    }
}
