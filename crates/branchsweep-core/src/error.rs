//! Error types for branchsweep operations

use thiserror::Error;

/// Core error type for branchsweep operations
#[derive(Error, Debug)]
pub enum SweepError {
    // === Setup errors (E001-E003) ===
    /// E001: No default branch could be determined
    #[error("E001: could not determine default branch (tried {remote}/HEAD, then {candidates})")]
    DefaultBranchNotFound { remote: String, candidates: String },

    /// E002: Local branch list unobtainable
    #[error("E002: failed to list branches: {0}")]
    BranchListFailed(String),

    /// E003: Checked-out branch unknown
    #[error("E003: could not detect current branch: {0}")]
    CurrentBranchUnknown(String),

    // === Detection errors (E004-E005), recoverable ===
    /// E004: `branch --merged` query failed
    #[error("E004: could not detect merged branches: {0}")]
    MergeDetectionFailed(String),

    /// E005: Squash detection could not run at all
    #[error("E005: could not detect squashed branches: {0}")]
    SquashDetectionFailed(String),

    // === Mutation and listing errors (E006-E008) ===
    /// E006: Branch deletion failed, carries the backend diagnostic
    #[error("E006: failed to delete branches: {0}")]
    DeletionFailed(String),

    /// E007: Recency listing failed
    #[error("E007: failed to get recent branches: {0}")]
    RecencyFailed(String),

    /// E008: Checkout of the selected branch failed
    #[error("E008: failed to switch to branch '{branch}': {reason}")]
    SwitchFailed { branch: String, reason: String },

    // === Repository errors (E009-E012) ===
    /// E009: Path is not inside a git work tree
    #[error("E009: not a git repository: {0}")]
    NotAGitRepository(String),

    /// E010: git binary missing from PATH
    #[error("E010: git not installed or not found in PATH")]
    GitNotInstalled,

    /// E011: A git invocation exited unsuccessfully
    #[error("E011: git {command} failed: {stderr}")]
    GitCommand { command: String, stderr: String },

    /// E012: A git invocation exceeded the configured timeout
    #[error("E012: git {command} timed out after {secs} seconds")]
    GitTimeout { command: String, secs: u64 },

    // === IO and system errors ===
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Unexpected backend output
    #[error("parse error: {0}")]
    Parse(String),

    /// Prompt failure or cancellation
    #[error("interaction error: {0}")]
    Interaction(String),
}

impl SweepError {
    /// Get the error code (e.g., "E001", "E002")
    pub fn code(&self) -> &'static str {
        match self {
            SweepError::DefaultBranchNotFound { .. } => "E001",
            SweepError::BranchListFailed(_) => "E002",
            SweepError::CurrentBranchUnknown(_) => "E003",
            SweepError::MergeDetectionFailed(_) => "E004",
            SweepError::SquashDetectionFailed(_) => "E005",
            SweepError::DeletionFailed(_) => "E006",
            SweepError::RecencyFailed(_) => "E007",
            SweepError::SwitchFailed { .. } => "E008",
            SweepError::NotAGitRepository(_) => "E009",
            SweepError::GitNotInstalled => "E010",
            SweepError::GitCommand { .. } => "E011",
            SweepError::GitTimeout { .. } => "E012",
            SweepError::Io(_) => "E013",
            SweepError::Config(_) => "E014",
            SweepError::Parse(_) => "E015",
            SweepError::Interaction(_) => "E016",
        }
    }

    /// Get the exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            SweepError::DefaultBranchNotFound { .. } => 3,

            SweepError::BranchListFailed(_)
            | SweepError::CurrentBranchUnknown(_)
            | SweepError::RecencyFailed(_) => 4, // Repository state unreadable

            // Recoverable, only surfaced when a caller chooses to abort on them
            SweepError::MergeDetectionFailed(_) | SweepError::SquashDetectionFailed(_) => 1,

            SweepError::DeletionFailed(_) | SweepError::SwitchFailed { .. } => 1,

            SweepError::NotAGitRepository(_) => 5,

            SweepError::GitNotInstalled => 6,

            SweepError::GitCommand { .. } | SweepError::GitTimeout { .. } => 1,

            SweepError::Io(_) => 2,

            SweepError::Config(_) => 7,

            SweepError::Parse(_) => 1,

            SweepError::Interaction(_) => 8,
        }
    }

    /// Whether classification may continue past this error with a warning
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SweepError::MergeDetectionFailed(_) | SweepError::SquashDetectionFailed(_)
        )
    }
}
