//! branchsweep-core: merge and squash detection for local branches
//!
//! This crate decides which local branches already have their changes in
//! the default branch, whether they were merged, fast-forwarded or
//! squash-merged, and provides the branch listing and deletion operations
//! the `branchsweep` CLI is built on.

/// Version-control backend contract
pub mod backend;

/// Branch enumeration, deletion and recency
pub mod branches;

/// Purge classification
pub mod classify;

/// Configuration handling
pub mod config;

/// Default branch resolution
pub mod default_branch;

/// Core error types
pub mod error;

/// Git CLI backend
pub mod git;

/// User interaction abstraction
pub mod interaction;

/// In-memory backend
pub mod memory;

/// Ancestry-based merge detection
pub mod merged;

/// Squash-merge detection
pub mod squash;

/// Core data types (Branch, ClassificationResult, etc.)
pub mod types;

// Re-exports for convenience
pub use backend::RepositoryBackend;
pub use branches::{delete_branches, enumerate_branches, recent_branches, switch_branch};
pub use classify::{aggregate, classify};
pub use config::{Config, SweepConfig};
pub use default_branch::{resolve_default_branch, resolve_with_config};
pub use error::SweepError;
pub use git::GitCli;
pub use interaction::{InteractionAdapter, InteractionError, InteractionResult, ProgressHandle};
pub use memory::{MemoryBackend, Operation};
pub use merged::detect_merged;
pub use squash::{detect_squashed, is_squash_merged};
pub use types::{Branch, BranchActivity, ClassificationResult, CommitId, TreeId, UpstreamCommit};
