//! Version-control backend contract
//!
//! Every component talks to the repository through [`RepositoryBackend`], so
//! the classifier can run against the real `git` binary ([`crate::GitCli`])
//! or against an in-memory commit graph ([`crate::MemoryBackend`]).
//!
//! All operations are read-only except [`RepositoryBackend::synthesize_commit`]
//! (writes an unreferenced object), [`RepositoryBackend::delete_branches`] and
//! [`RepositoryBackend::switch_branch`].

use crate::error::SweepError;
use crate::types::{BranchActivity, CommitId, TreeId, UpstreamCommit};

/// Operations the branch tooling needs from a repository
pub trait RepositoryBackend {
    /// Resolve a symbolic ref to its short target, `None` if it does not exist
    fn resolve_symbolic_ref(&self, name: &str) -> Result<Option<String>, SweepError>;

    /// Whether `name` resolves to a valid object
    fn ref_exists(&self, name: &str) -> bool;

    /// Name of the checked-out branch
    fn current_branch(&self) -> Result<String, SweepError>;

    /// Local branches whose tips are ancestors of `target`
    fn list_branches_merged_into(&self, target: &str) -> Result<Vec<String>, SweepError>;

    /// All local branch names
    fn list_all_branches(&self) -> Result<Vec<String>, SweepError>;

    /// Best common ancestor of `a` and `b`
    fn merge_base(&self, a: &str, b: &str) -> Result<CommitId, SweepError>;

    /// Tree of the commit `reference` points at
    fn tree_of(&self, reference: &str) -> Result<TreeId, SweepError>;

    /// Write a dangling commit with the given tree and single parent
    fn synthesize_commit(&self, tree: &TreeId, parent: &CommitId) -> Result<CommitId, SweepError>;

    /// Commits of `candidate` absent from `target`, flagged when an equivalent
    /// change already exists in `target`
    fn compare_upstream(
        &self,
        target: &str,
        candidate: &CommitId,
    ) -> Result<Vec<UpstreamCommit>, SweepError>;

    /// Tip commit time of every local branch, in no particular order
    fn commit_timestamps(&self) -> Result<Vec<BranchActivity>, SweepError>;

    /// Force-delete the named branches in one invocation
    fn delete_branches(&self, names: &[String]) -> Result<(), SweepError>;

    /// Check out an existing local branch
    fn switch_branch(&self, name: &str) -> Result<(), SweepError>;
}
