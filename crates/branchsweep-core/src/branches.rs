//! Branch enumeration, deletion and recency listing

use crate::backend::RepositoryBackend;
use crate::error::SweepError;
use crate::types::Branch;

/// List every local branch name, in backend order
pub fn enumerate_branches<B: RepositoryBackend + ?Sized>(
    backend: &B,
) -> Result<Vec<String>, SweepError> {
    backend
        .list_all_branches()
        .map_err(|e| SweepError::BranchListFailed(e.to_string()))
}

/// Force-delete `names` in a single backend call
///
/// An empty list is a no-op. Failure carries the backend's diagnostic text;
/// branches listed before a failing one may already be gone.
pub fn delete_branches<B: RepositoryBackend + ?Sized>(
    backend: &B,
    names: &[String],
) -> Result<(), SweepError> {
    if names.is_empty() {
        return Ok(());
    }
    tracing::info!(count = names.len(), "deleting branches");
    backend.delete_branches(names).map_err(|e| match e {
        SweepError::DeletionFailed(_) => e,
        other => SweepError::DeletionFailed(other.to_string()),
    })
}

/// Local branches with their last commit date, most recent first
pub fn recent_branches<B: RepositoryBackend + ?Sized>(
    backend: &B,
) -> Result<Vec<Branch>, SweepError> {
    let mut activity = backend
        .commit_timestamps()
        .map_err(|e| SweepError::RecencyFailed(e.to_string()))?;
    // Stable sort keeps backend order among equal timestamps
    activity.sort_by(|a, b| b.committed_at.cmp(&a.committed_at));
    Ok(activity.iter().map(|a| a.to_branch()).collect())
}

/// Check out `name`
pub fn switch_branch<B: RepositoryBackend + ?Sized>(
    backend: &B,
    name: &str,
) -> Result<(), SweepError> {
    backend.switch_branch(name).map_err(|e| match e {
        SweepError::SwitchFailed { .. } => e,
        other => SweepError::SwitchFailed {
            branch: name.to_string(),
            reason: other.to_string(),
        },
    })
}
