//! Ancestry-based merge detection

use crate::backend::RepositoryBackend;
use crate::error::SweepError;

/// Local branches whose tips are reachable from `default_branch`
///
/// Covers ordinary merges and fast-forwards. The list may include the
/// default branch itself; exclusion happens during aggregation.
pub fn detect_merged<B: RepositoryBackend + ?Sized>(
    backend: &B,
    default_branch: &str,
) -> Result<Vec<String>, SweepError> {
    let merged = backend
        .list_branches_merged_into(default_branch)
        .map_err(|e| SweepError::MergeDetectionFailed(e.to_string()))?;
    tracing::debug!(count = merged.len(), "merged branches detected");
    Ok(merged)
}
