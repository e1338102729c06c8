//! Purge classification
//!
//! Combines merge and squash detection into the set of branches that can be
//! offered for deletion, never including the default or checked-out branch.

use std::collections::HashSet;

use crate::backend::RepositoryBackend;
use crate::branches::enumerate_branches;
use crate::error::SweepError;
use crate::merged::detect_merged;
use crate::squash::detect_squashed;
use crate::types::{Branch, ClassificationResult};

/// Union detector outputs into a classification
///
/// Names keep first-seen order (merged before squashed) and appear once.
/// A failed detector contributes a warning instead of names.
pub fn aggregate(
    default_branch: &str,
    current_branch: &str,
    merged: Result<Vec<String>, SweepError>,
    squashed: Result<Vec<String>, SweepError>,
) -> ClassificationResult {
    let mut warnings = Vec::new();
    let mut names = Vec::new();

    for detected in [merged, squashed] {
        match detected {
            Ok(list) => names.extend(list),
            Err(e) => {
                tracing::warn!(error = %e, "detector failed");
                warnings.push(e.to_string());
            }
        }
    }

    let mut seen = HashSet::new();
    let purgeable = names
        .into_iter()
        .filter(|name| name != default_branch && name != current_branch)
        .filter(|name| seen.insert(name.clone()))
        .map(Branch::new)
        .collect();

    ClassificationResult::new(purgeable, warnings)
}

/// Classify every local branch against `default_branch`
///
/// Without a current branch nothing is offered: the result is empty with a
/// single warning. A failed branch listing is fatal.
pub fn classify<B: RepositoryBackend + Sync + ?Sized>(
    backend: &B,
    default_branch: &str,
    squash_jobs: usize,
) -> Result<ClassificationResult, SweepError> {
    let current_branch = match backend.current_branch() {
        Ok(name) => name,
        Err(e) => {
            let warning = SweepError::CurrentBranchUnknown(e.to_string());
            tracing::warn!(error = %warning, "classification skipped");
            return Ok(ClassificationResult::new(Vec::new(), vec![warning.to_string()]));
        }
    };

    let branches = enumerate_branches(backend)?;
    let merged = detect_merged(backend, default_branch);
    let squashed = detect_squashed(backend, default_branch, &branches, squash_jobs);

    let result = aggregate(default_branch, &current_branch, merged, squashed);
    tracing::info!(
        branches = branches.len(),
        purgeable = result.purgeable().len(),
        warnings = result.warnings().len(),
        "classification complete"
    );
    Ok(result)
}
