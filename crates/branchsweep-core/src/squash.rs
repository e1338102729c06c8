//! Squash-merge detection
//!
//! A squash merge lands a branch's net change as one new commit, so the
//! branch tip never becomes an ancestor of the default branch. Instead we
//! build a probe commit carrying the branch's final tree on top of its merge
//! base and ask `git cherry` whether an equivalent patch already exists
//! upstream. The probe is never referenced by any branch.

use rayon::prelude::*;

use crate::backend::RepositoryBackend;
use crate::error::SweepError;

/// Decide whether `branch`'s content is already present in `default_branch`
///
/// Any backend error is returned to the caller; [`detect_squashed`] treats
/// it as "not squashed".
pub fn is_squash_merged<B: RepositoryBackend + ?Sized>(
    backend: &B,
    default_branch: &str,
    branch: &str,
) -> Result<bool, SweepError> {
    let merge_base = backend.merge_base(default_branch, branch)?;
    let tree = backend.tree_of(branch)?;
    let probe = backend.synthesize_commit(&tree, &merge_base)?;
    let comparison = backend.compare_upstream(default_branch, &probe)?;
    // Empty output means nothing on the probe side is missing upstream
    Ok(comparison.iter().all(|entry| entry.equivalent))
}

fn check_branch<B: RepositoryBackend + ?Sized>(backend: &B, default_branch: &str, branch: &str) -> bool {
    match is_squash_merged(backend, default_branch, branch) {
        Ok(squashed) => {
            tracing::debug!(branch, squashed, "squash check");
            squashed
        }
        Err(e) => {
            tracing::debug!(branch, error = %e, "squash check skipped");
            false
        }
    }
}

/// Branches from `branches` whose content already landed in `default_branch`
///
/// Order follows `branches`. Per-branch failures silently exclude that
/// branch. With `jobs > 1` the checks run on a bounded rayon pool.
pub fn detect_squashed<B: RepositoryBackend + Sync + ?Sized>(
    backend: &B,
    default_branch: &str,
    branches: &[String],
    jobs: usize,
) -> Result<Vec<String>, SweepError> {
    backend.tree_of(default_branch).map_err(|e| {
        SweepError::SquashDetectionFailed(format!(
            "could not read tree of default branch '{}': {}",
            default_branch, e
        ))
    })?;

    let candidates: Vec<&String> = branches
        .iter()
        .filter(|name| name.as_str() != default_branch)
        .collect();

    let verdicts: Vec<bool> = if jobs <= 1 || candidates.len() <= 1 {
        candidates
            .iter()
            .map(|name| check_branch(backend, default_branch, name))
            .collect()
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .map_err(|e| SweepError::SquashDetectionFailed(format!("worker pool: {}", e)))?;
        pool.install(|| {
            candidates
                .par_iter()
                .map(|name| check_branch(backend, default_branch, name))
                .collect()
        })
    };

    let squashed: Vec<String> = candidates
        .into_iter()
        .zip(verdicts)
        .filter(|(_, squashed)| *squashed)
        .map(|(name, _)| name.clone())
        .collect();
    tracing::debug!(count = squashed.len(), "squashed branches detected");
    Ok(squashed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryBackend, Operation};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// main with one commit, `feature` squash-merged, `feature2` never merged
    fn squashed_repo() -> MemoryBackend {
        let repo = MemoryBackend::new("main");
        repo.commit("main", &[("README.md", "hello")]).unwrap();

        repo.create_branch("feature", "main").unwrap();
        repo.commit("feature", &[("src/a.rs", "a1")]).unwrap();
        repo.commit("feature", &[("src/a.rs", "a2"), ("src/b.rs", "b")])
            .unwrap();

        repo.create_branch("feature2", "main").unwrap();
        repo.commit("feature2", &[("src/c.rs", "c")]).unwrap();

        repo.commit("main", &[("CHANGELOG.md", "entry")]).unwrap();
        repo.squash_merge("main", "feature").unwrap();
        repo
    }

    #[test]
    fn test_squashed_branch_detected() {
        let repo = squashed_repo();
        let squashed = detect_squashed(&repo, "main", &names(&["feature"]), 1).unwrap();
        assert_eq!(squashed, vec!["feature"]);
    }

    #[test]
    fn test_unmerged_branch_excluded() {
        let repo = squashed_repo();
        let squashed =
            detect_squashed(&repo, "main", &names(&["feature", "feature2", "main"]), 1).unwrap();
        assert_eq!(squashed, vec!["feature"]);
    }

    #[test]
    fn test_partially_squashed_branch_excluded() {
        let repo = squashed_repo();
        repo.commit("feature", &[("src/d.rs", "more work")]).unwrap();
        assert!(!is_squash_merged(&repo, "main", "feature").unwrap());
    }

    #[test]
    fn test_default_branch_skipped() {
        let repo = squashed_repo();
        let before = repo.object_count();
        let squashed = detect_squashed(&repo, "main", &names(&["main"]), 1).unwrap();
        assert!(squashed.is_empty());
        assert_eq!(repo.object_count(), before, "no probe written for main");
    }

    #[test]
    fn test_per_branch_failure_is_silent() {
        let repo = squashed_repo();
        repo.fail_for(Operation::MergeBase, "feature");
        let squashed =
            detect_squashed(&repo, "main", &names(&["feature", "feature2"]), 1).unwrap();
        assert!(squashed.is_empty());
    }

    #[test]
    fn test_comparison_error_is_not_squashed() {
        let repo = squashed_repo();
        repo.fail(Operation::CompareUpstream);
        assert!(is_squash_merged(&repo, "main", "feature").is_err());
        let squashed = detect_squashed(&repo, "main", &names(&["feature"]), 1).unwrap();
        assert!(squashed.is_empty());
    }

    #[test]
    fn test_invalid_default_branch_fails_detector() {
        let repo = squashed_repo();
        let err = detect_squashed(&repo, "trunk", &names(&["feature"]), 1).unwrap_err();
        assert!(matches!(err, SweepError::SquashDetectionFailed(_)));
    }

    #[test]
    fn test_default_tree_failure_keeps_cause() {
        let repo = squashed_repo();
        repo.fail_for(Operation::TreeOf, "main");
        let err = detect_squashed(&repo, "main", &names(&["feature"]), 1).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("could not read tree of default branch 'main'"));
        assert!(message.contains("injected failure"));
    }

    #[test]
    fn test_parallel_preserves_order() {
        let repo = squashed_repo();
        repo.create_branch("feature3", "feature").unwrap();
        let input = names(&["feature3", "feature2", "feature"]);

        let sequential = detect_squashed(&repo, "main", &input, 1).unwrap();
        let parallel = detect_squashed(&repo, "main", &input, 4).unwrap();
        assert_eq!(sequential, vec!["feature3", "feature"]);
        assert_eq!(parallel, sequential);
    }
}
