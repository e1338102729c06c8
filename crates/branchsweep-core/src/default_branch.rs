//! Default branch resolution

use crate::backend::RepositoryBackend;
use crate::config::SweepConfig;
use crate::error::SweepError;

/// Determine the repository's default branch
///
/// Tries `refs/remotes/<remote>/HEAD` first and strips the remote prefix from
/// its target (`origin/main` -> `main`). Otherwise returns the first of
/// `fallback_branches` that resolves to a valid ref.
pub fn resolve_default_branch<B: RepositoryBackend + ?Sized>(
    backend: &B,
    remote: &str,
    fallback_branches: &[String],
) -> Result<String, SweepError> {
    let symbolic = format!("refs/remotes/{}/HEAD", remote);
    match backend.resolve_symbolic_ref(&symbolic) {
        Ok(Some(target)) => {
            if let Some(name) = branch_from_remote_head(&target, remote) {
                tracing::debug!(%target, branch = name, "default branch from remote HEAD");
                return Ok(name.to_string());
            }
        }
        Ok(None) => tracing::debug!(%symbolic, "remote HEAD not set"),
        // A missing git binary will fail the fallbacks too, so surface it now
        Err(SweepError::GitNotInstalled) => return Err(SweepError::GitNotInstalled),
        Err(e) => tracing::debug!(error = %e, "remote HEAD lookup failed"),
    }

    for candidate in fallback_branches {
        if backend.ref_exists(candidate) {
            tracing::debug!(branch = %candidate, "default branch from fallback list");
            return Ok(candidate.clone());
        }
    }

    Err(SweepError::DefaultBranchNotFound {
        remote: remote.to_string(),
        candidates: fallback_branches.join(", "),
    })
}

/// Resolve using the remote and fallbacks from `config`
pub fn resolve_with_config<B: RepositoryBackend + ?Sized>(
    backend: &B,
    config: &SweepConfig,
) -> Result<String, SweepError> {
    resolve_default_branch(backend, &config.remote, &config.fallback_branches)
}

fn branch_from_remote_head<'a>(target: &'a str, remote: &str) -> Option<&'a str> {
    let name = match target.strip_prefix(remote).and_then(|rest| rest.strip_prefix('/')) {
        Some(rest) => rest,
        None => target.rsplit_once('/')?.1,
    };
    (!name.is_empty()).then_some(name)
}
