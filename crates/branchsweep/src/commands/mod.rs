//! CLI command implementations

pub mod purge;
pub mod recent;

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;

use branchsweep_core::{Config, GitCli, InteractionAdapter, SweepError};

use crate::output::{JsonIssue, JsonResponse};

pub use purge::{PurgeOptions, run_purge};
pub use recent::run_recent;

/// Flags shared by every command
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub json: bool,
    pub quiet: bool,
    pub repo: Option<PathBuf>,
}

impl GlobalOptions {
    /// Whether human-readable progress and messages are printed
    pub fn show_messages(&self) -> bool {
        !self.json && !self.quiet
    }
}

/// Command line values that take precedence over the config files
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub remote: Option<String>,
    pub jobs: Option<usize>,
    pub timeout: Option<u64>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut Config) -> Result<(), SweepError> {
        if let Some(remote) = &self.remote {
            if remote.trim().is_empty() {
                return Err(SweepError::Config("--remote must not be empty".to_string()));
            }
            config.sweep.remote = remote.clone();
        }
        if let Some(jobs) = self.jobs {
            if jobs == 0 {
                return Err(SweepError::Config("--jobs must be at least 1".to_string()));
            }
            config.sweep.squash_jobs = jobs;
        }
        if let Some(secs) = self.timeout {
            config.sweep.command_timeout_secs = secs;
        }
        Ok(())
    }
}

/// Directory the repository is searched from
fn start_dir(global: &GlobalOptions) -> anyhow::Result<PathBuf> {
    match &global.repo {
        Some(path) => Ok(path.clone()),
        None => std::env::current_dir().context("failed to read current directory"),
    }
}

/// Locate the repository and load its layered configuration
fn open_repository(
    start: &Path,
    overrides: &ConfigOverrides,
) -> Result<(GitCli, Config), SweepError> {
    let git = GitCli::discover(start)?;
    let mut config = Config::load(git.repo_root())?;
    overrides.apply(&mut config)?;
    tracing::debug!(
        root = %git.repo_root().display(),
        remote = %config.sweep.remote,
        jobs = config.sweep.squash_jobs,
        "repository opened"
    );
    let git = git.with_timeout(config.sweep.command_timeout());
    Ok((git, config))
}

/// Wrap a failure to find the starting directory as an IO error
fn setup_error(err: anyhow::Error) -> SweepError {
    SweepError::Io(std::io::Error::other(format!("{:#}", err)))
}

/// Print `err` in the requested format and return its exit code
///
/// JSON output goes to stdout as an error envelope, anything else through
/// `adapter`.
fn report_error<T, A>(
    command: &str,
    err: &SweepError,
    global: &GlobalOptions,
    adapter: &A,
) -> i32
where
    T: Serialize + Default,
    A: InteractionAdapter + ?Sized,
{
    tracing::debug!(code = err.code(), error = %err, "command failed");
    if global.json {
        JsonResponse::error(command, T::default(), vec![JsonIssue::from(err)]).print();
    } else {
        adapter.print_error(&err.to_string());
    }
    err.exit_code()
}
