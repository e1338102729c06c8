//! Implementation of the `branchsweep purge` command

use owo_colors::OwoColorize;

use branchsweep_core::{
    InteractionAdapter, RepositoryBackend, SweepConfig, SweepError, classify, delete_branches,
    resolve_with_config,
};

use super::{
    ConfigOverrides, GlobalOptions, open_repository, report_error, setup_error, start_dir,
};
use crate::colors::COLORS;
use crate::interaction::CliAdapter;
use crate::output::{JsonIssue, JsonResponse, PurgeData};

/// Options for the purge command
#[derive(Debug, Clone, Default)]
pub struct PurgeOptions {
    pub dry_run: bool,
    pub yes: bool,
    pub overrides: ConfigOverrides,
}

/// How candidates are turned into deletions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurgeMode {
    /// Prompt for the branches to delete
    Interactive,
    /// List candidates only
    DryRun,
    /// Delete every candidate
    All,
}

impl PurgeMode {
    pub fn from_flags(dry_run: bool, yes: bool, json: bool) -> Self {
        match (dry_run, yes) {
            (true, _) => PurgeMode::DryRun,
            (false, true) => PurgeMode::All,
            // JSON output never prompts
            (false, false) if json => PurgeMode::DryRun,
            (false, false) => PurgeMode::Interactive,
        }
    }
}

/// Result of a purge run
#[derive(Debug, Clone, Default)]
pub struct PurgeOutcome {
    pub data: PurgeData,
    pub warnings: Vec<String>,
}

/// Run the purge command
pub fn run_purge(options: PurgeOptions, global: &GlobalOptions) -> Result<i32, String> {
    let adapter = CliAdapter::new();
    let start = match start_dir(global) {
        Ok(start) => start,
        Err(e) => {
            let err = setup_error(e);
            return Ok(report_error::<PurgeData, _>("purge", &err, global, &adapter));
        }
    };
    let (git, config) = match open_repository(&start, &options.overrides) {
        Ok(opened) => opened,
        Err(e) => return Ok(report_error::<PurgeData, _>("purge", &e, global, &adapter)),
    };

    let mode = PurgeMode::from_flags(options.dry_run, options.yes, global.json);

    match purge(&git, &adapter, &config.sweep, mode, global.show_messages()) {
        Ok(outcome) => {
            if global.json {
                let issues = outcome
                    .warnings
                    .iter()
                    .map(|w| JsonIssue::warning(w))
                    .collect();
                JsonResponse::ok_with_issues("purge", outcome.data, issues).print();
            }
            Ok(0)
        }
        Err(e) => Ok(report_error::<PurgeData, _>("purge", &e, global, &adapter)),
    }
}

/// Classify branches against the default branch and delete the chosen ones
///
/// Messages and prompts go through `adapter`; with `show` false nothing but
/// prompts is printed.
pub fn purge<B, A>(
    backend: &B,
    adapter: &A,
    config: &SweepConfig,
    mode: PurgeMode,
    show: bool,
) -> Result<PurgeOutcome, SweepError>
where
    B: RepositoryBackend + Sync + ?Sized,
    A: InteractionAdapter + ?Sized,
{
    let default_branch = resolve_with_config(backend, config)?;

    let progress = show.then(|| adapter.start_progress("Scanning branches"));
    let classified = classify(backend, &default_branch, config.squash_jobs);
    if let Some(handle) = progress {
        adapter.end_progress(handle, classified.is_ok());
    }
    let classified = classified?;

    if show {
        for warning in classified.warnings() {
            adapter.print_warning(warning);
        }
    }

    let mut outcome = PurgeOutcome {
        data: PurgeData {
            default_branch: default_branch.clone(),
            dry_run: mode == PurgeMode::DryRun,
            candidates: classified.purgeable().to_vec(),
            deleted: Vec::new(),
        },
        warnings: classified.warnings().to_vec(),
    };

    if classified.is_empty() {
        if show {
            adapter.print_info("No purgeable branches found. All clean!");
        }
        return Ok(outcome);
    }

    let names = classified.names();
    let description = format!(
        "Found {} branches merged/squashed into {}",
        names.len(),
        default_branch
    );

    let selected: Vec<String> = match mode {
        PurgeMode::DryRun => {
            if show {
                adapter.print_info(&description);
                for name in &names {
                    adapter.print_info(&format!("  {}", name.style(COLORS.active)));
                }
            }
            return Ok(outcome);
        }
        PurgeMode::All => names,
        PurgeMode::Interactive => {
            if show {
                adapter.print_info(&description);
            }
            let labels: Vec<&str> = names.iter().map(String::as_str).collect();
            let picked = adapter.ask_multi_select("Select branches to delete", &labels)?;
            picked
                .into_iter()
                .filter_map(|i| names.get(i).cloned())
                .collect()
        }
    };

    if selected.is_empty() {
        if show {
            adapter.print_info("No branches selected.");
        }
        return Ok(outcome);
    }

    delete_branches(backend, &selected)?;
    if show {
        adapter.print_success(&format!("Deleted {} branch(es)", selected.len()));
    }
    outcome.data.deleted = selected;
    Ok(outcome)
}
