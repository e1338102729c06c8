//! Implementation of the `branchsweep recent` command

use owo_colors::OwoColorize;

use branchsweep_core::{
    Branch, InteractionAdapter, InteractionError, RepositoryBackend, SweepError, recent_branches,
    switch_branch,
};

use super::{
    ConfigOverrides, GlobalOptions, open_repository, report_error, setup_error, start_dir,
};
use crate::colors::COLORS;
use crate::interaction::CliAdapter;
use crate::output::{JsonResponse, RecentData};

/// Picker label: `<date>  <name>`
fn label(branch: &Branch) -> String {
    format!(
        "{}  {}",
        branch.last_commit_date.as_deref().unwrap_or("----------"),
        branch.name
    )
}

/// Run the recent command
pub fn run_recent(limit: Option<usize>, global: &GlobalOptions) -> Result<i32, String> {
    let adapter = CliAdapter::new();
    let start = match start_dir(global) {
        Ok(start) => start,
        Err(e) => {
            let err = setup_error(e);
            return Ok(report_error::<RecentData, _>("recent", &err, global, &adapter));
        }
    };
    let (git, _config) = match open_repository(&start, &ConfigOverrides::default()) {
        Ok(opened) => opened,
        Err(e) => return Ok(report_error::<RecentData, _>("recent", &e, global, &adapter)),
    };

    match recent(&git, &adapter, limit, !global.json, global.show_messages()) {
        Ok(data) => {
            if global.json {
                JsonResponse::ok_with_issues("recent", data, vec![]).print();
            }
            Ok(0)
        }
        Err(e) => Ok(report_error::<RecentData, _>("recent", &e, global, &adapter)),
    }
}

/// List branches by recency and optionally switch to the picked one
pub fn recent<B, A>(
    backend: &B,
    adapter: &A,
    limit: Option<usize>,
    interactive: bool,
    show: bool,
) -> Result<RecentData, SweepError>
where
    B: RepositoryBackend + ?Sized,
    A: InteractionAdapter + ?Sized,
{
    let mut branches = recent_branches(backend)?;
    if let Some(limit) = limit {
        branches.truncate(limit);
    }

    let mut data = RecentData {
        current_branch: backend.current_branch().ok(),
        branches,
        switched_to: None,
    };

    if data.branches.is_empty() {
        if show {
            adapter.print_info("No other branches found.");
        }
        return Ok(data);
    }

    if !interactive {
        if show {
            for branch in &data.branches {
                adapter.print_info(&format!(
                    "{}  {}",
                    branch.last_commit_date.as_deref().unwrap_or("").style(COLORS.muted),
                    branch.name.style(COLORS.active)
                ));
            }
        }
        return Ok(data);
    }

    if show {
        adapter.print_info(&format!("Found {} branches", data.branches.len()));
    }
    let labels: Vec<String> = data.branches.iter().map(label).collect();
    let options: Vec<&str> = labels.iter().map(String::as_str).collect();
    let index = adapter.ask_select("Select a branch to switch to", &options)?;
    let chosen = data
        .branches
        .get(index)
        .map(|b| b.name.clone())
        .ok_or_else(|| InteractionError::InvalidInput(format!("no option {}", index)))?;

    switch_branch(backend, &chosen)?;
    if show {
        adapter.print_success(&format!("Switched to branch '{}'", chosen));
    }
    data.switched_to = Some(chosen);
    Ok(data)
}
