//! CLI argument parsing with clap derive

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// branchsweep - prune local branches already merged into the default branch
#[derive(Parser)]
#[command(name = "branchsweep")]
#[command(version = VERSION)]
#[command(about = "Prune local branches already merged or squashed into the default branch")]
#[command(long_about = "branchsweep finds local branches whose changes already live in the default branch, whether they were merged, fast-forwarded or squash-merged, and lets you delete them.\n\nIt also offers a recency picker to switch between local branches.\n\nConfiguration is read from <config dir>/branchsweep/config.toml and <repo>/.branchsweep.toml.")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Run as if started in PATH
    #[arg(short = 'C', global = true, value_name = "PATH")]
    pub repo: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Delete branches merged or squashed into the default branch
    ///
    /// Lists candidates and prompts for which ones to delete.
    #[command(long_about = "Delete branches merged or squashed into the default branch.\n\nA branch is a candidate when its tip is reachable from the default branch (merge or fast-forward) or when its net change already appears there (squash merge).\n\nThe default branch and the checked-out branch are never offered.\n\nWith --json no prompt is shown: candidates are listed, and deleted only with --yes.")]
    Purge {
        /// List candidates without deleting anything
        #[arg(long, conflicts_with = "yes")]
        dry_run: bool,

        /// Delete every candidate without prompting
        #[arg(short, long)]
        yes: bool,

        /// Remote whose HEAD names the default branch
        #[arg(long, value_name = "NAME")]
        remote: Option<String>,

        /// Parallel squash checks
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,

        /// Per git call timeout in seconds (0 disables)
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },

    /// Switch to a recently committed branch
    ///
    /// Lists local branches by last commit date, newest first.
    #[command(long_about = "Switch to a recently committed branch.\n\nLists local branches by the committer date of their tip, newest first, and checks out the one you pick.\n\nWith --json the list is printed and nothing is checked out.")]
    Recent {
        /// Show at most N branches
        #[arg(short = 'n', long, value_name = "N")]
        limit: Option<usize>,
    },
}

/// Get the command args for use in the application
pub fn parse() -> Cli {
    Cli::parse()
}
