//! branchsweep CLI - prune local branches already merged into the default branch

mod cli;
mod colors;
mod commands;
mod interaction;
mod logging;
mod output;

use std::process::ExitCode;

use cli::Commands;
use commands::{ConfigOverrides, GlobalOptions, PurgeOptions};

fn main() -> ExitCode {
    let cli = cli::parse();

    if let Err(e) = logging::init(cli.verbose, cli.quiet) {
        eprintln!("warning: {:#}", e);
    }

    let global = GlobalOptions {
        json: cli.json,
        quiet: cli.quiet,
        repo: cli.repo,
    };

    let result = match cli.command {
        Some(Commands::Purge {
            dry_run,
            yes,
            remote,
            jobs,
            timeout,
        }) => commands::run_purge(
            PurgeOptions {
                dry_run,
                yes,
                overrides: ConfigOverrides {
                    remote,
                    jobs,
                    timeout,
                },
            },
            &global,
        ),
        Some(Commands::Recent { limit }) => commands::run_recent(limit, &global),
        None => {
            // No subcommand - print version info
            if !cli.quiet {
                println!("branchsweep v{}", env!("CARGO_PKG_VERSION"));
                println!("Use --help for usage information");
            }
            Ok(0)
        }
    };

    match result {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(1)
        }
    }
}
