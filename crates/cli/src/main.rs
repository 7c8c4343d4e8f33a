//! Triage CLI - static-analysis report renderer

use anyhow::Result;
use clap::Parser;

use triage_cli::commands::{self, report::ReportExitCode};
use triage_cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let exit = match cli.command {
        Some(Commands::Init { ref path }) => {
            commands::init::run(path.as_deref())?;
            ReportExitCode::Success
        }
        Some(Commands::Report { ref results_dir }) => {
            commands::report::run(results_dir.as_deref(), &cli)?
        }
        None => {
            // Default command is report with the current directory
            commands::report::run(None, &cli)?
        }
    };

    if exit == ReportExitCode::FindingsExceedThreshold {
        std::process::exit(2);
    }

    Ok(())
}
