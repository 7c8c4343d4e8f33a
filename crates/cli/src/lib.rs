//! Triage CLI library — exposed for integration tests

pub mod commands;
pub mod output;
#[allow(dead_code)]
pub mod progress;
pub mod service;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "triage")]
#[command(about = "Cross-tool static-analysis reports with crash corroboration", long_about = None)]
#[command(version = triage_core::VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Crash-report collection file (JSON)
    #[arg(long, global = true)]
    pub crashes: Option<PathBuf>,

    /// Fetch the crash-report collection from a URL
    #[arg(long, global = true)]
    pub crash_url: Option<String>,

    /// Max line distance between a crash frame and an issue
    #[arg(long, global = true)]
    pub threshold: Option<usize>,

    /// Output format
    #[arg(long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Output directory for the HTML report
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,

    /// Threshold for non-zero exit: issues, failures, never
    #[arg(long, global = true)]
    pub fail_on: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize .triage.toml configuration
    Init {
        /// Path to initialize (default: current directory)
        path: Option<PathBuf>,
    },

    /// Render the analysis report (default command)
    Report {
        /// Path to the results directory (default: current directory)
        results_dir: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Html,
    Terminal,
    Json,
}
