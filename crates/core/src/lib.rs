//! Triage Core - Analysis Report Aggregation Engine
//!
//! This crate provides the data model and engine behind Triage reports:
//! - Entity model for cross-tool analysis results (issues and failures)
//! - Aggregation index grouping results by source file and generator
//! - Crash-backtrace correlation matching issues to observed crash frames
//! - Results-directory loading and crash-report JSON parsing

pub mod config;
pub mod correlate;
pub mod crash;
pub mod index;
pub mod loader;
pub mod model;

pub use config::TriageConfig;
pub use correlate::{correlate, CrashIndex, FrameMatch, DEFAULT_DISTANCE_THRESHOLD};
pub use crash::{load_crash_reports, parse_crash_reports};
pub use index::ReportIndex;
pub use loader::{discover_result_files, load_results_dir, LoadError};
pub use model::{
    AnalysisModel, AnalysisResult, Backtrace, ContentHash, Failure, Frame, Generator, Issue,
    MatchedBacktrace, ReportSummary, SourceFile,
};

/// Triage version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
