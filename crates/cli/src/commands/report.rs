//! Main report command — wires loader, correlation, index, and output together

use anyhow::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use triage_core::{
    correlate, load_crash_reports, load_results_dir, Backtrace, CrashIndex, ReportIndex,
    ReportSummary, TriageConfig,
};

use crate::output;
use crate::progress::Step;
use crate::service;

/// Exit disposition of a report run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportExitCode {
    Success,
    FindingsExceedThreshold,
}

pub fn run(results_dir: Option<&Path>, cli: &crate::Cli) -> Result<ReportExitCode> {
    let start = Instant::now();
    let results_dir = results_dir.unwrap_or_else(|| Path::new("."));

    eprintln!(
        "{}",
        format!("  triage v{} — rendering analysis report", triage_core::VERSION).bold()
    );
    eprintln!();

    // ── 1. Config ────────────────────────────────────────────────
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = TriageConfig::find_and_load(&cwd)?;
    let format = resolve_format(cli, &config);
    let threshold = cli.threshold.unwrap_or(config.correlate.distance_threshold);

    if !config.output.color {
        colored::control::set_override(false);
    }

    // ── 2. Load results ──────────────────────────────────────────
    let step = Step::new("Loading analysis results");
    let mut model = load_results_dir(results_dir, &config.ignore.paths)?;
    step.finish(&format!(
        "{} file(s), {} issue(s), {} failure(s)",
        model.sources().len(),
        model.issues.len(),
        model.failures.len()
    ));

    // ── 3. Correlate crashes ─────────────────────────────────────
    match resolve_crash_source(cli, &config) {
        Some(source) => {
            let step = Step::new("Correlating crash backtraces");
            let backtraces = load_backtraces(&source)?;
            let crash_index = CrashIndex::build(&backtraces);
            correlate(&crash_index, &mut model.issues, threshold);

            let corroborated = model
                .issues
                .iter()
                .filter(|i| !i.backtraces.is_empty())
                .count();
            step.finish(&format!(
                "{} backtrace(s), {} issue(s) corroborated",
                backtraces.len(),
                corroborated
            ));
        }
        None => {
            eprintln!(
                "  {}",
                "No crash reports configured, skipping correlation".dimmed()
            );
        }
    }

    // ── 4. Index ─────────────────────────────────────────────────
    let index = ReportIndex::build(&model);
    let summary = ReportSummary::from_model(&model);

    // ── 5. Output ────────────────────────────────────────────────
    match format {
        Format::Html => {
            let out_dir = cli
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(&config.output.dir));
            output::html::write_report(&model, &index, &config.correlate.url_template, &out_dir)?;
            eprintln!(
                "  Report written to {}",
                out_dir.join("index.html").display()
            );
            print_summary_lines(&summary, start);
        }
        Format::Json => {
            output::json::print_json(&model, &index, &config.correlate.url_template, &summary);
        }
        Format::Terminal => {
            output::terminal::print_report(&model, &summary, start);
        }
    }

    let fail_on = cli.fail_on.as_deref().unwrap_or(&config.general.fail_on);
    if summary.exceeds_threshold(fail_on) {
        Ok(ReportExitCode::FindingsExceedThreshold)
    } else {
        Ok(ReportExitCode::Success)
    }
}

// ── Helpers ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Format {
    Html,
    Terminal,
    Json,
}

fn resolve_format(cli: &crate::Cli, config: &TriageConfig) -> Format {
    if let Some(f) = cli.format {
        return match f {
            crate::OutputFormat::Html => Format::Html,
            crate::OutputFormat::Terminal => Format::Terminal,
            crate::OutputFormat::Json => Format::Json,
        };
    }
    match config.output.format.as_str() {
        "terminal" => Format::Terminal,
        "json" => Format::Json,
        _ => Format::Html,
    }
}

enum CrashSource {
    File(PathBuf),
    Url(String),
}

/// Crash data is opt-in: a source given on the command line wins over the
/// config; no source at all means correlation is skipped entirely.
fn resolve_crash_source(cli: &crate::Cli, config: &TriageConfig) -> Option<CrashSource> {
    if let Some(ref path) = cli.crashes {
        return Some(CrashSource::File(path.clone()));
    }
    if let Some(ref url) = cli.crash_url {
        return Some(CrashSource::Url(url.clone()));
    }
    config.correlate.source.as_ref().map(|source| {
        if source.starts_with("http://") || source.starts_with("https://") {
            CrashSource::Url(source.clone())
        } else {
            CrashSource::File(PathBuf::from(source))
        }
    })
}

fn load_backtraces(source: &CrashSource) -> Result<Vec<Arc<Backtrace>>> {
    match source {
        CrashSource::File(path) => load_crash_reports(path),
        CrashSource::Url(url) => service::fetch_crash_reports(url),
    }
}

fn print_summary_lines(summary: &ReportSummary, start: Instant) {
    eprintln!("  {}", "\u{2500}".repeat(60).dimmed());
    eprintln!(
        "  {} \u{00b7} {} \u{00b7} {}",
        format!("{} issue(s)", summary.issues).yellow(),
        format!("{} failure(s)", summary.failures).red(),
        format!("{} corroborated by crashes", summary.corroborated).blue()
    );
    eprintln!(
        "  {} source file(s) \u{00b7} Time: {:.1}s",
        summary.files,
        start.elapsed().as_secs_f64()
    );
}
