//! Terminal output formatting

use std::time::Instant;

use colored::Colorize;
use triage_core::{AnalysisModel, Failure, Issue, ReportSummary};

/// One line per issue: message, location, generator, crash marker.
pub fn format_issue(issue: &Issue) -> String {
    let location = match issue.line {
        Some(line) => format!("{}:{}", issue.source.path.display(), line),
        None => issue.source.path.display().to_string(),
    };
    let crash = if issue.backtraces.is_empty() {
        String::new()
    } else {
        format!(" 💥 {} crash(es)", issue.backtraces.len())
    };

    format!(
        "  ⚠️  {} {} [{}]{}",
        issue.message, location, issue.generator.name, crash
    )
}

pub fn format_failure(failure: &Failure) -> String {
    format!(
        "  ❌ {} could not analyze {}: {}",
        failure.generator.name,
        failure.source.path.display(),
        failure.message
    )
}

pub fn print_report(model: &AnalysisModel, summary: &ReportSummary, start: Instant) {
    println!();

    for issue in &model.issues {
        println!("{}", format_issue(issue));
    }
    for failure in &model.failures {
        println!("{}", format_failure(failure));
    }

    if !model.issues.is_empty() || !model.failures.is_empty() {
        println!();
    }

    println!("  {}", "\u{2500}".repeat(60).dimmed());
    println!(
        "  {} \u{00b7} {} \u{00b7} {}",
        format!("{} issue(s)", summary.issues).yellow(),
        format!("{} failure(s)", summary.failures).red(),
        format!("{} corroborated by crashes", summary.corroborated).blue()
    );
    println!(
        "  {} source file(s) analyzed \u{00b7} Time: {:.1}s",
        summary.files,
        start.elapsed().as_secs_f64()
    );
}
