//! JSON output formatting

use serde::{Deserialize, Serialize};
use triage_core::{AnalysisModel, ReportIndex, ReportSummary};

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput {
    pub files: Vec<JsonFile>,
    pub summary: JsonSummary,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonFile {
    pub path: String,
    pub hash: String,
    pub issues: Vec<JsonIssue>,
    pub failures: Vec<JsonFailure>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonIssue {
    pub generator: String,
    pub kind: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub backtraces: Vec<JsonBacktrace>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonBacktrace {
    pub hash: String,
    pub frame: usize,
    pub distance: usize,
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonFailure {
    pub generator: String,
    pub kind: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonSummary {
    pub files: usize,
    pub issues: usize,
    pub failures: usize,
    pub corroborated: usize,
}

/// Assemble the JSON document: one entry per interned source file, with its
/// issues and failures resolved through the aggregation index.
pub fn build_json_output(
    model: &AnalysisModel,
    index: &ReportIndex,
    url_template: &str,
    summary: &ReportSummary,
) -> JsonOutput {
    let files = model
        .sources()
        .iter()
        .map(|file| JsonFile {
            path: file.path.display().to_string(),
            hash: file.hash.as_hex().to_string(),
            issues: index
                .issues_for(&file.hash)
                .iter()
                .map(|&id| {
                    let issue = &model.issues[id];
                    JsonIssue {
                        generator: issue.generator.name.clone(),
                        kind: issue.kind.clone(),
                        message: issue.message.clone(),
                        line: issue.line,
                        backtraces: issue
                            .backtraces
                            .iter()
                            .map(|m| JsonBacktrace {
                                hash: m.backtrace.hash.clone(),
                                frame: m.frame,
                                distance: m.distance,
                                url: m.backtrace.lookup_url(url_template),
                            })
                            .collect(),
                    }
                })
                .collect(),
            failures: index
                .failures_for(&file.hash)
                .iter()
                .map(|&id| {
                    let failure = &model.failures[id];
                    JsonFailure {
                        generator: failure.generator.name.clone(),
                        kind: failure.kind.clone(),
                        message: failure.message.clone(),
                        line: failure.line,
                    }
                })
                .collect(),
        })
        .collect();

    JsonOutput {
        files,
        summary: JsonSummary {
            files: summary.files,
            issues: summary.issues,
            failures: summary.failures,
            corroborated: summary.corroborated,
        },
    }
}

pub fn print_json(
    model: &AnalysisModel,
    index: &ReportIndex,
    url_template: &str,
    summary: &ReportSummary,
) {
    let out = build_json_output(model, index, url_template, summary);
    match serde_json::to_string_pretty(&out) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize JSON: {}", e),
    }
}
