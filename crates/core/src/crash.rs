//! Crash-report collection parsing
//!
//! Wire format: one JSON array of report objects, each carrying a
//! `backtraces` array of `{ "hash", "frames": [{ "source_file",
//! "line_number" }] }` objects. Frames are ordered by array position
//! (index 0 = frame 1). A missing required key anywhere in the document is
//! a fatal input error; there is no partial parse.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};

use crate::model::{Backtrace, Frame};

#[derive(Debug, Deserialize)]
struct CrashReportDoc {
    backtraces: Vec<BacktraceDoc>,
}

#[derive(Debug, Deserialize)]
struct BacktraceDoc {
    hash: String,
    frames: Vec<FrameDoc>,
}

#[derive(Debug, Deserialize)]
struct FrameDoc {
    // The key must be present; `null` marks a frame with no source. A bare
    // `Option` would silently default on a missing key, so presence is
    // forced through `deserialize_with`.
    #[serde(deserialize_with = "required_nullable")]
    source_file: Option<String>,
    line_number: usize,
}

fn required_nullable<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::deserialize(deserializer)
}

impl From<BacktraceDoc> for Backtrace {
    fn from(doc: BacktraceDoc) -> Self {
        Backtrace {
            hash: doc.hash,
            frames: doc
                .frames
                .into_iter()
                .map(|f| Frame {
                    source_file: f.source_file,
                    line_number: f.line_number,
                })
                .collect(),
        }
    }
}

/// Parse a crash-report collection from JSON text.
///
/// Returns the backtraces of every report, in document order, ready to be
/// shared between the crash index and matched issues.
pub fn parse_crash_reports(json: &str) -> Result<Vec<Arc<Backtrace>>> {
    let reports: Vec<CrashReportDoc> =
        serde_json::from_str(json).context("malformed crash report collection")?;

    Ok(reports
        .into_iter()
        .flat_map(|r| r.backtraces)
        .map(|doc| Arc::new(Backtrace::from(doc)))
        .collect())
}

/// Load a crash-report collection from a file. Errors name the file.
pub fn load_crash_reports(path: &Path) -> Result<Vec<Arc<Backtrace>>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read crash reports from {}", path.display()))?;
    parse_crash_reports(&json)
        .with_context(|| format!("in crash report file {}", path.display()))
}
