use std::sync::Arc;

use anyhow::{bail, Context, Result};
use triage_core::{parse_crash_reports, Backtrace};

/// Fetch the crash-report collection from the crash service.
///
/// The body must be the same JSON collection accepted from a local file;
/// a non-success status or malformed body aborts the run.
pub fn fetch_crash_reports(url: &str) -> Result<Vec<Arc<Backtrace>>> {
    let client = reqwest::blocking::Client::new();
    let resp = client
        .get(url)
        .send()
        .with_context(|| format!("failed to reach crash service at {}", url))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let text = resp.text().unwrap_or_default();
        bail!("crash service error {}: {}", status, text);
    }

    let body = resp.text()?;
    parse_crash_reports(&body).with_context(|| format!("from crash service {}", url))
}
