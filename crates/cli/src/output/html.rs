//! HTML report rendering
//!
//! Produces `index.html` (one row per source file with per-generator issue
//! counts and a notes column) plus one page per file under `sources/`,
//! named by content hash, with issue/failure tables and line-anchored
//! source text. Files without cached content are skipped: there is no
//! source to render a page for.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use triage_core::{AnalysisModel, Failure, Issue, ReportIndex, SourceFile};

const CSS: &str = "\
      table { border-collapse: collapse; }
      th, td { border: 1px solid #ccc; padding: 4px 10px; text-align: left; }
      td.has_issues { background-color: #fdd; }
      td.no_issues { background-color: #dfd; }
      .note { margin: 2px 0 2px 3em; padding: 2px 8px; border-left: 3px solid; }
      .note.issue { border-color: #c00; background-color: #fee; }
      .note.failure { border-color: #e80; background-color: #fec; }
      .note .generator { color: #666; }
      ol.source { font-family: monospace; white-space: pre; }
";

/// Write the complete report below `out_dir`.
pub fn write_report(
    model: &AnalysisModel,
    index: &ReportIndex,
    url_template: &str,
    out_dir: &Path,
) -> Result<()> {
    let sources_dir = out_dir.join("sources");
    std::fs::create_dir_all(&sources_dir)
        .with_context(|| format!("failed to create report directory {}", out_dir.display()))?;

    std::fs::write(out_dir.join("index.html"), render_index(model, index))?;

    for file in model.sources() {
        // skip this file if we don't have source
        if file.content.is_none() {
            continue;
        }
        let page = render_source_page(file, model, index, url_template);
        std::fs::write(sources_dir.join(format!("{}.html", file.hash)), page)?;
    }

    Ok(())
}

/// The index page: source file × generator table of issue counts.
pub fn render_index(model: &AnalysisModel, index: &ReportIndex) -> String {
    let mut html = String::new();
    push_header(&mut html, "Analysis report");

    html.push_str("    <table>\n      <tr>\n        <th>Source file</th>\n");
    for generator in model.generators() {
        let _ = writeln!(html, "        <th>{}</th>", escape(&generator.name));
    }
    html.push_str("        <th>Notes</th>\n      </tr>\n");

    for file in model.sources() {
        if file.content.is_none() {
            continue;
        }

        html.push_str("      <tr>\n");
        let _ = writeln!(
            html,
            "        <td><a href=\"sources/{}.html\">{}</a></td>",
            file.hash,
            escape(&file.path.display().to_string())
        );

        for generator in model.generators() {
            let count = index.issues_for_generator(&file.hash, &generator.name).len();
            let class = if count > 0 { "has_issues" } else { "no_issues" };
            let _ = writeln!(html, "        <td class=\"{}\">{}</td>", class, count);
        }

        let failures = index.failures_for(&file.hash);
        if failures.is_empty() {
            html.push_str("        <td></td>\n");
        } else {
            let _ = writeln!(
                html,
                "        <td>Incomplete coverage: {} analysis failure(s)</td>",
                failures.len()
            );
        }
        html.push_str("      </tr>\n");
    }

    html.push_str("    </table>\n");
    push_footer(&mut html);
    html
}

/// A per-file page: issue and failure tables, then the source text with
/// one anchor per line and inline notes after each flagged line.
pub fn render_source_page(
    file: &SourceFile,
    model: &AnalysisModel,
    index: &ReportIndex,
    url_template: &str,
) -> String {
    let filename = file.path.display().to_string();

    let mut issue_ids: Vec<usize> = index.issues_for(&file.hash).to_vec();
    // lineless issues sort first (None < Some)
    issue_ids.sort_by_key(|&id| model.issues[id].line);
    let failure_ids = index.failures_for(&file.hash);

    let mut html = String::new();
    push_header(&mut html, &filename);
    let _ = writeln!(
        html,
        "    <h2><a id=\"file-{}\"></a>{}</h2>",
        file.hash,
        escape(&filename)
    );

    if issue_ids.is_empty() {
        html.push_str("    <p>No issues found</p>\n");
    } else {
        push_issue_table(&mut html, &issue_ids, model, file, url_template);
    }
    if !failure_ids.is_empty() {
        push_failure_table(&mut html, failure_ids, model);
    }

    // Lineless issues/failures note at the start of the file
    let _ = writeln!(html, "    <a id=\"file-{}-line-0\"></a>", file.hash);
    for &id in &issue_ids {
        let issue = &model.issues[id];
        if issue.line.is_none() {
            html.push_str(&issue_note(issue, url_template));
        }
    }
    for &id in failure_ids {
        let failure = &model.failures[id];
        if failure.line.is_none() {
            html.push_str(&failure_note(failure));
        }
    }

    if let Some(content) = &file.content {
        html.push_str("    <ol class=\"source\">\n");
        for (i, line) in content.lines().enumerate() {
            let lineno = i + 1;
            let _ = writeln!(
                html,
                "      <li id=\"file-{}-line-{}\">{}",
                file.hash,
                lineno,
                escape(line)
            );
            for &id in &issue_ids {
                let issue = &model.issues[id];
                if issue.line == Some(lineno) {
                    html.push_str(&issue_note(issue, url_template));
                }
            }
            for &id in failure_ids {
                let failure = &model.failures[id];
                if failure.line == Some(lineno) {
                    html.push_str(&failure_note(failure));
                }
            }
            html.push_str("      </li>\n");
        }
        html.push_str("    </ol>\n");
    }

    push_footer(&mut html);
    html
}

// ── Fragments ────────────────────────────────────────────────────

fn push_issue_table(
    html: &mut String,
    issue_ids: &[usize],
    model: &AnalysisModel,
    file: &SourceFile,
    url_template: &str,
) {
    html.push_str("    <table>\n      <tr>\n");
    for heading in ["Line", "Generator", "Kind", "Message", "Crash evidence"] {
        let _ = writeln!(html, "        <th>{}</th>", heading);
    }
    html.push_str("      </tr>\n");
    for &id in issue_ids {
        let issue = &model.issues[id];
        html.push_str("      <tr>\n");
        match issue.line {
            Some(line) => {
                let _ = writeln!(
                    html,
                    "        <td><a href=\"#file-{}-line-{}\">{}</a></td>",
                    file.hash, line, line
                );
            }
            None => html.push_str("        <td></td>\n"),
        }
        let _ = writeln!(html, "        <td>{}</td>", escape(&issue.generator.name));
        let _ = writeln!(html, "        <td>{}</td>", escape(&issue.kind));
        let _ = writeln!(html, "        <td>{}</td>", escape(&issue.message));
        html.push_str("        <td>");
        html.push_str(&backtrace_links(issue, url_template));
        html.push_str("</td>\n      </tr>\n");
    }
    html.push_str("    </table>\n");
}

fn push_failure_table(html: &mut String, failure_ids: &[usize], model: &AnalysisModel) {
    html.push_str("    <table>\n      <tr>\n");
    for heading in ["Line", "Generator", "Kind", "Message"] {
        let _ = writeln!(html, "        <th>{}</th>", heading);
    }
    html.push_str("      </tr>\n");
    for &id in failure_ids {
        let failure = &model.failures[id];
        html.push_str("      <tr>\n");
        match failure.line {
            Some(line) => {
                let _ = writeln!(html, "        <td>{}</td>", line);
            }
            None => html.push_str("        <td></td>\n"),
        }
        let _ = writeln!(html, "        <td>{}</td>", escape(&failure.generator.name));
        let _ = writeln!(html, "        <td>{}</td>", escape(&failure.kind));
        let _ = writeln!(html, "        <td>{}</td>", escape(&failure.message));
        html.push_str("      </tr>\n");
    }
    html.push_str("    </table>\n");
}

fn issue_note(issue: &Issue, url_template: &str) -> String {
    let mut note = format!(
        "      <div class=\"note issue\">{} <span class=\"generator\">[{}]</span>",
        escape(&issue.message),
        escape(&issue.generator.name)
    );
    let links = backtrace_links(issue, url_template);
    if !links.is_empty() {
        note.push(' ');
        note.push_str(&links);
    }
    note.push_str("</div>\n");
    note
}

fn failure_note(failure: &Failure) -> String {
    format!(
        "      <div class=\"note failure\">{} <span class=\"generator\">[{}]</span></div>\n",
        escape(&failure.message),
        escape(&failure.generator.name)
    )
}

/// One link per matched backtrace, labelled with frame number and distance.
fn backtrace_links(issue: &Issue, url_template: &str) -> String {
    issue
        .backtraces
        .iter()
        .map(|m| {
            format!(
                "<a href=\"{}\">crash {} frame #{} (distance {})</a>",
                escape(&m.backtrace.lookup_url(url_template)),
                escape(&m.backtrace.hash),
                m.frame,
                m.distance
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn push_header(html: &mut String, title: &str) {
    html.push_str("<html>\n<head>\n");
    html.push_str("  <meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "  <title>{}</title>", escape(title));
    html.push_str("  <style type=\"text/css\">\n");
    html.push_str(CSS);
    html.push_str("  </style>\n</head>\n<body>\n");
}

fn push_footer(html: &mut String) {
    html.push_str("</body>\n</html>\n");
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
