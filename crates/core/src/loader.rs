//! Results-directory loading
//!
//! A results directory holds one JSON document per (generator, source file)
//! run. Discovery walks the directory with the `ignore` crate, so
//! `.gitignore` and configured exclusions apply; documents parse in
//! parallel and any malformed document aborts the load naming the file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use rayon::prelude::*;
use serde::Deserialize;
use thiserror::Error;

use crate::model::{
    AnalysisModel, AnalysisResult, ContentHash, Failure, Issue, SourceFile,
};

/// Error types for results loading
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read result document {}", path.display())]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed result document {}: {source}", path.display())]
    MalformedDocument {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct ResultDoc {
    generator: String,
    source: PathBuf,

    #[serde(default)]
    issues: Vec<IssueDoc>,

    #[serde(default)]
    failures: Vec<FailureDoc>,
}

#[derive(Debug, Deserialize)]
struct IssueDoc {
    kind: String,
    message: String,

    /// Absent line means file-level, no specific line
    #[serde(default)]
    line: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct FailureDoc {
    kind: String,
    message: String,

    #[serde(default)]
    line: Option<usize>,
}

/// Discover result documents (`*.json`) under `root`, respecting
/// `.gitignore` and skipping paths matching `ignore_patterns`.
///
/// Returns absolute paths sorted alphabetically, so load order (and with it
/// bucket order in the aggregation index) is deterministic.
pub fn discover_result_files(root: &Path, ignore_patterns: &[String]) -> Result<Vec<PathBuf>> {
    let root = root.canonicalize()?;

    let mut builder = WalkBuilder::new(&root);
    builder
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true);

    // Negated gitignore-syntax overrides act as excludes.
    if !ignore_patterns.is_empty() {
        let mut overrides = OverrideBuilder::new(&root);
        for pattern in ignore_patterns {
            let glob = if pattern.ends_with('/') {
                format!("!{}**", pattern)
            } else {
                format!("!{}", pattern)
            };
            overrides.add(&glob)?;
        }
        builder.overrides(overrides.build()?);
    }

    let mut files = Vec::new();

    for entry in builder.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue, // skip unreadable entries
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.into_path();
        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            if path.is_absolute() {
                files.push(path);
            } else {
                files.push(root.join(path));
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Load every result document under `dir` into a fresh model.
///
/// Documents parse in parallel; model assembly is sequential so interning
/// and result order stay deterministic.
pub fn load_results_dir(dir: &Path, ignore_patterns: &[String]) -> Result<AnalysisModel> {
    let files = discover_result_files(dir, ignore_patterns)?;

    let docs: Vec<ResultDoc> = files
        .par_iter()
        .map(|path| parse_result_file(path))
        .collect::<Result<_, LoadError>>()?;

    let mut model = AnalysisModel::new();

    // Memo by path so each source file is read and hashed once even when
    // several generators reported against it.
    let mut by_path: HashMap<PathBuf, Arc<SourceFile>> = HashMap::new();

    for doc in docs {
        let source = match by_path.get(&doc.source) {
            Some(s) => Arc::clone(s),
            None => {
                let (hash, content) = read_source(&doc.source);
                let s = model.intern_source(doc.source.clone(), hash, content);
                by_path.insert(doc.source.clone(), Arc::clone(&s));
                s
            }
        };
        let generator = model.intern_generator(&doc.generator);

        for issue in doc.issues {
            model.push(AnalysisResult::Issue(Issue {
                source: Arc::clone(&source),
                generator: Arc::clone(&generator),
                kind: issue.kind,
                message: issue.message,
                line: issue.line,
                backtraces: Vec::new(),
            }));
        }
        for failure in doc.failures {
            model.push(AnalysisResult::Failure(Failure {
                source: Arc::clone(&source),
                generator: Arc::clone(&generator),
                kind: failure.kind,
                message: failure.message,
                line: failure.line,
            }));
        }
    }

    Ok(model)
}

fn parse_result_file(path: &Path) -> Result<ResultDoc, LoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| LoadError::MalformedDocument {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and hash a reported source file. An unreadable source is not an
/// error: it keeps a path-derived hash (so it still groups consistently
/// within the run) and no cached content.
fn read_source(path: &Path) -> (ContentHash, Option<String>) {
    match std::fs::read(path) {
        Ok(bytes) => {
            let hash = ContentHash::of_bytes(&bytes);
            (hash, String::from_utf8(bytes).ok())
        }
        Err(_) => (
            ContentHash::of_bytes(path.to_string_lossy().as_bytes()),
            None,
        ),
    }
}
