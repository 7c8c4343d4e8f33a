//! Entity model shared by the aggregation index, the correlation engine,
//! and the output formatters

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use sha2::{Digest, Sha256};

/// Identity key for a source file: lowercase hex SHA-256 of its content.
///
/// Two [`SourceFile`] records with equal hashes are the same file no matter
/// what path they were reported under, and every grouping table keys on this
/// value rather than on the path string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash(String);

impl ContentHash {
    /// Hash raw content bytes.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(format!("{:x}", Sha256::digest(bytes)))
    }

    /// Wrap an already-computed hex digest.
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A source file named by one or more analysis results.
///
/// `content` is cached when the file was readable at load time; report
/// rendering skips per-file pages for sources without cached content.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Absolute path as reported by the analysis tool
    pub path: PathBuf,

    /// Content identity; path-derived when the file could not be read
    pub hash: ContentHash,

    /// File content, if it was readable at load time
    pub content: Option<String>,
}

impl SourceFile {
    /// Final path component as UTF-8, used to match crash frames.
    pub fn basename(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }
}

/// A named analysis tool contributing results to the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generator {
    pub name: String,
}

impl Generator {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// One stack entry of a crash backtrace.
///
/// `source_file` is a basename, not a path; frames originating outside the
/// analyzed sources (or with no debug info) carry `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub source_file: Option<String>,
    pub line_number: usize,
}

/// A crash stack trace retrieved from the crash-reporting service.
///
/// Frames are in stack order: index 0 is frame 1, the topmost (most recent)
/// frame. The position is meaningful: correlation prefers the topmost
/// sufficiently-close frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backtrace {
    /// Stable identifier assigned by the crash service
    pub hash: String,

    pub frames: Vec<Frame>,
}

impl Backtrace {
    /// Build the external lookup URL by substituting `{hash}` in `template`.
    pub fn lookup_url(&self, template: &str) -> String {
        template.replace("{hash}", &self.hash)
    }
}

/// A backtrace attached to an issue by the correlation engine, together with
/// the matching frame number (1-based) and line distance.
#[derive(Debug, Clone)]
pub struct MatchedBacktrace {
    pub backtrace: Arc<Backtrace>,
    pub frame: usize,
    pub distance: usize,
}

/// A single diagnostic reported by a generator against a source file.
#[derive(Debug, Clone)]
pub struct Issue {
    pub source: Arc<SourceFile>,
    pub generator: Arc<Generator>,

    /// Short machine-readable category (e.g. "null-deref")
    pub kind: String,

    /// Human-readable message
    pub message: String,

    /// Line number; `None` means file-level, no specific line
    pub line: Option<usize>,

    /// Crash backtraces corroborating this issue. Empty until correlation
    /// runs, and stays empty for runs without crash data.
    pub backtraces: Vec<MatchedBacktrace>,
}

/// A record that a generator could not analyze a file (incomplete coverage).
///
/// Failures render in the report's notes but never participate in
/// correlation.
#[derive(Debug, Clone)]
pub struct Failure {
    pub source: Arc<SourceFile>,
    pub generator: Arc<Generator>,
    pub kind: String,
    pub message: String,
    pub line: Option<usize>,
}

/// One analysis result, as produced by the results loader.
#[derive(Debug, Clone)]
pub enum AnalysisResult {
    Issue(Issue),
    Failure(Failure),
}

impl AnalysisResult {
    pub fn source(&self) -> &Arc<SourceFile> {
        match self {
            AnalysisResult::Issue(i) => &i.source,
            AnalysisResult::Failure(f) => &f.source,
        }
    }

    pub fn generator(&self) -> &Arc<Generator> {
        match self {
            AnalysisResult::Issue(i) => &i.generator,
            AnalysisResult::Failure(f) => &f.generator,
        }
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            AnalysisResult::Issue(i) => i.line,
            AnalysisResult::Failure(f) => f.line,
        }
    }
}

/// Owner of one run's entities: interned source files and generators plus
/// the flat issue and failure collections.
///
/// Sources are interned by content hash: pushing a second record with the
/// same hash returns the first record's `Arc`, so identical content loaded
/// under two paths collapses into one entity. Generators intern by name.
#[derive(Debug, Default)]
pub struct AnalysisModel {
    sources: Vec<Arc<SourceFile>>,
    source_by_hash: HashMap<ContentHash, usize>,
    generators: Vec<Arc<Generator>>,
    generator_by_name: HashMap<String, usize>,

    pub issues: Vec<Issue>,
    pub failures: Vec<Failure>,
}

impl AnalysisModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a source file by content hash. The first record for a hash
    /// wins; later paths for the same content are dropped.
    pub fn intern_source(
        &mut self,
        path: PathBuf,
        hash: ContentHash,
        content: Option<String>,
    ) -> Arc<SourceFile> {
        if let Some(&idx) = self.source_by_hash.get(&hash) {
            return Arc::clone(&self.sources[idx]);
        }
        let file = Arc::new(SourceFile {
            path,
            hash: hash.clone(),
            content,
        });
        self.source_by_hash.insert(hash, self.sources.len());
        self.sources.push(Arc::clone(&file));
        file
    }

    /// Intern a generator by name.
    pub fn intern_generator(&mut self, name: &str) -> Arc<Generator> {
        if let Some(&idx) = self.generator_by_name.get(name) {
            return Arc::clone(&self.generators[idx]);
        }
        let generator = Arc::new(Generator::new(name));
        self.generator_by_name
            .insert(name.to_string(), self.generators.len());
        self.generators.push(Arc::clone(&generator));
        generator
    }

    pub fn push(&mut self, result: AnalysisResult) {
        match result {
            AnalysisResult::Issue(issue) => self.issues.push(issue),
            AnalysisResult::Failure(failure) => self.failures.push(failure),
        }
    }

    /// Interned source files, in first-seen order.
    pub fn sources(&self) -> &[Arc<SourceFile>] {
        &self.sources
    }

    /// Interned generators, in first-seen order.
    pub fn generators(&self) -> &[Arc<Generator>] {
        &self.generators
    }
}

/// Summary of an entire report run
#[derive(Debug, Clone, Default)]
pub struct ReportSummary {
    pub files: usize,
    pub issues: usize,
    pub failures: usize,

    /// Issues with at least one matched backtrace
    pub corroborated: usize,
}

impl ReportSummary {
    pub fn from_model(model: &AnalysisModel) -> Self {
        Self {
            files: model.sources().len(),
            issues: model.issues.len(),
            failures: model.failures.len(),
            corroborated: model
                .issues
                .iter()
                .filter(|i| !i.backtraces.is_empty())
                .count(),
        }
    }

    /// Check whether the run exceeds the configured exit threshold.
    ///
    /// - `"issues"` → fail if any issues were found
    /// - `"failures"` → fail if any issues or analysis failures
    /// - `"never"` → always pass
    pub fn exceeds_threshold(&self, fail_on: &str) -> bool {
        match fail_on {
            "issues" => self.issues > 0,
            "failures" => self.issues > 0 || self.failures > 0,
            "never" => false,
            _ => false, // default to "never" for unknown values
        }
    }
}
