//! Tests for the entity model

use std::path::PathBuf;
use std::sync::Arc;

use triage_core::{
    AnalysisModel, AnalysisResult, Backtrace, ContentHash, Failure, Generator, Issue,
    ReportSummary, SourceFile,
};

#[test]
fn content_hash_is_hex_sha256() {
    let hash = ContentHash::of_bytes(b"hello world");
    assert_eq!(hash.as_hex().len(), 64);
    assert_eq!(
        hash.as_hex(),
        "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
    );
    assert_eq!(hash, ContentHash::of_bytes(b"hello world"));
    assert_ne!(hash, ContentHash::of_bytes(b"hello"));
}

#[test]
fn intern_source_collapses_equal_content() {
    let mut model = AnalysisModel::new();
    let hash = ContentHash::of_bytes(b"int main() {}\n");

    let first = model.intern_source(PathBuf::from("/a/main.c"), hash.clone(), None);
    let second = model.intern_source(PathBuf::from("/b/main.c"), hash, None);

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(model.sources().len(), 1);
    // the first path wins
    assert_eq!(model.sources()[0].path, PathBuf::from("/a/main.c"));
}

#[test]
fn intern_source_keeps_distinct_content_apart() {
    let mut model = AnalysisModel::new();
    model.intern_source(
        PathBuf::from("/a/main.c"),
        ContentHash::of_bytes(b"aaa"),
        None,
    );
    model.intern_source(
        PathBuf::from("/a/main.c"),
        ContentHash::of_bytes(b"bbb"),
        None,
    );
    assert_eq!(model.sources().len(), 2);
}

#[test]
fn intern_generator_by_name() {
    let mut model = AnalysisModel::new();
    let a = model.intern_generator("cpychecker");
    let b = model.intern_generator("cpychecker");
    let c = model.intern_generator("cppcheck");

    assert!(Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&a, &c));
    assert_eq!(model.generators().len(), 2);
}

#[test]
fn basename_is_the_final_component() {
    let file = SourceFile {
        path: PathBuf::from("/src/deep/nested/foo.c"),
        hash: ContentHash::of_bytes(b"x"),
        content: None,
    };
    assert_eq!(file.basename(), Some("foo.c"));
}

#[test]
fn lookup_url_substitutes_hash() {
    let bt = Backtrace {
        hash: "abc123".to_string(),
        frames: Vec::new(),
    };
    assert_eq!(
        bt.lookup_url("https://crashes.example.org/bthash/{hash}/"),
        "https://crashes.example.org/bthash/abc123/"
    );
}

fn sample_issue(model: &mut AnalysisModel, line: Option<usize>) -> Issue {
    let source = model.intern_source(
        PathBuf::from("/src/foo.c"),
        ContentHash::of_bytes(b"content"),
        None,
    );
    let generator = model.intern_generator("cpychecker");
    Issue {
        source,
        generator,
        kind: "null-deref".to_string(),
        message: "boom".to_string(),
        line,
        backtraces: Vec::new(),
    }
}

#[test]
fn push_routes_variants_to_their_collections() {
    let mut model = AnalysisModel::new();
    let issue = sample_issue(&mut model, Some(1));
    let failure = Failure {
        source: Arc::clone(&issue.source),
        generator: Arc::clone(&issue.generator),
        kind: "timeout".to_string(),
        message: "gave up".to_string(),
        line: None,
    };

    model.push(AnalysisResult::Issue(issue));
    model.push(AnalysisResult::Failure(failure));

    assert_eq!(model.issues.len(), 1);
    assert_eq!(model.failures.len(), 1);
}

#[test]
fn summary_counts_and_thresholds() {
    let mut model = AnalysisModel::new();
    let issue = sample_issue(&mut model, Some(1));
    let failure = Failure {
        source: Arc::clone(&issue.source),
        generator: Arc::clone(&issue.generator),
        kind: "timeout".to_string(),
        message: "gave up".to_string(),
        line: None,
    };
    model.push(AnalysisResult::Issue(issue));
    model.push(AnalysisResult::Failure(failure));

    let summary = ReportSummary::from_model(&model);
    assert_eq!(summary.files, 1);
    assert_eq!(summary.issues, 1);
    assert_eq!(summary.failures, 1);
    assert_eq!(summary.corroborated, 0);

    assert!(summary.exceeds_threshold("issues"));
    assert!(summary.exceeds_threshold("failures"));
    assert!(!summary.exceeds_threshold("never"));
    // unknown values default to "never"
    assert!(!summary.exceeds_threshold("sometimes"));
}

#[test]
fn failures_only_run_passes_issue_threshold() {
    let mut model = AnalysisModel::new();
    let issue = sample_issue(&mut model, Some(1));
    model.push(AnalysisResult::Failure(Failure {
        source: Arc::clone(&issue.source),
        generator: Arc::clone(&issue.generator),
        kind: "timeout".to_string(),
        message: "gave up".to_string(),
        line: None,
    }));

    let summary = ReportSummary::from_model(&model);
    assert!(!summary.exceeds_threshold("issues"));
    assert!(summary.exceeds_threshold("failures"));
}
