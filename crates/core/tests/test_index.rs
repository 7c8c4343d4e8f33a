//! Tests for the aggregation index

use std::path::PathBuf;
use std::sync::Arc;

use triage_core::{
    AnalysisModel, AnalysisResult, ContentHash, Failure, Generator, Issue, ReportIndex, SourceFile,
};

fn source_with_hash(path: &str, hash: &str) -> Arc<SourceFile> {
    Arc::new(SourceFile {
        path: PathBuf::from(path),
        hash: ContentHash::from_hex(hash),
        content: None,
    })
}

fn issue(source: &Arc<SourceFile>, generator: &Arc<Generator>, line: usize) -> Issue {
    Issue {
        source: Arc::clone(source),
        generator: Arc::clone(generator),
        kind: "check".to_string(),
        message: "something looks off".to_string(),
        line: Some(line),
        backtraces: Vec::new(),
    }
}

fn failure(source: &Arc<SourceFile>, generator: &Arc<Generator>) -> Failure {
    Failure {
        source: Arc::clone(source),
        generator: Arc::clone(generator),
        kind: "timeout".to_string(),
        message: "analysis timed out".to_string(),
        line: None,
    }
}

#[test]
fn groups_issues_and_failures_per_file() {
    // Two issues from two generators plus one failure from a third, all
    // against the same file.
    let file = source_with_hash("/src/foo.c", "aa11");
    let gen_a = Arc::new(Generator::new("cpychecker"));
    let gen_b = Arc::new(Generator::new("clang-analyzer"));
    let gen_c = Arc::new(Generator::new("cppcheck"));

    let mut model = AnalysisModel::new();
    model.push(AnalysisResult::Issue(issue(&file, &gen_a, 10)));
    model.push(AnalysisResult::Issue(issue(&file, &gen_b, 20)));
    model.push(AnalysisResult::Failure(failure(&file, &gen_c)));

    let index = ReportIndex::build(&model);

    assert_eq!(index.issues_for(&file.hash).len(), 2);
    assert_eq!(index.failures_for(&file.hash).len(), 1);
    assert_eq!(index.generator_buckets_for(&file.hash), 2);
    assert_eq!(index.issues_for_generator(&file.hash, "cpychecker").len(), 1);
    assert_eq!(
        index.issues_for_generator(&file.hash, "clang-analyzer").len(),
        1
    );
}

#[test]
fn grouping_dedupes_by_content_hash_not_path() {
    // Same content hash under two different path strings: one bucket.
    let first = source_with_hash("/build/a/foo.c", "c0ffee");
    let second = source_with_hash("/build/b/foo.c", "c0ffee");
    let generator = Arc::new(Generator::new("cpychecker"));

    let mut model = AnalysisModel::new();
    model.push(AnalysisResult::Issue(issue(&first, &generator, 1)));
    model.push(AnalysisResult::Issue(issue(&second, &generator, 2)));

    let index = ReportIndex::build(&model);

    assert_eq!(index.issues_for(&first.hash).len(), 2);
    assert_eq!(index.issues_for(&second.hash).len(), 2);
}

#[test]
fn lookup_miss_returns_empty_not_error() {
    let index = ReportIndex::build(&AnalysisModel::new());
    let unknown = ContentHash::from_hex("deadbeef");

    assert!(index.issues_for(&unknown).is_empty());
    assert!(index.failures_for(&unknown).is_empty());
    assert!(index.issues_for_generator(&unknown, "cpychecker").is_empty());
    assert_eq!(index.generator_buckets_for(&unknown), 0);
}

#[test]
fn generator_with_no_issues_on_file_is_an_empty_bucket() {
    let file = source_with_hash("/src/foo.c", "aa11");
    let gen_a = Arc::new(Generator::new("cpychecker"));

    let mut model = AnalysisModel::new();
    model.push(AnalysisResult::Issue(issue(&file, &gen_a, 10)));

    let index = ReportIndex::build(&model);
    assert!(index.issues_for_generator(&file.hash, "cppcheck").is_empty());
}

#[test]
fn bucket_order_is_load_order() {
    let file = source_with_hash("/src/foo.c", "aa11");
    let generator = Arc::new(Generator::new("cpychecker"));

    let mut model = AnalysisModel::new();
    for line in [30, 10, 20] {
        model.push(AnalysisResult::Issue(issue(&file, &generator, line)));
    }

    let index = ReportIndex::build(&model);
    let lines: Vec<Option<usize>> = index
        .issues_for(&file.hash)
        .iter()
        .map(|&id| model.issues[id].line)
        .collect();
    assert_eq!(lines, vec![Some(30), Some(10), Some(20)]);
}
