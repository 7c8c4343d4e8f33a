use std::path::PathBuf;
use std::sync::Arc;

use triage_cli::output::terminal::{format_failure, format_issue};
use triage_core::{Backtrace, ContentHash, Failure, Frame, Generator, Issue, MatchedBacktrace, SourceFile};

fn source() -> Arc<SourceFile> {
    Arc::new(SourceFile {
        path: PathBuf::from("/src/foo.c"),
        hash: ContentHash::of_bytes(b"x"),
        content: None,
    })
}

#[test]
fn issue_line_includes_location_and_generator() {
    let issue = Issue {
        source: source(),
        generator: Arc::new(Generator::new("cpychecker")),
        kind: "null-deref".to_string(),
        message: "possible NULL dereference".to_string(),
        line: Some(9),
        backtraces: Vec::new(),
    };

    let line = format_issue(&issue);
    assert!(line.contains("possible NULL dereference"));
    assert!(line.contains("/src/foo.c:9"));
    assert!(line.contains("[cpychecker]"));
    assert!(!line.contains("crash"));
}

#[test]
fn lineless_issue_omits_line_number() {
    let issue = Issue {
        source: source(),
        generator: Arc::new(Generator::new("cpychecker")),
        kind: "style".to_string(),
        message: "file-level".to_string(),
        line: None,
        backtraces: Vec::new(),
    };

    let line = format_issue(&issue);
    assert!(line.contains("/src/foo.c"));
    assert!(!line.contains("/src/foo.c:"));
}

#[test]
fn corroborated_issue_shows_crash_count() {
    let mut issue = Issue {
        source: source(),
        generator: Arc::new(Generator::new("cpychecker")),
        kind: "null-deref".to_string(),
        message: "boom".to_string(),
        line: Some(9),
        backtraces: Vec::new(),
    };
    issue.backtraces.push(MatchedBacktrace {
        backtrace: Arc::new(Backtrace {
            hash: "abc".to_string(),
            frames: vec![Frame {
                source_file: Some("foo.c".to_string()),
                line_number: 9,
            }],
        }),
        frame: 1,
        distance: 0,
    });

    assert!(format_issue(&issue).contains("1 crash(es)"));
}

#[test]
fn failure_line_names_generator_and_file() {
    let failure = Failure {
        source: source(),
        generator: Arc::new(Generator::new("cppcheck")),
        kind: "timeout".to_string(),
        message: "analysis timed out".to_string(),
        line: None,
    };

    let line = format_failure(&failure);
    assert!(line.contains("cppcheck"));
    assert!(line.contains("/src/foo.c"));
    assert!(line.contains("analysis timed out"));
}
