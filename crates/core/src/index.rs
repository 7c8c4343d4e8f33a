//! Aggregation index: grouping tables over a fully-loaded model
//!
//! Built once per run and handed by reference to the output formatters.
//! Keys are content hashes (and generator names), never path strings, so
//! identical content reported under different paths lands in one bucket.

use std::collections::HashMap;

use crate::model::{AnalysisModel, ContentHash};

/// Index of an issue into [`AnalysisModel::issues`]
pub type IssueId = usize;

/// Index of a failure into [`AnalysisModel::failures`]
pub type FailureId = usize;

/// Read-only lookup tables used by report rendering.
#[derive(Debug, Default)]
pub struct ReportIndex {
    issues_by_source: HashMap<ContentHash, Vec<IssueId>>,
    failures_by_source: HashMap<ContentHash, Vec<FailureId>>,
    issues_by_source_and_generator: HashMap<ContentHash, HashMap<String, Vec<IssueId>>>,
}

impl ReportIndex {
    /// Build the grouping tables in one pass over the issue collection and
    /// one over the failure collection. Bucket order is load order.
    pub fn build(model: &AnalysisModel) -> Self {
        let mut index = Self::default();

        for (id, issue) in model.issues.iter().enumerate() {
            let hash = &issue.source.hash;
            index
                .issues_by_source
                .entry(hash.clone())
                .or_default()
                .push(id);
            index
                .issues_by_source_and_generator
                .entry(hash.clone())
                .or_default()
                .entry(issue.generator.name.clone())
                .or_default()
                .push(id);
        }

        for (id, failure) in model.failures.iter().enumerate() {
            index
                .failures_by_source
                .entry(failure.source.hash.clone())
                .or_default()
                .push(id);
        }

        index
    }

    /// Issues reported against the file with the given content hash.
    /// An unknown hash yields an empty slice.
    pub fn issues_for(&self, hash: &ContentHash) -> &[IssueId] {
        self.issues_by_source
            .get(hash)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Analysis failures recorded for the file, in load order.
    pub fn failures_for(&self, hash: &ContentHash) -> &[FailureId] {
        self.failures_by_source
            .get(hash)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Issues reported against the file by one specific generator.
    pub fn issues_for_generator(&self, hash: &ContentHash, generator: &str) -> &[IssueId] {
        self.issues_by_source_and_generator
            .get(hash)
            .and_then(|per_generator| per_generator.get(generator))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of generators with at least one issue against the file.
    pub fn generator_buckets_for(&self, hash: &ContentHash) -> usize {
        self.issues_by_source_and_generator
            .get(hash)
            .map(HashMap::len)
            .unwrap_or(0)
    }
}
