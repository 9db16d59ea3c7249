//! Label classification for pull requests and issues.

use serde::{Deserialize, Serialize};

/// Category assigned to a merged pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrCategory {
    /// Feature work or a bug fix.
    FeatBug,
    /// Documentation change.
    Doc,
    /// Typo fix.
    Typo,
}

/// Category assigned to an eligible issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    /// Feature request or bug report.
    FeatBug,
    /// Documentation issue.
    Doc,
}

/// Maps item labels to scoring categories.
///
/// Injected as the producer of raw counts so that a repository with a
/// different labelling convention can supply its own implementation.
#[cfg_attr(test, mockall::automock)]
pub trait LabelClassifier {
    /// Classify a merged pull request, or return `None` if it earns no credit.
    fn classify_pr(&self, labels: &[String]) -> Option<PrCategory>;
    /// Classify an eligible issue, or return `None` if it earns no credit.
    fn classify_issue(&self, labels: &[String]) -> Option<IssueCategory>;
}

/// Default classifier: only the first label counts.
///
/// `enhancement` and `bug` map to the feature/bug category, `documentation`
/// to docs, and `typo` (pull requests only) to typo fixes. Items with no
/// labels or an unrecognized first label earn no credit.
#[derive(Debug, Default, Clone)]
pub struct FirstLabelClassifier;

impl FirstLabelClassifier {
    /// Create the default classifier.
    pub fn new() -> Self {
        Self
    }
}

impl LabelClassifier for FirstLabelClassifier {
    fn classify_pr(&self, labels: &[String]) -> Option<PrCategory> {
        match labels.first().map(String::as_str)? {
            "enhancement" | "bug" => Some(PrCategory::FeatBug),
            "documentation" => Some(PrCategory::Doc),
            "typo" => Some(PrCategory::Typo),
            _ => None,
        }
    }

    fn classify_issue(&self, labels: &[String]) -> Option<IssueCategory> {
        match labels.first().map(String::as_str)? {
            "enhancement" | "bug" => Some(IssueCategory::FeatBug),
            "documentation" => Some(IssueCategory::Doc),
            _ => None,
        }
    }
}
