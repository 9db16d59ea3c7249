//! Domain entities for RepoScore.

use serde::{Deserialize, Serialize};

/// Raw per-user contribution counts gathered from a repository.
///
/// Fields are signed so that bad data arriving from an external producer can
/// be rejected by the score calculator instead of being silently clamped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCounts {
    /// Merged pull requests labelled as a feature or bug fix.
    pub feat_bug_prs: i64,
    /// Merged pull requests labelled as documentation.
    pub doc_prs: i64,
    /// Merged pull requests labelled as a typo fix.
    pub typo_prs: i64,
    /// Open or resolved issues labelled as a feature or bug.
    pub feat_bug_issues: i64,
    /// Open or resolved issues labelled as documentation.
    pub doc_issues: i64,
}

impl RawCounts {
    /// Build raw counts from the five category totals.
    pub fn new(
        feat_bug_prs: i64,
        doc_prs: i64,
        typo_prs: i64,
        feat_bug_issues: i64,
        doc_issues: i64,
    ) -> Self {
        Self {
            feat_bug_prs,
            doc_prs,
            typo_prs,
            feat_bug_issues,
            doc_issues,
        }
    }
}

/// Credited per-user counts after budget capping, plus the final score.
///
/// Each credited count is at most its raw counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredResult {
    /// Credited feature/bug pull requests.
    pub feat_bug_prs: i64,
    /// Credited documentation pull requests.
    pub doc_prs: i64,
    /// Credited typo pull requests.
    pub typo_prs: i64,
    /// Credited feature/bug issues.
    pub feat_bug_issues: i64,
    /// Credited documentation issues.
    pub doc_issues: i64,
    /// Weighted total score.
    pub total: i64,
}

/// Kind of activity item fetched from the issues endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivityKind {
    /// A pull request; only merged ones earn credit.
    PullRequest {
        /// Whether the pull request was merged into the main branch.
        merged: bool,
    },
    /// An issue; eligibility depends on how it was closed, if at all.
    Issue {
        /// GitHub `state_reason` field (`completed`, `reopened`,
        /// `not_planned`, or absent for open issues).
        state_reason: Option<String>,
    },
}

/// A single pull request or issue attributed to an author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    /// Login of the author.
    pub author: String,
    /// Label names attached to the item, in API order.
    pub labels: Vec<String>,
    /// Whether the item is a pull request or an issue.
    #[serde(flatten)]
    pub kind: ActivityKind,
    /// Creation timestamp as an RFC 3339 string.
    pub created_at: String,
}
