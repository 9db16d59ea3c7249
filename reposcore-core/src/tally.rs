//! Tallying fetched activity into per-user raw counts.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::classify::{IssueCategory, LabelClassifier, PrCategory};
use crate::domain::{ActivityKind, ActivityRecord, RawCounts};

/// Merged pull request and eligible issue counts for one week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekActivity {
    /// Merged pull requests created during the week.
    pub merged_prs: u64,
    /// Eligible issues created during the week.
    pub issues: u64,
}

/// Build per-user raw counts from fetched activity records.
///
/// Merged pull requests feed the PR categories; issues count only while
/// open, reopened, or closed as completed. Excluded users are dropped after
/// tallying.
pub fn tally_counts<C: LabelClassifier>(
    records: &[ActivityRecord],
    classifier: &C,
    excluded: &BTreeSet<String>,
) -> BTreeMap<String, RawCounts> {
    let mut counts: BTreeMap<String, RawCounts> = BTreeMap::new();

    for record in records {
        let entry = counts.entry(record.author.clone()).or_default();
        match &record.kind {
            ActivityKind::PullRequest { merged: true } => {
                match classifier.classify_pr(&record.labels) {
                    Some(PrCategory::FeatBug) => entry.feat_bug_prs += 1,
                    Some(PrCategory::Doc) => entry.doc_prs += 1,
                    Some(PrCategory::Typo) => entry.typo_prs += 1,
                    None => {}
                }
            }
            ActivityKind::PullRequest { merged: false } => {}
            ActivityKind::Issue { state_reason } => {
                if issue_is_eligible(state_reason.as_deref()) {
                    match classifier.classify_issue(&record.labels) {
                        Some(IssueCategory::FeatBug) => entry.feat_bug_issues += 1,
                        Some(IssueCategory::Doc) => entry.doc_issues += 1,
                        None => {}
                    }
                }
            }
        }
    }

    counts.retain(|user, _| !excluded.contains(user));
    counts
}

/// Whether an issue's state reason keeps it eligible for scoring.
///
/// Open issues (no reason), reopened, and closed-as-completed count; closed
/// as not-planned does not.
pub fn issue_is_eligible(state_reason: Option<&str>) -> bool {
    matches!(state_reason, None | Some("completed") | Some("reopened"))
}

/// Count merged pull requests and eligible issues per 1-based week index
/// starting from `week_start`.
///
/// Records with an unparseable timestamp are skipped.
pub fn weekly_activity(
    records: &[ActivityRecord],
    week_start: NaiveDate,
) -> BTreeMap<i64, WeekActivity> {
    let mut weeks: BTreeMap<i64, WeekActivity> = BTreeMap::new();

    for record in records {
        let Ok(created) = DateTime::parse_from_rfc3339(&record.created_at) else {
            continue;
        };
        let days = (created.date_naive() - week_start).num_days();
        let week = days.div_euclid(7) + 1;

        match &record.kind {
            ActivityKind::PullRequest { merged: true } => {
                weeks.entry(week).or_default().merged_prs += 1;
            }
            ActivityKind::PullRequest { merged: false } => {}
            ActivityKind::Issue { state_reason } => {
                if issue_is_eligible(state_reason.as_deref()) {
                    weeks.entry(week).or_default().issues += 1;
                }
            }
        }
    }

    weeks
}
