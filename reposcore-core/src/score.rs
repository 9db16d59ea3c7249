//! The contribution score calculator.
//!
//! A pure transform from per-user raw category counts to credited counts and
//! a weighted total. Doc and typo pull requests are capped relative to
//! feature/bug pull requests, and issue credit is capped relative to the
//! validated pull request volume, so low-substance contributions cannot
//! dominate a ranking.

use std::collections::BTreeMap;

use crate::domain::{RawCounts, ScoredResult};
use crate::error::{RepoScoreError, Result};

/// Points per credited feature or bug fix pull request.
pub const FEAT_BUG_PR_WEIGHT: i64 = 3;
/// Points per credited documentation pull request.
pub const DOC_PR_WEIGHT: i64 = 2;
/// Points per credited typo pull request.
pub const TYPO_PR_WEIGHT: i64 = 1;
/// Points per credited feature or bug issue.
pub const FEAT_BUG_ISSUE_WEIGHT: i64 = 2;
/// Points per credited documentation issue.
pub const DOC_ISSUE_WEIGHT: i64 = 1;

/// Doc and typo pull requests may total at most this multiple of the
/// feature/bug pull request count (with a floor of one).
const DOC_TYPO_PR_RATIO: i64 = 3;
/// Issues may total at most this multiple of the validated pull request count.
const ISSUE_PR_RATIO: i64 = 4;

/// Compute the credited counts and weighted total for one participant.
///
/// Total over non-negative inputs; any negative field is a precondition
/// violation reported as [`RepoScoreError::InvalidInput`].
pub fn score(raw: &RawCounts) -> Result<ScoredResult> {
    validate(raw)?;

    let p_fb = raw.feat_bug_prs;
    let p_d = raw.doc_prs;
    let p_t = raw.typo_prs;
    let i_fb = raw.feat_bug_issues;
    let i_d = raw.doc_issues;

    // Feature/bug PRs always count; doc and typo PRs share a capped budget.
    let p_valid = p_fb + (p_d + p_t).min(DOC_TYPO_PR_RATIO * p_fb.max(1));
    let i_valid = (i_fb + i_d).min(ISSUE_PR_RATIO * p_valid);

    // Allocate by priority, highest weight first, so the budget maximizes
    // the total.
    let feat_bug_prs = p_fb.min(p_valid);
    let doc_prs = p_d.min(p_valid - feat_bug_prs);
    let typo_prs = p_valid - feat_bug_prs - doc_prs;
    let feat_bug_issues = i_fb.min(i_valid);
    let doc_issues = i_valid - feat_bug_issues;

    let total = FEAT_BUG_PR_WEIGHT * feat_bug_prs
        + DOC_PR_WEIGHT * doc_prs
        + TYPO_PR_WEIGHT * typo_prs
        + FEAT_BUG_ISSUE_WEIGHT * feat_bug_issues
        + DOC_ISSUE_WEIGHT * doc_issues;

    Ok(ScoredResult {
        feat_bug_prs,
        doc_prs,
        typo_prs,
        feat_bug_issues,
        doc_issues,
        total,
    })
}

/// Score every participant in a run.
///
/// A participant with invalid counts fails the whole run with an error
/// naming that participant; nothing is silently skipped or clamped.
pub fn score_all(counts: &BTreeMap<String, RawCounts>) -> Result<BTreeMap<String, ScoredResult>> {
    let mut scored = BTreeMap::new();
    for (user, raw) in counts {
        let result =
            score(raw).map_err(|err| RepoScoreError::Other(format!("scoring {user}: {err}")))?;
        scored.insert(user.clone(), result);
    }
    Ok(scored)
}

fn validate(raw: &RawCounts) -> Result<()> {
    let fields = [
        ("featBugPrs", raw.feat_bug_prs),
        ("docPrs", raw.doc_prs),
        ("typoPrs", raw.typo_prs),
        ("featBugIssues", raw.feat_bug_issues),
        ("docIssues", raw.doc_issues),
    ];
    for (field, value) in fields {
        if value < 0 {
            return Err(RepoScoreError::InvalidInput { field, value });
        }
    }
    Ok(())
}
