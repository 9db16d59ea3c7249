//! Leaderboard assembly: rates, ranks, and averages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::ScoredResult;
use crate::score::{
    DOC_ISSUE_WEIGHT, DOC_PR_WEIGHT, FEAT_BUG_ISSUE_WEIGHT, FEAT_BUG_PR_WEIGHT, TYPO_PR_WEIGHT,
};

/// Per-category point values and ranking data for one participant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    /// Points from credited feature/bug pull requests.
    pub feat_bug_pr_points: i64,
    /// Points from credited documentation pull requests.
    pub doc_pr_points: i64,
    /// Points from credited typo pull requests.
    pub typo_pr_points: i64,
    /// Points from credited feature/bug issues.
    pub feat_bug_issue_points: i64,
    /// Points from credited documentation issues.
    pub doc_issue_points: i64,
    /// Weighted total score.
    pub total: i64,
    /// Share of the run's total score, as a percentage with one decimal.
    pub rate: f64,
    /// Competition rank; tied totals share a rank and the next rank skips.
    pub rank: usize,
}

/// A ranked participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// Participant login.
    pub user: String,
    /// Score breakdown for the participant.
    pub breakdown: ScoreBreakdown,
}

/// Mean point values across ranked participants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreAverages {
    /// Mean feature/bug pull request points.
    pub feat_bug_pr_points: f64,
    /// Mean documentation pull request points.
    pub doc_pr_points: f64,
    /// Mean typo pull request points.
    pub typo_pr_points: f64,
    /// Mean feature/bug issue points.
    pub feat_bug_issue_points: f64,
    /// Mean documentation issue points.
    pub doc_issue_points: f64,
    /// Mean total score.
    pub total: f64,
    /// Mean participation rate.
    pub rate: f64,
}

/// Ranked scoring results for one repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaderboard {
    /// Participants in rank order.
    pub entries: Vec<LeaderboardEntry>,
    /// Category averages across the ranked participants.
    pub averages: ScoreAverages,
}

/// Build a leaderboard from per-user scored results.
///
/// Participation rates are computed against the full run's score sum before
/// the `min_total` filter, so filtering does not inflate anyone's share.
pub fn build_leaderboard(scores: &BTreeMap<String, ScoredResult>, min_total: i64) -> Leaderboard {
    let score_sum: i64 = scores.values().map(|result| result.total).sum();

    let mut entries: Vec<LeaderboardEntry> = scores
        .iter()
        .filter(|(_, result)| result.total >= min_total)
        .map(|(user, result)| LeaderboardEntry {
            user: user.clone(),
            breakdown: breakdown_for(result, score_sum),
        })
        .collect();

    // Descending by total; tied totals keep login order for determinism.
    entries.sort_by(|a, b| {
        b.breakdown
            .total
            .cmp(&a.breakdown.total)
            .then_with(|| a.user.cmp(&b.user))
    });
    assign_ranks(&mut entries);

    let averages = compute_averages(&entries);
    Leaderboard { entries, averages }
}

fn breakdown_for(result: &ScoredResult, score_sum: i64) -> ScoreBreakdown {
    let rate = if score_sum > 0 {
        round_one_decimal(result.total as f64 / score_sum as f64 * 100.0)
    } else {
        0.0
    };
    ScoreBreakdown {
        feat_bug_pr_points: FEAT_BUG_PR_WEIGHT * result.feat_bug_prs,
        doc_pr_points: DOC_PR_WEIGHT * result.doc_prs,
        typo_pr_points: TYPO_PR_WEIGHT * result.typo_prs,
        feat_bug_issue_points: FEAT_BUG_ISSUE_WEIGHT * result.feat_bug_issues,
        doc_issue_points: DOC_ISSUE_WEIGHT * result.doc_issues,
        total: result.total,
        rate,
        rank: 0,
    }
}

fn assign_ranks(entries: &mut [LeaderboardEntry]) {
    let mut last_total = None;
    let mut current_rank = 0;
    for (position, entry) in entries.iter_mut().enumerate() {
        if last_total != Some(entry.breakdown.total) {
            current_rank = position + 1;
            last_total = Some(entry.breakdown.total);
        }
        entry.breakdown.rank = current_rank;
    }
}

fn compute_averages(entries: &[LeaderboardEntry]) -> ScoreAverages {
    if entries.is_empty() {
        return ScoreAverages::default();
    }
    let count = entries.len() as f64;
    let sum = |value: fn(&ScoreBreakdown) -> f64| -> f64 {
        entries.iter().map(|entry| value(&entry.breakdown)).sum()
    };
    ScoreAverages {
        feat_bug_pr_points: sum(|b| b.feat_bug_pr_points as f64) / count,
        doc_pr_points: sum(|b| b.doc_pr_points as f64) / count,
        typo_pr_points: sum(|b| b.typo_pr_points as f64) / count,
        feat_bug_issue_points: sum(|b| b.feat_bug_issue_points as f64) / count,
        doc_issue_points: sum(|b| b.doc_issue_points as f64) / count,
        total: sum(|b| b.total as f64) / count,
        rate: sum(|b| b.rate) / count,
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::build_leaderboard;
    use crate::domain::RawCounts;
    use crate::score::score;
    use std::collections::BTreeMap;

    fn scores(counts: &[(&str, RawCounts)]) -> BTreeMap<String, crate::domain::ScoredResult> {
        counts
            .iter()
            .map(|(user, raw)| (user.to_string(), score(raw).expect("score")))
            .collect()
    }

    #[test]
    fn orders_entries_by_total_descending() {
        let scores = scores(&[
            ("alice", RawCounts::new(1, 0, 0, 0, 0)),
            ("bob", RawCounts::new(3, 0, 0, 0, 0)),
            ("carol", RawCounts::new(2, 0, 0, 0, 0)),
        ]);

        let board = build_leaderboard(&scores, 0);

        let users: Vec<&str> = board
            .entries
            .iter()
            .map(|entry| entry.user.as_str())
            .collect();
        assert_eq!(users, vec!["bob", "carol", "alice"]);
    }

    #[test]
    fn tied_totals_share_a_rank_and_the_next_rank_skips() {
        let scores = scores(&[
            ("alice", RawCounts::new(2, 0, 0, 0, 0)),
            ("bob", RawCounts::new(2, 0, 0, 0, 0)),
            ("carol", RawCounts::new(1, 0, 0, 0, 0)),
        ]);

        let board = build_leaderboard(&scores, 0);

        assert_eq!(board.entries[0].breakdown.rank, 1);
        assert_eq!(board.entries[1].breakdown.rank, 1);
        assert_eq!(board.entries[2].breakdown.rank, 3);
    }

    #[test]
    fn rates_sum_to_roughly_one_hundred() {
        let scores = scores(&[
            ("alice", RawCounts::new(2, 0, 0, 0, 0)),
            ("bob", RawCounts::new(1, 0, 0, 0, 0)),
        ]);

        let board = build_leaderboard(&scores, 0);

        let total_rate: f64 = board
            .entries
            .iter()
            .map(|entry| entry.breakdown.rate)
            .sum();
        assert!((total_rate - 100.0).abs() < 0.2);
    }

    #[test]
    fn min_total_filters_but_keeps_rates_against_full_sum() {
        let scores = scores(&[
            ("alice", RawCounts::new(3, 0, 0, 0, 0)),
            ("bob", RawCounts::new(1, 0, 0, 0, 0)),
        ]);

        let board = build_leaderboard(&scores, 5);

        assert_eq!(board.entries.len(), 1);
        assert_eq!(board.entries[0].user, "alice");
        // 9 of 12 points, not 100%.
        assert_eq!(board.entries[0].breakdown.rate, 75.0);
    }

    #[test]
    fn breakdown_multiplies_credits_by_weights() {
        let scores = scores(&[("alice", RawCounts::new(2, 5, 5, 3, 3))]);

        let board = build_leaderboard(&scores, 0);

        let breakdown = board.entries[0].breakdown;
        assert_eq!(breakdown.feat_bug_pr_points, 6);
        assert_eq!(breakdown.doc_pr_points, 10);
        assert_eq!(breakdown.typo_pr_points, 1);
        assert_eq!(breakdown.feat_bug_issue_points, 6);
        assert_eq!(breakdown.doc_issue_points, 3);
        assert_eq!(breakdown.total, 26);
    }

    #[test]
    fn averages_cover_all_categories() {
        let scores = scores(&[
            ("alice", RawCounts::new(2, 0, 0, 0, 0)),
            ("bob", RawCounts::new(0, 1, 0, 0, 0)),
        ]);

        let board = build_leaderboard(&scores, 0);

        assert_eq!(board.averages.feat_bug_pr_points, 3.0);
        assert_eq!(board.averages.doc_pr_points, 1.0);
        assert_eq!(board.averages.total, 4.0);
    }

    #[test]
    fn empty_scores_produce_an_empty_board() {
        let board = build_leaderboard(&BTreeMap::new(), 0);
        assert!(board.entries.is_empty());
        assert_eq!(board.averages.total, 0.0);
    }
}
