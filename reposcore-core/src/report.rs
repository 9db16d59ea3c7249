//! Report formatting utilities for RepoScore outputs.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::rank::{Leaderboard, ScoreAverages};
use crate::tally::WeekActivity;

/// Status of the activity fetch for a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum FetchStatus {
    /// Fetch has not started.
    Pending,
    /// Activity was fetched from the GitHub API.
    Fetched,
    /// Activity was loaded from a fresh disk cache.
    Cached,
    /// Fetch or scoring failed with an error message.
    Failed(String),
}

/// Scoring results for one repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoScorecard {
    /// Repository in `owner/name` form.
    pub repo: String,
    /// Fetch status.
    pub status: FetchStatus,
    /// Ranked results, absent when the fetch failed.
    pub leaderboard: Option<Leaderboard>,
    /// Weekly activity tallies, present when a period start was given.
    pub weekly: Option<BTreeMap<i64, WeekActivity>>,
}

impl RepoScorecard {
    /// Create a new scorecard for a repository.
    pub fn new(repo: String) -> Self {
        Self {
            repo,
            status: FetchStatus::Pending,
            leaderboard: None,
            weekly: None,
        }
    }

    /// Create a scorecard for a failed repository.
    pub fn failed(repo: String, error: impl Into<String>) -> Self {
        Self {
            repo,
            status: FetchStatus::Failed(error.into()),
            leaderboard: None,
            weekly: None,
        }
    }
}

/// Render a list of scorecards as Markdown.
pub fn render_markdown(scorecards: &[RepoScorecard]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# RepoScore Report\n");
    for scorecard in scorecards {
        let _ = writeln!(output, "## {}\n", scorecard.repo);
        append_status(&mut output, &scorecard.status);
        if let Some(board) = &scorecard.leaderboard {
            append_leaderboard_table(&mut output, board);
            append_averages(&mut output, &board.averages);
        }
        if let Some(weekly) = &scorecard.weekly {
            append_weekly(&mut output, weekly);
        }
        let _ = writeln!(output);
    }
    output
}

/// Render any serializable report payload as JSON.
pub fn render_json<T: Serialize + ?Sized>(payload: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(payload)
}

fn append_status(output: &mut String, status: &FetchStatus) {
    match status {
        FetchStatus::Pending => {
            let _ = writeln!(output, "- Status: pending");
        }
        FetchStatus::Fetched => {
            let _ = writeln!(output, "- Status: fetched");
        }
        FetchStatus::Cached => {
            let _ = writeln!(output, "- Status: cached");
        }
        FetchStatus::Failed(error) => {
            let _ = writeln!(output, "- Status: failed ({error})");
        }
    }
    let _ = writeln!(output);
}

fn append_leaderboard_table(output: &mut String, board: &Leaderboard) {
    if board.entries.is_empty() {
        let _ = writeln!(output, "No scored participants.\n");
        return;
    }
    let _ = writeln!(
        output,
        "| Rank | Participant | Feat/Bug PR | Doc PR | Typo PR | Feat/Bug Issue | Doc Issue | Total | Rate |"
    );
    let _ = writeln!(
        output,
        "|---:|---|---:|---:|---:|---:|---:|---:|---:|"
    );
    for entry in &board.entries {
        let b = &entry.breakdown;
        let _ = writeln!(
            output,
            "| {} | {} | {} | {} | {} | {} | {} | {} | {:.1}% |",
            b.rank,
            entry.user,
            b.feat_bug_pr_points,
            b.doc_pr_points,
            b.typo_pr_points,
            b.feat_bug_issue_points,
            b.doc_issue_points,
            b.total,
            b.rate
        );
    }
    let _ = writeln!(output);
}

fn append_averages(output: &mut String, averages: &ScoreAverages) {
    let _ = writeln!(
        output,
        "Averages: feat/bug PR {:.1}, doc PR {:.1}, typo PR {:.1}, feat/bug issue {:.1}, doc issue {:.1}, total {:.1}, rate {:.1}%",
        averages.feat_bug_pr_points,
        averages.doc_pr_points,
        averages.typo_pr_points,
        averages.feat_bug_issue_points,
        averages.doc_issue_points,
        averages.total,
        averages.rate
    );
    let _ = writeln!(output);
}

fn append_weekly(output: &mut String, weekly: &BTreeMap<i64, WeekActivity>) {
    if weekly.is_empty() {
        let _ = writeln!(output, "### Weekly activity\nNo activity recorded.\n");
        return;
    }
    let _ = writeln!(output, "### Weekly activity");
    for (week, activity) in weekly {
        let _ = writeln!(
            output,
            "- Week {week}: {} merged PRs, {} issues",
            activity.merged_prs, activity.issues
        );
    }
    let _ = writeln!(output);
}
