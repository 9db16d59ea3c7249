#![deny(missing_docs)]
//! RepoScore core library.
//!
//! This crate contains the domain types and scoring primitives that power
//! the RepoScore command line tool.

pub mod classify;
pub mod domain;
pub mod error;
pub mod rank;
pub mod report;
pub mod score;
pub mod tally;

pub use classify::{FirstLabelClassifier, IssueCategory, LabelClassifier, PrCategory};
pub use domain::{ActivityKind, ActivityRecord, RawCounts, ScoredResult};
pub use error::{RepoScoreError, Result};
pub use rank::{Leaderboard, LeaderboardEntry, ScoreAverages, ScoreBreakdown, build_leaderboard};
pub use report::{FetchStatus, RepoScorecard, render_json, render_markdown};
pub use score::{
    DOC_ISSUE_WEIGHT, DOC_PR_WEIGHT, FEAT_BUG_ISSUE_WEIGHT, FEAT_BUG_PR_WEIGHT, TYPO_PR_WEIGHT,
    score, score_all,
};
pub use tally::{WeekActivity, tally_counts, weekly_activity};
