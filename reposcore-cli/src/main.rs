#![deny(missing_docs)]
//! RepoScore command-line interface.
//!
//! Fetches pull request and issue activity for GitHub repositories and
//! reports weighted contribution scores per participant.

mod cache;
mod github;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use github::{IssueFetcher, RepoId};
use reposcore_core::{
    FetchStatus, FirstLabelClassifier, RepoScorecard, build_leaderboard, render_json,
    render_markdown, score_all, tally_counts, weekly_activity,
};
use std::collections::BTreeSet;
use std::fmt::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "reposcore", version, about = "RepoScore CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct FetchArgs {
    /// GitHub access token used for API requests.
    #[arg(long, env = "GITHUB_TOKEN")]
    token: Option<String>,
    /// Directory for cached activity data.
    #[arg(long, default_value = "reposcore-cache")]
    cache_dir: PathBuf,
    /// Always fetch from the API, ignoring cached activity.
    #[arg(long)]
    no_cache: bool,
    /// Maximum number of repositories fetched concurrently.
    #[arg(short = 'j', long, default_value_t = 5)]
    concurrency: usize,
}

#[derive(Args, Clone)]
struct ScoreArgs {
    /// Drop participants whose total score is below this threshold.
    #[arg(long, default_value_t = 0)]
    min_contributions: i64,
    /// Logins excluded from scoring (repeatable or comma-separated).
    #[arg(long, value_delimiter = ',')]
    exclude_user: Vec<String>,
    /// Period start date (YYYY-MM-DD) for weekly activity tallies.
    #[arg(long)]
    week_start: Option<NaiveDate>,
}

#[derive(Args, Clone)]
struct OutputArgs {
    /// Output format for report data.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write the report to a file instead of stdout.
    #[arg(long = "report-output")]
    report_output: Option<PathBuf>,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Json,
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch activity and report contribution scores for repositories.
    Analyze {
        /// Repositories to analyze, in owner/name form.
        #[arg(required = true)]
        repos: Vec<String>,
        #[command(flatten)]
        fetch: FetchArgs,
        #[command(flatten)]
        scoring: ScoreArgs,
        #[command(flatten)]
        report: OutputArgs,
    },
}

#[cfg(not(test))]
#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            repos,
            fetch,
            scoring,
            report,
        } => {
            let fetcher: Arc<dyn IssueFetcher + Send + Sync> =
                Arc::new(github::ReqwestIssueFetcher::new(fetch.token.clone())?);
            run_analyze_with(fetcher, repos, fetch, scoring, report).await?
        }
    }

    Ok(())
}

#[cfg(test)]
fn main() {}

/// Scoring and caching options shared by every repository task.
struct AnalyzeOptions {
    cache_dir: PathBuf,
    no_cache: bool,
    excluded: BTreeSet<String>,
    min_contributions: i64,
    week_start: Option<NaiveDate>,
}

async fn run_analyze_with(
    fetcher: Arc<dyn IssueFetcher + Send + Sync>,
    repos: Vec<String>,
    fetch: FetchArgs,
    scoring: ScoreArgs,
    report: OutputArgs,
) -> CliResult<()> {
    let repo_ids = parse_repo_args(&repos)?;
    if repo_ids.is_empty() {
        println!("No repositories to analyze.");
        return Ok(());
    }

    let options = Arc::new(AnalyzeOptions {
        cache_dir: fetch.cache_dir,
        no_cache: fetch.no_cache,
        excluded: scoring.exclude_user.into_iter().collect(),
        min_contributions: scoring.min_contributions,
        week_start: scoring.week_start,
    });
    let concurrency = if fetch.concurrency == 0 {
        1
    } else {
        fetch.concurrency
    };
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let mut tasks = JoinSet::new();

    for repo in repo_ids {
        let permit = semaphore.clone().acquire_owned().await?;
        let fetcher = fetcher.clone();
        let options = options.clone();
        tasks.spawn(async move {
            let _permit = permit;
            analyze_repo(fetcher, options, repo).await
        });
    }

    let mut scorecards = Vec::new();
    while let Some(result) = tasks.join_next().await {
        match result {
            Ok(scorecard) => scorecards.push(scorecard),
            Err(err) => scorecards.push(scorecard_from_task_error(err)),
        }
    }
    scorecards.sort_by(|a, b| a.repo.cmp(&b.repo));

    emit_scorecards(&scorecards, &report).await?;

    Ok(())
}

fn parse_repo_args(repos: &[String]) -> CliResult<Vec<RepoId>> {
    repos.iter().map(|repo| RepoId::parse(repo)).collect()
}

async fn analyze_repo(
    fetcher: Arc<dyn IssueFetcher + Send + Sync>,
    options: Arc<AnalyzeOptions>,
    repo: RepoId,
) -> RepoScorecard {
    let mut scorecard = RepoScorecard::new(repo.to_string());
    let cache_file = cache::cache_path(&options.cache_dir, &repo);
    let now = cache::unix_now();

    let cached = if options.no_cache {
        None
    } else {
        cache::load_fresh(&cache_file, now).await
    };
    let records = match cached {
        Some(records) => {
            scorecard.status = FetchStatus::Cached;
            records
        }
        None => match github::fetch_all_records(fetcher.as_ref(), &repo).await {
            Ok(records) => {
                if let Err(err) = cache::store(&cache_file, now, &records).await {
                    return RepoScorecard::failed(repo.to_string(), format!("cache write: {err}"));
                }
                scorecard.status = FetchStatus::Fetched;
                records
            }
            Err(err) => return RepoScorecard::failed(repo.to_string(), err.to_string()),
        },
    };

    let counts = tally_counts(&records, &FirstLabelClassifier::new(), &options.excluded);
    let scores = match score_all(&counts) {
        Ok(scores) => scores,
        Err(err) => return RepoScorecard::failed(repo.to_string(), err.to_string()),
    };
    scorecard.leaderboard = Some(build_leaderboard(&scores, options.min_contributions));
    if let Some(start) = options.week_start {
        scorecard.weekly = Some(weekly_activity(&records, start));
    }
    scorecard
}

fn scorecard_from_task_error(error: tokio::task::JoinError) -> RepoScorecard {
    RepoScorecard::failed("unknown".to_string(), error.to_string())
}

async fn emit_scorecards(scorecards: &[RepoScorecard], output: &OutputArgs) -> CliResult<()> {
    let contents = match output.format {
        OutputFormat::Text => render_text(scorecards),
        OutputFormat::Markdown => render_markdown(scorecards),
        OutputFormat::Json => render_json(scorecards)?,
    };
    emit_output(output, contents).await
}

async fn emit_output(output: &OutputArgs, contents: String) -> CliResult<()> {
    if let Some(path) = &output.report_output {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, contents).await?;
    } else {
        print!("{contents}");
    }
    Ok(())
}

fn render_text(scorecards: &[RepoScorecard]) -> String {
    let mut output = String::new();
    for scorecard in scorecards {
        let _ = writeln!(output, "Repository: {}", scorecard.repo);
        match &scorecard.status {
            FetchStatus::Fetched => {
                let _ = writeln!(output, "Status: fetched");
            }
            FetchStatus::Cached => {
                let _ = writeln!(output, "Status: cached");
            }
            FetchStatus::Failed(error) => {
                let _ = writeln!(output, "Status: failed ({error})");
                let _ = writeln!(output);
                continue;
            }
            FetchStatus::Pending => {
                let _ = writeln!(output, "Status: pending");
                let _ = writeln!(output);
                continue;
            }
        }

        match &scorecard.leaderboard {
            Some(board) if board.entries.is_empty() => {
                let _ = writeln!(output, "Participants: none");
            }
            Some(board) => {
                let _ = writeln!(
                    output,
                    "{:>4}  {:<24} {:>11} {:>7} {:>8} {:>14} {:>10} {:>6} {:>7}",
                    "Rank",
                    "Participant",
                    "Feat/Bug PR",
                    "Doc PR",
                    "Typo PR",
                    "Feat/Bug Issue",
                    "Doc Issue",
                    "Total",
                    "Rate"
                );
                for entry in &board.entries {
                    let b = &entry.breakdown;
                    let _ = writeln!(
                        output,
                        "{:>4}  {:<24} {:>11} {:>7} {:>8} {:>14} {:>10} {:>6} {:>6.1}%",
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
                let averages = &board.averages;
                let _ = writeln!(
                    output,
                    "Averages: total {:.1}, rate {:.1}%",
                    averages.total, averages.rate
                );
            }
            None => {
                let _ = writeln!(output, "Participants: unavailable");
            }
        }

        if let Some(weekly) = &scorecard.weekly {
            if weekly.is_empty() {
                let _ = writeln!(output, "Weekly activity: none");
            } else {
                let _ = writeln!(output, "Weekly activity:");
                for (week, activity) in weekly {
                    let _ = writeln!(
                        output,
                        "- Week {week}: {} merged PRs, {} issues",
                        activity.merged_prs, activity.issues
                    );
                }
            }
        }

        let _ = writeln!(output);
    }
    output
}
