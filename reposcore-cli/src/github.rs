//! GitHub issues API client for the RepoScore CLI.
//!
//! A single paginated listing of the issues endpoint covers both pull
//! requests and issues; an item carrying a `pull_request` object is a pull
//! request, merged when its inline `merged_at` is set.

use crate::CliResult;
use reposcore_core::{ActivityKind, ActivityRecord};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

const API_BASE_URL: &str = "https://api.github.com";
const PER_PAGE: u32 = 100;
const USER_AGENT: &str = "reposcore-cli";

/// A GitHub repository identified by owner and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    /// Account or organization owning the repository.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl RepoId {
    /// Parse an `owner/name` argument.
    pub fn parse(input: &str) -> CliResult<Self> {
        let trimmed = input.trim();
        let mut parts = trimmed.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            _ => Err(format!("invalid repository '{trimmed}', expected owner/name").into()),
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Author of an issue or pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueAuthor {
    /// GitHub login.
    pub login: String,
}

/// A label attached to an issue or pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueLabel {
    /// Label name; GitHub may omit it for deleted labels.
    pub name: Option<String>,
}

/// Pull request marker embedded in an issues listing item.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestRef {
    /// Merge timestamp; present only for merged pull requests.
    pub merged_at: Option<String>,
}

/// One item from the issues listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueItem {
    /// Author; absent for deleted accounts.
    pub user: Option<IssueAuthor>,
    /// Attached labels.
    #[serde(default)]
    pub labels: Vec<IssueLabel>,
    /// Present when the item is a pull request.
    pub pull_request: Option<PullRequestRef>,
    /// Close reason for issues.
    pub state_reason: Option<String>,
    /// Creation timestamp.
    pub created_at: Option<String>,
}

/// One page of the issues listing plus pagination state.
#[derive(Debug, Clone)]
pub struct IssuePage {
    /// Items on the page.
    pub items: Vec<IssueItem>,
    /// Whether the `Link` header advertised a next page.
    pub has_next: bool,
}

/// HTTP abstraction over the paginated issues listing.
pub trait IssueFetcher {
    /// Fetch one page of the issues listing for a repository.
    fn fetch_page<'a>(
        &'a self,
        repo: &'a RepoId,
        page: u32,
    ) -> Pin<Box<dyn Future<Output = CliResult<IssuePage>> + Send + 'a>>;
}

/// Reqwest-backed issue fetcher.
#[cfg_attr(test, allow(dead_code))]
pub struct ReqwestIssueFetcher {
    client: Client,
    token: Option<String>,
}

impl ReqwestIssueFetcher {
    /// Build a new fetcher, optionally authenticating with a token.
    #[cfg_attr(test, allow(dead_code))]
    pub fn new(token: Option<String>) -> CliResult<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client, token })
    }
}

impl IssueFetcher for ReqwestIssueFetcher {
    fn fetch_page<'a>(
        &'a self,
        repo: &'a RepoId,
        page: u32,
    ) -> Pin<Box<dyn Future<Output = CliResult<IssuePage>> + Send + 'a>> {
        Box::pin(fetch_issue_page(
            &self.client,
            self.token.as_deref(),
            repo,
            page,
        ))
    }
}

/// Fetch one page of the issues listing over HTTP.
async fn fetch_issue_page(
    client: &Client,
    token: Option<&str>,
    repo: &RepoId,
    page: u32,
) -> CliResult<IssuePage> {
    let url = format!("{API_BASE_URL}/repos/{}/{}/issues", repo.owner, repo.name);
    let mut request = client
        .get(url)
        .header("Accept", "application/vnd.github+json")
        .query(&[
            ("state", "all".to_string()),
            ("per_page", PER_PAGE.to_string()),
            ("page", page.to_string()),
        ]);
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }

    let response = request.send().await?;
    if let Some(message) = api_error_message(response.status().as_u16()) {
        return Err(message.into());
    }
    let has_next = response
        .headers()
        .get(reqwest::header::LINK)
        .and_then(|value| value.to_str().ok())
        .map(|link| link.contains("rel=\"next\""))
        .unwrap_or(false);
    let items = response.json::<Vec<IssueItem>>().await?;
    Ok(IssuePage { items, has_next })
}

/// Map a GitHub API status code to an actionable error message.
///
/// Returns `None` for success statuses.
pub fn api_error_message(status: u16) -> Option<String> {
    match status {
        200..=299 => None,
        401 => Some("authentication failed: the GitHub token was rejected".to_string()),
        403 => Some(
            "request failed (403): GitHub API rate limit reached; unauthenticated \
             requests allow at most 60 per hour, pass --token or set GITHUB_TOKEN"
                .to_string(),
        ),
        404 => Some("request failed (404): repository does not exist".to_string()),
        422 => Some(
            "request failed (422): unprocessable content; validation failed or the \
             endpoint was spam-flagged"
                .to_string(),
        ),
        500 => Some("request failed (500): GitHub internal server error".to_string()),
        503 => Some("request failed (503): service unavailable".to_string()),
        other => Some(format!("GitHub API request failed: {other}")),
    }
}

/// Fetch every page of activity for a repository.
pub async fn fetch_all_records<F: IssueFetcher + ?Sized>(
    fetcher: &F,
    repo: &RepoId,
) -> CliResult<Vec<ActivityRecord>> {
    let mut records = Vec::new();
    let mut page = 1;
    loop {
        let batch = fetcher.fetch_page(repo, page).await?;
        if batch.items.is_empty() {
            break;
        }
        records.extend(batch.items.into_iter().filter_map(record_from_item));
        if !batch.has_next {
            break;
        }
        page += 1;
    }
    Ok(records)
}

/// Convert a listing item into an activity record.
///
/// Items without a creation timestamp are dropped; a deleted author is
/// attributed to `unknown`.
fn record_from_item(item: IssueItem) -> Option<ActivityRecord> {
    let created_at = item.created_at?;
    let author = item
        .user
        .map(|user| user.login)
        .unwrap_or_else(|| "unknown".to_string());
    let labels = item
        .labels
        .into_iter()
        .filter_map(|label| label.name)
        .filter(|name| !name.is_empty())
        .collect();
    let kind = match item.pull_request {
        Some(pr) => ActivityKind::PullRequest {
            merged: pr.merged_at.is_some(),
        },
        None => ActivityKind::Issue {
            state_reason: item.state_reason,
        },
    };
    Some(ActivityRecord {
        author,
        labels,
        kind,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::{
        IssueAuthor, IssueFetcher, IssueItem, IssueLabel, IssuePage, PullRequestRef, RepoId,
        api_error_message, fetch_all_records, record_from_item,
    };
    use crate::CliResult;
    use reposcore_core::ActivityKind;
    use std::collections::VecDeque;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    struct SequenceFetcher {
        pages: Mutex<VecDeque<CliResult<IssuePage>>>,
    }

    impl SequenceFetcher {
        fn new(pages: Vec<CliResult<IssuePage>>) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
            }
        }
    }

    impl IssueFetcher for SequenceFetcher {
        fn fetch_page<'a>(
            &'a self,
            _repo: &'a RepoId,
            _page: u32,
        ) -> Pin<Box<dyn Future<Output = CliResult<IssuePage>> + Send + 'a>> {
            Box::pin(async move {
                let mut guard = self.pages.lock().expect("pages lock");
                guard.pop_front().expect("no more pages")
            })
        }
    }

    fn pr_item(login: &str, label: &str, merged: bool) -> IssueItem {
        IssueItem {
            user: Some(IssueAuthor {
                login: login.to_string(),
            }),
            labels: vec![IssueLabel {
                name: Some(label.to_string()),
            }],
            pull_request: Some(PullRequestRef {
                merged_at: merged.then(|| "2025-03-05T00:00:00Z".to_string()),
            }),
            state_reason: None,
            created_at: Some("2025-03-04T00:00:00Z".to_string()),
        }
    }

    #[test]
    fn repo_id_parses_owner_and_name() {
        let repo = RepoId::parse("oss2025/reposcore").expect("repo");
        assert_eq!(repo.owner, "oss2025");
        assert_eq!(repo.name, "reposcore");
        assert_eq!(repo.to_string(), "oss2025/reposcore");
    }

    #[test]
    fn repo_id_rejects_malformed_input() {
        assert!(RepoId::parse("no-slash").is_err());
        assert!(RepoId::parse("/missing-owner").is_err());
        assert!(RepoId::parse("missing-name/").is_err());
        assert!(RepoId::parse("too/many/parts").is_err());
    }

    #[test]
    fn api_error_message_maps_known_statuses() {
        assert!(api_error_message(200).is_none());
        assert!(api_error_message(401).expect("401").contains("token"));
        assert!(api_error_message(403).expect("403").contains("rate limit"));
        assert!(api_error_message(404).expect("404").contains("repository"));
        assert!(api_error_message(422).expect("422").contains("unprocessable"));
        assert!(api_error_message(500).expect("500").contains("server error"));
        assert!(api_error_message(503).expect("503").contains("unavailable"));
        assert!(api_error_message(418).expect("418").contains("418"));
    }

    #[test]
    fn record_from_item_requires_created_at() {
        let mut item = pr_item("alice", "bug", true);
        item.created_at = None;
        assert!(record_from_item(item).is_none());
    }

    #[test]
    fn record_from_item_marks_merge_state() {
        let merged = record_from_item(pr_item("alice", "bug", true)).expect("record");
        assert_eq!(merged.kind, ActivityKind::PullRequest { merged: true });

        let unmerged = record_from_item(pr_item("alice", "bug", false)).expect("record");
        assert_eq!(unmerged.kind, ActivityKind::PullRequest { merged: false });
    }

    #[test]
    fn record_from_item_attributes_deleted_authors_to_unknown() {
        let mut item = pr_item("alice", "bug", true);
        item.user = None;
        let record = record_from_item(item).expect("record");
        assert_eq!(record.author, "unknown");
    }

    #[test]
    fn record_from_item_converts_issues() {
        let item = IssueItem {
            user: Some(IssueAuthor {
                login: "bob".to_string(),
            }),
            labels: vec![
                IssueLabel {
                    name: Some("documentation".to_string()),
                },
                IssueLabel { name: None },
            ],
            pull_request: None,
            state_reason: Some("completed".to_string()),
            created_at: Some("2025-03-04T00:00:00Z".to_string()),
        };
        let record = record_from_item(item).expect("record");
        assert_eq!(record.labels, vec!["documentation".to_string()]);
        assert_eq!(
            record.kind,
            ActivityKind::Issue {
                state_reason: Some("completed".to_string())
            }
        );
    }

    #[tokio::test]
    async fn fetch_all_records_walks_pages() {
        let fetcher = SequenceFetcher::new(vec![
            Ok(IssuePage {
                items: vec![pr_item("alice", "bug", true)],
                has_next: true,
            }),
            Ok(IssuePage {
                items: vec![pr_item("bob", "typo", true)],
                has_next: false,
            }),
        ]);
        let repo = RepoId::parse("oss2025/reposcore").expect("repo");

        let records = fetch_all_records(&fetcher, &repo).await.expect("records");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].author, "alice");
        assert_eq!(records[1].author, "bob");
    }

    #[tokio::test]
    async fn fetch_all_records_stops_on_empty_page() {
        let fetcher = SequenceFetcher::new(vec![Ok(IssuePage {
            items: Vec::new(),
            has_next: true,
        })]);
        let repo = RepoId::parse("oss2025/reposcore").expect("repo");

        let records = fetch_all_records(&fetcher, &repo).await.expect("records");

        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn fetch_all_records_propagates_errors() {
        let fetcher = SequenceFetcher::new(vec![Err("request failed (404)".into())]);
        let repo = RepoId::parse("oss2025/missing").expect("repo");

        let err = fetch_all_records(&fetcher, &repo).await.unwrap_err();

        assert!(err.to_string().contains("404"));
    }
}
