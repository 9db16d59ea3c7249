//! Disk cache for fetched repository activity.

use crate::CliResult;
use crate::github::RepoId;
use reposcore_core::ActivityRecord;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Cached activity is stale after this many seconds.
pub const CACHE_STALE_SECS: u64 = 3600;

/// On-disk cache payload for one repository.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CachedActivity {
    update_time: u64,
    records: Vec<ActivityRecord>,
}

/// Cache file path for a repository under the cache directory.
pub fn cache_path(dir: &Path, repo: &RepoId) -> PathBuf {
    dir.join(format!("{}__{}.json", repo.owner, repo.name))
}

/// Current unix time in seconds.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

/// Load cached records if present and fresh.
///
/// A missing, unreadable, corrupt, or stale cache file is a miss.
pub async fn load_fresh(path: &Path, now: u64) -> Option<Vec<ActivityRecord>> {
    let contents = tokio::fs::read_to_string(path).await.ok()?;
    let cached: CachedActivity = serde_json::from_str(&contents).ok()?;
    if now.saturating_sub(cached.update_time) > CACHE_STALE_SECS {
        return None;
    }
    Some(cached.records)
}

/// Persist fetched records to the cache file.
pub async fn store(path: &Path, now: u64, records: &[ActivityRecord]) -> CliResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let payload = serde_json::to_vec_pretty(&CachedActivity {
        update_time: now,
        records: records.to_vec(),
    })?;
    tokio::fs::write(path, payload).await?;
    Ok(())
}
