//! Activity items, the source seam used to list them, and report rendering.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::HistoryPeriod;

pub const HISTORY_REPORT_HEADER: &str = ":octocat: *Gist Activities* :octocat:";

/// One gist revision surfaced in the history report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityItem {
    pub updated_at: DateTime<Utc>,
    pub description: String,
    pub link: String,
}

#[derive(Debug, Error)]
/// Failure to list activity for an account. No partial results are kept.
pub enum FetchError {
    #[error("fetch failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("fetch failed: github returned status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("fetch failed: {0}")]
    InvalidResponse(String),
}

#[async_trait]
/// Lists activity items for an account updated at or after `since`.
pub trait ActivitySource: Send + Sync {
    async fn list_activity_since(
        &self,
        account: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<ActivityItem>, FetchError>;
}

/// Orders items newest first. Items with equal timestamps keep source order.
pub fn sort_by_recency(mut items: Vec<ActivityItem>) -> Vec<ActivityItem> {
    items.sort_by(|left, right| right.updated_at.cmp(&left.updated_at));
    items
}

pub fn render_history_report(items: &[ActivityItem]) -> String {
    let mut report = String::with_capacity(HISTORY_REPORT_HEADER.len() + items.len() * 96);
    report.push_str(HISTORY_REPORT_HEADER);
    report.push('\n');
    for item in items {
        report.push_str(&format!(
            "[{}]: <{}|{}>\n",
            item.updated_at.format("%Y-%m-%d"),
            item.link,
            item.description
        ));
    }
    report
}

/// Fetches the account's activity for `period` relative to `now` and renders
/// it newest first.
pub async fn fetch_history_report(
    source: &dyn ActivitySource,
    account: &str,
    period: &HistoryPeriod,
    now: DateTime<Utc>,
) -> Result<String, FetchError> {
    let since = period.cutoff(now);
    tracing::debug!(
        account,
        period = period.keyword(),
        since = ?since,
        "listing gist activity"
    );
    let items = source.list_activity_since(account, since).await?;
    let items = sort_by_recency(items);
    tracing::info!(
        account,
        period = period.keyword(),
        items = items.len(),
        "gist activity fetched"
    );
    Ok(render_history_report(&items))
}
