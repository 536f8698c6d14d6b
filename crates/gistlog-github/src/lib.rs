//! GitHub Gist activity retrieval for the gistlog bot.
//!
//! Computes the cutoff for a requested history period, lists the account's
//! gists updated since that cutoff, and renders them into a Slack-ready report.

pub mod gist_client;
pub mod history_period;
pub mod history_report;

pub use gist_client::{is_valid_github_login, GistApiClient, DEFAULT_GITHUB_API_BASE};
pub use history_period::HistoryPeriod;
pub use history_report::{
    fetch_history_report, render_history_report, sort_by_recency, ActivityItem, ActivitySource,
    FetchError, HISTORY_REPORT_HEADER,
};
