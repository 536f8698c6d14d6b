//! GitHub REST client for listing a user's gists.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use gistlog_core::truncate_for_error;
use reqwest::Url;
use serde::Deserialize;

use crate::history_report::{ActivityItem, ActivitySource, FetchError};

pub const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";
const GIST_PAGE_SIZE: usize = 100;
const GITHUB_LOGIN_MAX_CHARS: usize = 39;

/// GitHub logins are 1 to 39 ASCII alphanumerics or hyphens and never start
/// or end with a hyphen.
pub fn is_valid_github_login(account: &str) -> bool {
    !account.is_empty()
        && account.len() <= GITHUB_LOGIN_MAX_CHARS
        && !account.starts_with('-')
        && !account.ends_with('-')
        && account
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
}

#[derive(Debug, Clone, Deserialize)]
struct GithubGist {
    updated_at: DateTime<Utc>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    git_push_url: Option<String>,
    #[serde(default)]
    html_url: Option<String>,
}

impl From<GithubGist> for ActivityItem {
    fn from(gist: GithubGist) -> Self {
        Self {
            updated_at: gist.updated_at,
            description: gist.description.unwrap_or_default(),
            link: gist.git_push_url.or(gist.html_url).unwrap_or_default(),
        }
    }
}

#[derive(Clone)]
pub struct GistApiClient {
    http: reqwest::Client,
    api_base: Url,
}

impl GistApiClient {
    /// Builds a client. Requests carry a bearer token only when `access_token`
    /// is non-empty.
    pub fn new(
        api_base: &str,
        access_token: Option<&str>,
        request_timeout_ms: u64,
    ) -> Result<Self, FetchError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("gistlog-bot"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            reqwest::header::HeaderValue::from_static("2022-11-28"),
        );
        if let Some(token) = access_token.map(str::trim).filter(|token| !token.is_empty()) {
            let auth_header = format!("Bearer {token}");
            let mut value = reqwest::header::HeaderValue::from_str(&auth_header).map_err(|_| {
                FetchError::InvalidResponse("invalid github authorization header".to_string())
            })?;
            value.set_sensitive(true);
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(request_timeout_ms.max(1)))
            .build()?;
        let api_base = Url::parse(api_base.trim()).map_err(|error| {
            FetchError::InvalidResponse(format!("invalid github api base '{api_base}': {error}"))
        })?;
        if api_base.cannot_be_a_base() {
            return Err(FetchError::InvalidResponse(format!(
                "invalid github api base '{api_base}'"
            )));
        }
        Ok(Self { http, api_base })
    }

    /// `{api_base}/users/{account}/gists`, with the account as one escaped
    /// path segment.
    fn user_gists_url(&self, account: &str) -> Result<Url, FetchError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::InvalidResponse("github api base has no path".to_string()))?
            .pop_if_empty()
            .extend(["users", account, "gists"]);
        Ok(url)
    }

    async fn list_gists_page(
        &self,
        account: &str,
        since: Option<&str>,
        page: u32,
    ) -> Result<Vec<GithubGist>, FetchError> {
        let page_value = page.to_string();
        let page_size = GIST_PAGE_SIZE.to_string();
        let mut request = self
            .http
            .get(self.user_gists_url(account)?)
            .query(&[
                ("per_page", page_size.as_str()),
                ("page", page_value.as_str()),
            ]);
        if let Some(since) = since {
            request = request.query(&[("since", since)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                body: truncate_for_error(&body, 400),
            });
        }
        Ok(response.json::<Vec<GithubGist>>().await?)
    }
}

#[async_trait]
impl ActivitySource for GistApiClient {
    async fn list_activity_since(
        &self,
        account: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<ActivityItem>, FetchError> {
        let account = account.trim();
        if !is_valid_github_login(account) {
            return Err(FetchError::InvalidResponse(format!(
                "`{}` is not a valid github login",
                truncate_for_error(account, 64)
            )));
        }
        let since = since.map(|value| value.to_rfc3339_opts(SecondsFormat::Secs, true));

        let mut page = 1_u32;
        let mut items = Vec::new();
        loop {
            let chunk = self.list_gists_page(account, since.as_deref(), page).await?;
            let chunk_len = chunk.len();
            items.extend(chunk.into_iter().map(ActivityItem::from));
            if chunk_len < GIST_PAGE_SIZE {
                break;
            }
            page = page.saturating_add(1);
        }
        Ok(items)
    }
}
