use std::time::Duration;

use clap::Parser;
use gistlog_github::DEFAULT_GITHUB_API_BASE;
use gistlog_slack_runtime::DEFAULT_SLACK_API_BASE;

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

fn parse_non_empty(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("value must not be empty".to_string());
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Parser)]
#[command(
    name = "gistlog",
    about = "Slack bot that reports GitHub Gist activity for an account",
    version
)]
pub(crate) struct Cli {
    #[arg(
        long = "port",
        env = "PORT",
        default_value_t = 3000,
        help = "Port the interaction endpoint listens on"
    )]
    pub(crate) port: u16,

    #[arg(
        long = "bind-host",
        env = "BIND_HOST",
        default_value = "0.0.0.0",
        help = "Host address the interaction endpoint binds to"
    )]
    pub(crate) bind_host: String,

    #[arg(
        long = "bot-token",
        env = "BOT_TOKEN",
        hide_env_values = true,
        value_parser = parse_non_empty,
        help = "Slack bot token for the Web API and RTM stream (xoxb-...)"
    )]
    pub(crate) bot_token: String,

    #[arg(
        long = "verification-token",
        env = "VERIFICATION_TOKEN",
        hide_env_values = true,
        value_parser = parse_non_empty,
        help = "Token every interactive callback must carry"
    )]
    pub(crate) verification_token: String,

    #[arg(
        long = "bot-id",
        env = "BOT_ID",
        value_parser = parse_non_empty,
        help = "Slack user id of the bot, used to detect mentions"
    )]
    pub(crate) bot_id: String,

    #[arg(
        long = "channel-id",
        env = "CHANNEL_ID",
        value_parser = parse_non_empty,
        help = "Slack channel the bot listens to"
    )]
    pub(crate) channel_id: String,

    #[arg(
        long = "gist-access-token",
        env = "GIST_ACCESS_TOKEN",
        hide_env_values = true,
        help = "GitHub token used when listing gists"
    )]
    pub(crate) gist_access_token: String,

    #[arg(
        long = "slack-api-base",
        env = "SLACK_API_BASE",
        default_value = DEFAULT_SLACK_API_BASE,
        help = "Slack Web API base URL"
    )]
    pub(crate) slack_api_base: String,

    #[arg(
        long = "github-api-base",
        env = "GITHUB_API_BASE",
        default_value = DEFAULT_GITHUB_API_BASE,
        help = "GitHub REST API base URL"
    )]
    pub(crate) github_api_base: String,

    #[arg(
        long = "request-timeout-ms",
        env = "REQUEST_TIMEOUT_MS",
        default_value_t = 10_000,
        value_parser = parse_positive_u64,
        help = "Timeout for Slack and GitHub API requests in milliseconds"
    )]
    pub(crate) request_timeout_ms: u64,

    #[arg(
        long = "session-ttl-secs",
        env = "SESSION_TTL_SECS",
        default_value_t = 3600,
        value_parser = parse_positive_u64,
        help = "Seconds an unanswered period picker stays actionable"
    )]
    pub(crate) session_ttl_secs: u64,
}

impl Cli {
    pub(crate) fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    /// `host:port` for the interaction server, bracketing IPv6 hosts.
    pub(crate) fn interaction_bind(&self) -> String {
        if self.bind_host.contains(':') && !self.bind_host.starts_with('[') {
            format!("[{}]:{}", self.bind_host, self.port)
        } else {
            format!("{}:{}", self.bind_host, self.port)
        }
    }
}
