mod bootstrap_helpers;
mod cli_args;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use gistlog_gateway::{run_interaction_server, InteractionServerConfig};
use gistlog_github::GistApiClient;
use gistlog_session::SessionStore;
use gistlog_slack_runtime::{run_chat_listener, ChatListenerConfig};

use crate::bootstrap_helpers::init_tracing;
use crate::cli_args::Cli;

async fn run_cli(cli: Cli) -> Result<()> {
    let sessions = SessionStore::with_ttl(cli.session_ttl());
    let gist_client = GistApiClient::new(
        &cli.github_api_base,
        Some(cli.gist_access_token.as_str()),
        cli.request_timeout_ms,
    )
    .context("failed to create github api client")?;

    let listener_config = ChatListenerConfig {
        api_base: cli.slack_api_base.clone(),
        bot_token: cli.bot_token.clone(),
        bot_user_id: cli.bot_id.clone(),
        channel_id: cli.channel_id.clone(),
        request_timeout_ms: cli.request_timeout_ms,
    };
    let listener_sessions = sessions.clone();
    tokio::spawn(async move {
        if let Err(error) = run_chat_listener(listener_config, listener_sessions).await {
            tracing::error!(error = %format!("{error:#}"), "slack listener stopped");
        }
    });

    run_interaction_server(InteractionServerConfig {
        bind: cli.interaction_bind(),
        verification_token: cli.verification_token.clone(),
        sessions,
        activity_source: Arc::new(gist_client),
    })
    .await
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    run_cli(cli).await
}

#[cfg(test)]
mod tests;
