//! Slack RTM listener that turns `log <account>` mentions into prompts.

use anyhow::{Context, Result};
use futures_util::StreamExt;
use gistlog_session::{SessionIntent, SessionKey, SessionStore};
use serde::Deserialize;
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};

mod slack_api_client;
pub mod slack_command_helpers;
pub mod slack_prompt;

use slack_api_client::{SlackApiClient, SlackPostedMessage};
use slack_command_helpers::{parse_chat_command, strip_bot_mention, ChatCommand};
use slack_prompt::render_period_picker;

pub const DEFAULT_SLACK_API_BASE: &str = "https://slack.com/api";

#[derive(Debug, Clone)]
/// Runtime configuration for the Slack chat listener.
pub struct ChatListenerConfig {
    pub api_base: String,
    pub bot_token: String,
    pub bot_user_id: String,
    pub channel_id: String,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
struct SlackRtmEvent {
    #[serde(rename = "type", default)]
    event_type: String,
    #[serde(default)]
    subtype: Option<String>,
    #[serde(default)]
    bot_id: Option<String>,
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    ts: Option<String>,
}

/// Plain channel message extracted from the event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ChatMessage {
    channel_id: String,
    user_id: String,
    text: String,
    ts: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum RtmFrame {
    Message(ChatMessage),
    Goodbye,
    Ignored,
}

/// Connects to the Slack RTM stream and serves chat commands until the
/// connection ends. The listener does not reconnect.
pub async fn run_chat_listener(config: ChatListenerConfig, sessions: SessionStore) -> Result<()> {
    let listener = ChatListener::new(config, sessions)?;
    listener.run().await
}

struct ChatListener {
    config: ChatListenerConfig,
    slack_client: SlackApiClient,
    sessions: SessionStore,
}

impl ChatListener {
    fn new(config: ChatListenerConfig, sessions: SessionStore) -> Result<Self> {
        let slack_client =
            SlackApiClient::new(&config.api_base, &config.bot_token, config.request_timeout_ms)?;
        Ok(Self {
            config,
            slack_client,
            sessions,
        })
    }

    async fn run(&self) -> Result<()> {
        let socket_url = self
            .slack_client
            .connect_rtm()
            .await
            .context("failed to open slack rtm connection")?;
        tracing::info!(channel = %self.config.channel_id, "slack listener connecting");
        self.run_socket_session(&socket_url).await
    }

    async fn run_socket_session(&self, socket_url: &str) -> Result<()> {
        let (mut stream, _response) = connect_async(socket_url)
            .await
            .context("failed to connect slack rtm websocket")?;
        tracing::info!("slack listener connected");

        while let Some(message_result) = stream.next().await {
            let message = message_result.context("failed reading slack websocket message")?;
            match parse_rtm_frame(message, &self.config.bot_user_id) {
                Ok(RtmFrame::Message(message)) => self.handle_message_event(&message).await,
                Ok(RtmFrame::Goodbye) => {
                    tracing::warn!("slack sent goodbye; listener stopping");
                    break;
                }
                Ok(RtmFrame::Ignored) => {}
                Err(error) => tracing::error!(
                    error = %format!("{error:#}"),
                    "failed to decode slack event"
                ),
            }
        }
        tracing::info!("slack listener session ended");
        Ok(())
    }

    async fn handle_message_event(&self, message: &ChatMessage) {
        if let Err(error) = self.handle_chat_message(message).await {
            tracing::error!(
                channel = %message.channel_id,
                ts = %message.ts,
                error = %format!("{error:#}"),
                "failed to handle message"
            );
        }
    }

    /// Applies the channel and mention filters, then runs the command.
    /// Messages that do not pass the filters are dropped without error.
    async fn handle_chat_message(&self, message: &ChatMessage) -> Result<()> {
        if message.channel_id != self.config.channel_id {
            tracing::debug!(channel = %message.channel_id, "ignoring message from other channel");
            return Ok(());
        }
        let Some(command_text) = strip_bot_mention(&message.text, &self.config.bot_user_id) else {
            return Ok(());
        };

        match parse_chat_command(command_text)? {
            ChatCommand::Log { account } => {
                let posted = self.post_period_picker(&message.channel_id).await?;
                self.sessions.open(SessionIntent::new(
                    SessionKey::new(posted.channel.clone(), posted.ts.clone()),
                    &account,
                    &message.user_id,
                ));
                tracing::info!(
                    account = %account,
                    user = %message.user_id,
                    prompt = %format!("{}:{}", posted.channel, posted.ts),
                    "period picker posted"
                );
            }
        }
        Ok(())
    }

    async fn post_period_picker(&self, channel_id: &str) -> Result<SlackPostedMessage> {
        self.slack_client
            .post_prompt(channel_id, &render_period_picker())
            .await
            .context("failed to post message")
    }
}

fn parse_rtm_frame(message: WsMessage, bot_user_id: &str) -> Result<RtmFrame> {
    let text = match message {
        WsMessage::Text(text) => text.as_str().to_owned(),
        WsMessage::Binary(bytes) => {
            String::from_utf8(bytes.to_vec()).context("invalid utf-8 slack rtm payload")?
        }
        WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Close(_) | WsMessage::Frame(_) => {
            return Ok(RtmFrame::Ignored)
        }
    };
    let event =
        serde_json::from_str::<SlackRtmEvent>(&text).context("failed to parse slack rtm event")?;
    Ok(normalize_rtm_event(event, bot_user_id))
}

fn normalize_rtm_event(event: SlackRtmEvent, bot_user_id: &str) -> RtmFrame {
    match event.event_type.as_str() {
        "goodbye" => return RtmFrame::Goodbye,
        "message" => {}
        _ => return RtmFrame::Ignored,
    }
    if event.subtype.is_some() || event.bot_id.is_some() {
        return RtmFrame::Ignored;
    }
    let user_id = match event.user {
        Some(user) if !user.trim().is_empty() && user != bot_user_id => user,
        _ => return RtmFrame::Ignored,
    };
    let channel_id = match event.channel {
        Some(channel) if !channel.trim().is_empty() => channel,
        _ => return RtmFrame::Ignored,
    };
    let ts = match event.ts {
        Some(ts) if !ts.trim().is_empty() => ts,
        _ => return RtmFrame::Ignored,
    };

    RtmFrame::Message(ChatMessage {
        channel_id,
        user_id,
        text: event.text.unwrap_or_default(),
        ts,
    })
}
