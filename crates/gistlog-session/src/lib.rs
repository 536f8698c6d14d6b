//! Per-prompt session intents for the gistlog conversation flow.
//!
//! Every period-picker prompt posted by the bot owns one [`SessionIntent`],
//! keyed by the channel and timestamp of the posted message. The interaction
//! gateway advances the intent through an explicit state machine and the
//! session is dropped from the store once it reaches a terminal state.
//! Sessions nobody answers expire after the store's time-to-live.

use gistlog_core::current_unix_timestamp_ms;
use gistlog_github::HistoryPeriod;
use thiserror::Error;

mod session_store;

pub use session_store::SessionStore;

/// Identifies the prompt message a session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub channel_id: String,
    pub prompt_ts: String,
}

impl SessionKey {
    pub fn new(channel_id: impl Into<String>, prompt_ts: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            prompt_ts: prompt_ts.into(),
        }
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.channel_id, self.prompt_ts)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingPeriod,
    AwaitingConfirmation,
    Executing,
    Cancelled,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AwaitingPeriod => "awaiting_period",
            Self::AwaitingConfirmation => "awaiting_confirmation",
            Self::Executing => "executing",
            Self::Cancelled => "cancelled",
        }
    }

    /// State reached by applying `action`, or `None` when the action is not
    /// valid here.
    pub fn next(&self, action: SessionAction) -> Option<SessionState> {
        match (self, action) {
            (Self::AwaitingPeriod, SessionAction::Select) => Some(Self::AwaitingConfirmation),
            (Self::AwaitingConfirmation, SessionAction::Start) => Some(Self::Executing),
            (Self::AwaitingPeriod | Self::AwaitingConfirmation, SessionAction::Cancel) => {
                Some(Self::Cancelled)
            }
            _ => None,
        }
    }
}

/// Actions a user can invoke on a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    Select,
    Start,
    Cancel,
}

impl SessionAction {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "select" => Some(Self::Select),
            "start" => Some(Self::Start),
            "cancel" => Some(Self::Cancel),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Start => "start",
            Self::Cancel => "cancel",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIntent {
    pub key: SessionKey,
    pub target_account: String,
    pub requested_by: String,
    pub period: Option<HistoryPeriod>,
    pub state: SessionState,
    pub created_unix_ms: u64,
}

impl SessionIntent {
    pub fn new(key: SessionKey, target_account: &str, requested_by: &str) -> Self {
        Self {
            key,
            target_account: target_account.trim().to_string(),
            requested_by: requested_by.to_string(),
            period: None,
            state: SessionState::AwaitingPeriod,
            created_unix_ms: current_unix_timestamp_ms(),
        }
    }
}

/// Account and period a confirmed session fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedFetch {
    pub key: SessionKey,
    pub target_account: String,
    pub requested_by: String,
    pub period: HistoryPeriod,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no session for prompt {0}")]
    NotFound(SessionKey),
    #[error("action `{action}` is not valid while session is {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
    #[error("session {key} is missing {missing}")]
    Incomplete {
        key: SessionKey,
        missing: &'static str,
    },
}
