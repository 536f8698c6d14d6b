//! Interactive callback payload and gateway rejection types.

use serde::Deserialize;
use thiserror::Error;

use super::*;

/// Slack `interactive_message` callback as posted in the `payload` form field.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InteractionPayload {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub actions: Vec<InteractionAction>,
    #[serde(default)]
    pub user: InteractionUser,
    #[serde(default)]
    pub channel: InteractionChannel,
    #[serde(default)]
    pub message_ts: String,
    #[serde(default)]
    pub response_url: String,
    #[serde(default)]
    pub original_message: SlackPromptMessage,
}

impl InteractionPayload {
    pub fn session_key(&self) -> SessionKey {
        SessionKey::new(self.channel.id.clone(), self.message_ts.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InteractionAction {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub selected_options: Vec<InteractionSelectedOption>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InteractionSelectedOption {
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InteractionUser {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InteractionChannel {
    #[serde(default)]
    pub id: String,
}

/// Reasons an interactive callback is rejected. Every variant maps to an
/// empty-bodied HTTP status.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InteractionError {
    #[error("failed to read interaction body: {0}")]
    TransportRead(String),
    #[error("failed to decode interaction payload: {0}")]
    Decode(String),
    #[error("verification token mismatch")]
    Unauthorized,
    #[error("unknown action `{0}`")]
    InvalidAction(String),
    #[error("action `{action}` is not valid while session is {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
    #[error("no session for prompt {0}")]
    SessionNotFound(SessionKey),
    #[error("session {key} is missing {missing}")]
    IncompleteSession {
        key: SessionKey,
        missing: &'static str,
    },
}

impl InteractionError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SessionError> for InteractionError {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::NotFound(key) => Self::SessionNotFound(key),
            SessionError::InvalidTransition { action, state } => {
                Self::InvalidTransition { action, state }
            }
            SessionError::Incomplete { key, missing } => Self::IncompleteSession { key, missing },
        }
    }
}

impl IntoResponse for InteractionError {
    fn into_response(self) -> Response {
        self.status().into_response()
    }
}

/// Decodes an `application/x-www-form-urlencoded` body carrying the callback
/// JSON in its `payload` field.
pub fn parse_interaction_body(body: &[u8]) -> Result<InteractionPayload, InteractionError> {
    let payload = url::form_urlencoded::parse(body)
        .find(|(name, _)| name == "payload")
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| InteractionError::Decode("missing payload field".to_string()))?;
    serde_json::from_str::<InteractionPayload>(&payload)
        .map_err(|error| InteractionError::Decode(error.to_string()))
}
