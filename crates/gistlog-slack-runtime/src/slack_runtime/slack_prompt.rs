//! Interactive prompt model (legacy message attachments) and its renderings.
//!
//! The prompt posted for a `log` command is rewritten in place at every step:
//! picker, then confirmation, then a terminal notice. Fields Slack adds to
//! the original message that this model does not name are carried through
//! `extra` so a rewrite does not drop them.

use gistlog_github::HistoryPeriod;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const ACTION_SELECT: &str = "select";
pub const ACTION_START: &str = "start";
pub const ACTION_CANCEL: &str = "cancel";
pub const RETRIEVING_TITLE: &str = ":ok: retrieving Gist activities...";

const PICKER_TEXT: &str = ":octocat: Which period of Gist activities do you want to see? :date:";
const PICKER_COLOR: &str = "#f9a41b";
const PICKER_CALLBACK_ID: &str = "log";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlackPromptMessage {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub attachments: Vec<SlackAttachment>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlackAttachment {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub color: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub callback_id: String,
    #[serde(default)]
    pub actions: Vec<SlackAttachmentAction>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<SlackAttachmentField>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlackAttachmentAction {
    pub name: String,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "type", default)]
    pub action_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub style: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SlackActionOption>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlackActionOption {
    #[serde(default)]
    pub text: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlackAttachmentField {
    pub title: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub short: bool,
}

fn button(name: &str, text: &str, value: &str, style: &str) -> SlackAttachmentAction {
    SlackAttachmentAction {
        name: name.to_string(),
        text: text.to_string(),
        action_type: "button".to_string(),
        value: value.to_string(),
        style: style.to_string(),
        ..SlackAttachmentAction::default()
    }
}

/// First prompt of the flow: a period drop-down plus a cancel button.
pub fn render_period_picker() -> SlackPromptMessage {
    let options = HistoryPeriod::PICKER_OPTIONS
        .iter()
        .map(|period| SlackActionOption {
            text: period.title(),
            value: period.keyword().to_string(),
        })
        .collect();
    SlackPromptMessage {
        attachments: vec![SlackAttachment {
            text: PICKER_TEXT.to_string(),
            color: PICKER_COLOR.to_string(),
            callback_id: PICKER_CALLBACK_ID.to_string(),
            actions: vec![
                SlackAttachmentAction {
                    name: ACTION_SELECT.to_string(),
                    action_type: "select".to_string(),
                    options,
                    ..SlackAttachmentAction::default()
                },
                button(ACTION_CANCEL, "Cancel", "", "danger"),
            ],
            ..SlackAttachment::default()
        }],
        ..SlackPromptMessage::default()
    }
}

fn first_attachment(message: &mut SlackPromptMessage) -> &mut SlackAttachment {
    if message.attachments.is_empty() {
        message.attachments.push(SlackAttachment::default());
    }
    &mut message.attachments[0]
}

/// Replaces the picker with a Yes/No pair for the chosen period.
pub fn render_confirmation_prompt(
    mut original: SlackPromptMessage,
    period: &HistoryPeriod,
) -> SlackPromptMessage {
    let attachment = first_attachment(&mut original);
    attachment.text = format!(":ledger: List {} activities?", period.title());
    attachment.actions = vec![
        button(ACTION_START, "Yes", period.keyword(), "primary"),
        button(ACTION_CANCEL, "No", "", "danger"),
    ];
    original
}

/// Removes every action and shows `title` as the final state of the prompt.
pub fn render_terminal_prompt(mut original: SlackPromptMessage, title: &str) -> SlackPromptMessage {
    let attachment = first_attachment(&mut original);
    attachment.actions = Vec::new();
    attachment.fields = vec![SlackAttachmentField {
        title: title.to_string(),
        value: String::new(),
        short: false,
    }];
    original
}

pub fn cancellation_title(user_name: &str) -> String {
    format!(":x: @{user_name} canceled the request")
}
