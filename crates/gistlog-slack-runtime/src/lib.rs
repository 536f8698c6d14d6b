//! Slack side of the gistlog bot.
//!
//! Listens to the Slack RTM event stream, turns `log <account>`
//! mentions into period-picker prompts, and owns the interactive prompt model
//! that the interaction gateway rewrites in place.

pub mod slack_runtime;

pub use slack_runtime::slack_command_helpers::{parse_chat_command, ChatCommand, CommandError};
pub use slack_runtime::slack_prompt::{
    cancellation_title, render_confirmation_prompt, render_period_picker, render_terminal_prompt,
    SlackActionOption, SlackAttachment, SlackAttachmentAction, SlackAttachmentField,
    SlackPromptMessage, ACTION_CANCEL, ACTION_SELECT, ACTION_START, RETRIEVING_TITLE,
};
pub use slack_runtime::{run_chat_listener, ChatListenerConfig, DEFAULT_SLACK_API_BASE};
