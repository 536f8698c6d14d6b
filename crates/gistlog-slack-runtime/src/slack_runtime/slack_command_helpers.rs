//! Parsing of bot-addressed chat commands.

use gistlog_github::is_valid_github_login;
use thiserror::Error;

const LOG_COMMAND: &str = "log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Log { account: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("invalid command: {0}")]
    InvalidCommand(String),
}

/// Parses the text left after the bot mention is stripped.
///
/// The first whitespace-separated token is the verb and the rest are
/// arguments. `log` needs at least the target account, which must be a
/// GitHub login; extra arguments are ignored.
pub fn parse_chat_command(text: &str) -> Result<ChatCommand, CommandError> {
    let mut pieces = text.split_whitespace();
    let Some(verb) = pieces.next() else {
        return Err(CommandError::InvalidCommand("empty message".to_string()));
    };
    match verb {
        LOG_COMMAND => match pieces.next() {
            Some(account) if is_valid_github_login(account) => Ok(ChatCommand::Log {
                account: account.to_string(),
            }),
            Some(account) => Err(CommandError::InvalidCommand(format!(
                "`{account}` is not a valid github login"
            ))),
            None => Err(CommandError::InvalidCommand(
                "usage: log <account>".to_string(),
            )),
        },
        other => Err(CommandError::InvalidCommand(format!(
            "unsupported verb `{other}`"
        ))),
    }
}

/// Returns the command text when `text` starts with a mention of the bot.
pub(super) fn strip_bot_mention<'a>(text: &'a str, bot_user_id: &str) -> Option<&'a str> {
    let mention = format!("<@{bot_user_id}> ");
    text.strip_prefix(mention.as_str()).map(str::trim)
}
