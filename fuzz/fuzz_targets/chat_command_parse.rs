#![no_main]

use gistlog_slack_runtime::{parse_chat_command, ChatCommand};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    if let Ok(ChatCommand::Log { account }) = parse_chat_command(&text) {
        assert!(!account.is_empty());
        assert!(!account.chars().any(char::is_whitespace));
        assert!(text.split_whitespace().next() == Some("log"));
    }
});
