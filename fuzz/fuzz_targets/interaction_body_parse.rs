#![no_main]

use gistlog_gateway::{parse_interaction_body, InteractionError};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    match parse_interaction_body(data) {
        Ok(payload) => {
            let key = payload.session_key();
            assert_eq!(key.channel_id, payload.channel.id);
            assert_eq!(key.prompt_ts, payload.message_ts);
        }
        Err(error) => {
            assert!(matches!(error, InteractionError::Decode(_)));
            assert_eq!(error.status().as_u16(), 500);
        }
    }
});
