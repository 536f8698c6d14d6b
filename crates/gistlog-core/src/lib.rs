//! Small utilities shared across gistlog crates.
//!
//! Provides the clock helpers used for session expiry and the truncation
//! applied to upstream response bodies before they land in error messages.

pub mod text_utils;
pub mod time_utils;

pub use text_utils::truncate_for_error;
pub use time_utils::{current_unix_timestamp_ms, is_older_than_ms};
