/// Returns the current Unix timestamp in milliseconds.
pub fn current_unix_timestamp_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
        .try_into()
        .unwrap_or(u64::MAX)
}

/// True when more than `max_age_ms` has passed between `created_unix_ms` and
/// `now_unix_ms`. Timestamps in the future are never old.
pub fn is_older_than_ms(created_unix_ms: u64, now_unix_ms: u64, max_age_ms: u64) -> bool {
    now_unix_ms.saturating_sub(created_unix_ms) > max_age_ms
}
