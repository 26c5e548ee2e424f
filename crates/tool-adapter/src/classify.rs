/// Classify a raw executor error message into retryable/rate-limited
/// buckets, per §4.2 step 4 and step 7.
pub fn is_retryable_message(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    ["retry", "rate", "throttle", "temporary", "unavailable"]
        .iter()
        .any(|kw| lower.contains(kw))
}

pub fn is_rate_limited_message(message: &str) -> bool {
    message.to_ascii_lowercase().contains("rate")
}
