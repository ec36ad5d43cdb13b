use crate::selection::band::DifficultyBand;

pub fn user_key(user_id: &str) -> String {
    user_id.to_string()
}

pub fn user_email_index_key(email: &str) -> String {
    format!("email:{}", email.to_lowercase())
}

pub fn session_key(token_hash: &str) -> String {
    token_hash.to_string()
}

pub fn session_user_index_key(user_id: &str, token_hash: &str) -> String {
    format!("user:{}:{}", user_id, token_hash)
}

pub fn admin_key(admin_id: &str) -> String {
    admin_id.to_string()
}

pub fn admin_email_index_key(email: &str) -> String {
    format!("email:{}", email.to_lowercase())
}

pub fn word_key(word_id: &str) -> String {
    word_id.to_string()
}

// Cycle / usage keys. Cycles are zero-padded so that prefix scans stay
// strictly within one cycle and never match a longer cycle number.

pub fn global_cycle_key() -> String {
    "global".to_string()
}

pub fn global_usage_key(cycle: u64, word_id: &str) -> String {
    format!("{:010}:{}", cycle, word_id)
}

pub fn global_usage_prefix(cycle: u64) -> String {
    format!("{:010}:", cycle)
}

pub fn user_cycle_key(user_id: &str, band: DifficultyBand) -> String {
    format!("{}:{}", user_id, band.as_str())
}

pub fn user_usage_key(user_id: &str, band: DifficultyBand, cycle: u64, word_id: &str) -> String {
    format!("{}:{}:{:010}:{}", user_id, band.as_str(), cycle, word_id)
}

pub fn user_usage_prefix(user_id: &str, band: DifficultyBand, cycle: u64) -> String {
    format!("{}:{}:{:010}:", user_id, band.as_str(), cycle)
}

// Assignment keys. Dates are `YYYY-MM-DD` strings.

pub fn daily_word_key(date: &str) -> String {
    date.to_string()
}

pub fn user_word_key(user_id: &str, date: &str) -> String {
    format!("{}:{}", user_id, date)
}

pub fn schedule_key(user_id: &str) -> String {
    user_id.to_string()
}

pub fn delivery_key(user_id: &str, date: &str) -> String {
    format!("{}:{}", user_id, date)
}

pub fn notification_key(user_id: &str, notification_id: &str) -> String {
    format!("{}:{}", user_id, notification_id)
}

pub fn notification_prefix(user_id: &str) -> String {
    format!("{}:", user_id)
}

pub fn analytics_event_key(timestamp_ms: i64, event_id: &str) -> String {
    let ts = timestamp_ms.max(0) as u64;
    let reverse_ts = u64::MAX - ts;
    format!("{:020}:{}", reverse_ts, event_id)
}

pub fn config_latest_key(config_type: &str) -> String {
    format!("{}:latest", config_type)
}

/// Parse timestamp (ms) from an analytics event key formatted as `{reverse_ts:020}:{event_id}`.
pub fn parse_analytics_event_timestamp_ms(key: &[u8]) -> Option<i64> {
    let sep = key.iter().position(|b| *b == b':')?;
    let reverse_ts_str = std::str::from_utf8(&key[..sep]).ok()?;
    let reverse_ts = reverse_ts_str.parse::<u64>().ok()?;
    let ts_u64 = u64::MAX.checked_sub(reverse_ts)?;
    i64::try_from(ts_u64).ok()
}
