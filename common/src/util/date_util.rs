use chrono::Utc;

/// Current time as Unix milliseconds.
pub fn now() -> i64 {
    Utc::now().timestamp_millis()
}
