use chrono::{DateTime, Utc};

/// 24-hour `HH:MM` label used on the time axis.
pub fn tick_label(instant: DateTime<Utc>) -> String {
    instant.format("%H:%M").to_string()
}

/// Human-readable age of `timestamp` relative to `now`, e.g. `1h 5m ago`.
pub fn relative_time(now: DateTime<Utc>, timestamp: DateTime<Utc>) -> String {
    let minutes = (now - timestamp).num_minutes().max(0);
    let hours = minutes / 60;

    if hours > 0 {
        return format!("{}h {}m ago", hours, minutes % 60);
    }
    format!("{}m ago", minutes)
}
