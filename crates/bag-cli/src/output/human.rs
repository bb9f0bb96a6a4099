//! Human-readable output formatting

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a nanosecond duration as seconds, e.g. `12.500000000s`
pub fn format_duration(nanoseconds: i64) -> String {
    let sign = if nanoseconds < 0 { "-" } else { "" };
    let abs = nanoseconds.unsigned_abs();
    format!("{}{}.{:09}s", sign, abs / 1_000_000_000, abs % 1_000_000_000)
}

/// Format nanoseconds since the epoch as an RFC 3339 UTC timestamp
pub fn format_timestamp(nanoseconds_since_epoch: i64) -> String {
    let dt = DateTime::<Utc>::from_timestamp_nanos(nanoseconds_since_epoch);
    format!(
        "{} ({})",
        dt.to_rfc3339_opts(SecondsFormat::Nanos, true),
        nanoseconds_since_epoch
    )
}
