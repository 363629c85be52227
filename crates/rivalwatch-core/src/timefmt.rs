//! Relative-time rendering for feed rows ("2 hours ago").

use chrono::{DateTime, Utc};

/// Unit table ordered widest first. The first unit that fits at least
/// once wins.
const UNITS: [(&str, i64); 7] = [
    ("year", 31_536_000),
    ("month", 2_592_000),
    ("week", 604_800),
    ("day", 86_400),
    ("hour", 3_600),
    ("minute", 60),
    ("second", 1),
];

/// Renders how long ago `timestamp` was, relative to `now`.
///
/// Uses whole units only ("1 minute ago", "3 days ago"). Anything
/// under one second, including timestamps in the future, renders as
/// "just now".
#[must_use]
pub fn time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = (now - timestamp).num_seconds();
    for (unit, seconds) in UNITS {
        let count = elapsed / seconds;
        if count >= 1 {
            return if count == 1 {
                format!("1 {unit} ago")
            } else {
                format!("{count} {unit}s ago")
            };
        }
    }
    "just now".to_string()
}
