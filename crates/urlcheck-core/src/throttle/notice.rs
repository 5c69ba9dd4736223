//! Text shown while input is throttled.

use chrono::TimeZone;

use crate::clock::Timestamp;
use crate::result::CheckResult;

/// Message-area text when the quota is exhausted.
pub const THROTTLED_MESSAGE: &str = "You've reached the maximum number of searches allowed.";

/// `Wait period ends at <time> on <date>.` in the local time zone.
///
/// The time is `HH:MM:SS GMT+hhmm` with the numeric offset only; no zone name
/// such as `(Central European Standard Time)` follows it, since chrono has no
/// portable source for one. The date is `Www Mmm DD YYYY`.
pub fn wait_message(expiration: Timestamp) -> String {
    wait_message_in(expiration, &chrono::Local)
}

/// [`wait_message`] rendered in an explicit zone.
pub fn wait_message_in<Tz>(expiration: Timestamp, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match expiration.to_zoned(tz) {
        Some(at) => format!(
            "Wait period ends at {} on {}.",
            at.format("%H:%M:%S GMT%z"),
            at.format("%a %b %d %Y")
        ),
        None => format!("Wait period ends at {expiration} ms after the epoch."),
    }
}

/// Result-area payload for a rejected submission.
pub fn throttled_result(url: &str, expiration: Timestamp) -> CheckResult {
    CheckResult {
        url: url.to_string(),
        exists: false,
        file: false,
        folder: false,
        error: wait_message(expiration),
    }
}
