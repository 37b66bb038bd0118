//! Duration parsing, formatting, and rounding
//!
//! Tracked durations are stored with second precision and rounded to the
//! nearest quarter hour on every write. Totals are rendered `HH:MM:SS` and
//! may exceed 24 hours; they are spans, not clock times.

use chrono::Duration;

/// The rounding increment applied to tracked durations.
pub const ROUNDING_INCREMENT_SECS: i64 = 15 * 60;

/// Round a duration to the nearest increment, ties rounding up.
///
/// `1h07m` rounds down to `1h00m`, `1h08m` up to `1h15m`, `1h53m` up to
/// `2h00m`. Idempotent: rounding an already-rounded duration is a no-op.
/// Callers reject negative durations before reaching this function.
pub fn round_duration(duration: Duration, increment_secs: i64) -> Duration {
    let secs = duration.num_seconds();
    let rounded = (secs + increment_secs / 2) / increment_secs * increment_secs;
    Duration::seconds(rounded)
}

/// Format a duration as `HH:MM:SS`, hours unbounded.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.num_seconds();
    format!("{:02}:{:02}:{:02}", secs / 3600, secs % 3600 / 60, secs % 60)
}

/// Parse a `HH:MM:SS` (or `HH:MM`) duration string.
///
/// Returns `None` for malformed input, negative components, or totals
/// beyond what a [`Duration`] can carry; the caller turns that into a
/// validation error.
pub fn parse_duration(value: &str) -> Option<Duration> {
    let mut parts = value.split(':');
    let hours: i64 = parts.next()?.trim().parse().ok()?;
    let minutes: i64 = parts.next()?.trim().parse().ok()?;
    let seconds: i64 = match parts.next() {
        Some(s) => s.trim().parse().ok()?,
        None => 0,
    };
    if parts.next().is_some() || hours < 0 || !(0..60).contains(&minutes) || !(0..60).contains(&seconds) {
        return None;
    }
    let total = hours
        .checked_mul(3600)?
        .checked_add(minutes * 60 + seconds)?;
    Duration::try_seconds(total)
}
