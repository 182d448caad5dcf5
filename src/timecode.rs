use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;

// @module: Timecode formatting and parsing for segment tables and ffmpeg

// @const: HH:MM:SS or MM:SS, optional fractional seconds
static HMS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d+):)?(\d{1,2}):(\d{1,2})(?:[.,](\d{1,3}))?$").unwrap()
});

/// Format a duration as `HH:MM:SS`, rounding to the nearest second
pub fn format_hms(duration: Duration) -> String {
    let total = round_to_seconds(duration);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Parse `HH:MM:SS`, `MM:SS` or either with a `.mmm` fraction
pub fn parse_hms(value: &str) -> Option<Duration> {
    let caps = HMS_REGEX.captures(value.trim())?;

    let hours: u64 = caps.get(1).map_or(Ok(0), |m| m.as_str().parse()).ok()?;
    let minutes: u64 = caps.get(2)?.as_str().parse().ok()?;
    let seconds: u64 = caps.get(3)?.as_str().parse().ok()?;
    if minutes >= 60 || seconds >= 60 {
        return None;
    }

    // "5" means 500ms, "05" means 50ms
    let millis: u64 = match caps.get(4) {
        Some(m) => {
            let digits = m.as_str();
            let value: u64 = digits.parse().ok()?;
            value * 10u64.pow(3 - digits.len() as u32)
        }
        None => 0,
    };

    let total_seconds = hours.checked_mul(3600)?.checked_add(minutes * 60 + seconds)?;
    let total_millis = total_seconds.checked_mul(1000)?.checked_add(millis)?;
    Some(Duration::from_millis(total_millis))
}

/// Convert provider seconds to a duration with millisecond precision
pub fn from_seconds_f64(seconds: f64) -> Duration {
    if !seconds.is_finite() || seconds <= 0.0 {
        return Duration::ZERO;
    }
    Duration::from_millis((seconds * 1000.0).round() as u64)
}

/// Seconds argument for ffmpeg (`-ss`, `-t`)
pub fn ffmpeg_seconds(duration: Duration) -> String {
    format!("{}.{:03}", duration.as_secs(), duration.subsec_millis())
}

fn round_to_seconds(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if duration.subsec_millis() >= 500 { secs + 1 } else { secs }
}
