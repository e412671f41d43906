use std::time::Duration;

/// Whole milliseconds in `d`, saturating at `u64::MAX`.
pub fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Format milliseconds as zero-padded `MM:SS`.
pub fn format_mmss(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms / 1000) % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

/// Duration text for a list row. An unknown duration renders as an empty
/// string rather than `00:00`.
pub fn format_duration(ms: Option<u64>) -> String {
    match ms {
        Some(ms) => format_mmss(ms),
        None => String::new(),
    }
}
