//! Time formatting helpers.

use nexus_types::Timestamp;

/// Format a duration in seconds to a human-readable string.
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// "2 mins ago"-style label for a past timestamp.
pub fn format_relative(then: Timestamp, now: Timestamp) -> String {
    let secs = then.elapsed_since(now);
    match secs {
        0..=9 => "just now".to_string(),
        10..=59 => format!("{secs} secs ago"),
        60..=119 => "1 min ago".to_string(),
        120..=3599 => format!("{} mins ago", secs / 60),
        3600..=7199 => "1 hour ago".to_string(),
        7200..=86399 => format!("{} hours ago", secs / 3600),
        _ => format!("{} ago", format_duration(secs)),
    }
}
