//! src/util/humanize.rs

use chrono::{DateTime, Local, Utc};

pub const NOT_AVAILABLE: &str = "Not available";

pub fn human_readable_size(size: u64) -> String {
    if size == 0 {
        return "0 B".to_string();
    }
    let units: [&'static str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut size_f: f64 = size as f64;
    let mut unit_idx: usize = 0;

    while size_f >= 1024.0 && unit_idx < units.len() - 1 {
        size_f /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", size, units[unit_idx])
    } else {
        format!("{:.1} {}", size_f, units[unit_idx])
    }
}

/// Local date and time, or "Not available" for a missing timestamp.
pub fn format_timestamp(ts: Option<&DateTime<Utc>>) -> String {
    ts.map_or_else(
        || NOT_AVAILABLE.to_string(),
        |t| {
            t.with_timezone(&Local)
                .format("%d/%m/%Y %I:%M %p")
                .to_string()
        },
    )
}

pub fn format_actors(actors: &[String]) -> String {
    if actors.is_empty() {
        "None listed".to_string()
    } else {
        actors.join(", ")
    }
}

/// `1 movie`, `3 movies`.
pub fn count_noun(n: u64, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}
