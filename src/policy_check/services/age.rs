//! Duration parsing for the policy file and relative age rendering.

use crate::shared::Result;
use chrono::Duration;

/// Parses durations such as `2d`, `12h`, `30m`, `45s`, `1w` or bare seconds
pub fn parse_duration(input: &str) -> Result<Duration> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        anyhow::bail!("duration must not be empty");
    }

    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, unit) = trimmed.split_at(split);
    let amount: i64 = digits
        .parse()
        .map_err(|_| anyhow::anyhow!("\"{}\" does not start with a number", input))?;

    let duration = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "s" | "sec" | "secs" | "second" | "seconds" => Duration::try_seconds(amount),
        "m" | "min" | "mins" | "minute" | "minutes" => Duration::try_minutes(amount),
        "h" | "hr" | "hrs" | "hour" | "hours" => Duration::try_hours(amount),
        "d" | "day" | "days" => Duration::try_days(amount),
        "w" | "week" | "weeks" => Duration::try_weeks(amount),
        other => anyhow::bail!("unknown duration unit \"{}\" in \"{}\"", other, input),
    };

    duration.ok_or_else(|| anyhow::anyhow!("duration \"{}\" is out of range", input))
}

/// Renders an elapsed time as "N days ago", "N hours ago", ...
pub fn format_elapsed(elapsed: Duration) -> String {
    if elapsed.num_days() >= 1 {
        plural(elapsed.num_days(), "day")
    } else if elapsed.num_hours() >= 1 {
        plural(elapsed.num_hours(), "hour")
    } else if elapsed.num_minutes() >= 1 {
        plural(elapsed.num_minutes(), "minute")
    } else {
        "just now".to_string()
    }
}

/// Renders a threshold duration as "2 days", "12 hours", ...
pub fn format_threshold(threshold: Duration) -> String {
    if threshold.num_days() >= 1 && threshold.num_hours() % 24 == 0 {
        unit_count(threshold.num_days(), "day")
    } else if threshold.num_hours() >= 1 && threshold.num_minutes() % 60 == 0 {
        unit_count(threshold.num_hours(), "hour")
    } else if threshold.num_minutes() >= 1 && threshold.num_seconds() % 60 == 0 {
        unit_count(threshold.num_minutes(), "minute")
    } else {
        unit_count(threshold.num_seconds(), "second")
    }
}

fn plural(count: i64, unit: &str) -> String {
    format!("{} ago", unit_count(count, unit))
}

fn unit_count(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", count, unit)
    }
}
