use chrono::{DateTime, Utc};

/// Human-friendly age of a timestamp relative to `now`.
///
/// Anything a week or older falls back to the calendar date.
pub fn format_time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if seconds < 60 {
        "few seconds ago".to_string()
    } else if minutes < 60 {
        plural(minutes, "minute")
    } else if hours < 24 {
        plural(hours, "hour")
    } else if days < 7 {
        plural(days, "day")
    } else {
        then.format("%Y-%m-%d").to_string()
    }
}

/// Parse an RFC 3339 timestamp from the API and format it against the current time.
/// Unparseable input is returned unchanged.
pub fn format_time_ago_str(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(then) => format_time_ago(then.with_timezone(&Utc), Utc::now()),
        Err(_) => raw.to_string(),
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_seconds() {
        assert_eq!(format_time_ago(now() - Duration::seconds(59), now()), "few seconds ago");
    }

    #[test]
    fn test_future_timestamp_is_recent() {
        assert_eq!(format_time_ago(now() + Duration::seconds(30), now()), "few seconds ago");
    }

    #[test]
    fn test_minutes_and_hours() {
        assert_eq!(format_time_ago(now() - Duration::minutes(1), now()), "1 minute ago");
        assert_eq!(format_time_ago(now() - Duration::minutes(45), now()), "45 minutes ago");
        assert_eq!(format_time_ago(now() - Duration::hours(1), now()), "1 hour ago");
        assert_eq!(format_time_ago(now() - Duration::hours(23), now()), "23 hours ago");
    }

    #[test]
    fn test_days_then_date() {
        assert_eq!(format_time_ago(now() - Duration::days(1), now()), "1 day ago");
        assert_eq!(format_time_ago(now() - Duration::days(6), now()), "6 days ago");
        assert_eq!(format_time_ago(now() - Duration::days(7), now()), "2024-06-08");
    }

    #[test]
    fn test_unparseable_passthrough() {
        assert_eq!(format_time_ago_str("yesterday"), "yesterday");
    }
}
