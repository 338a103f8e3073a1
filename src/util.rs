use crate::error::{LocmapError, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::time::{Duration, SystemTime};

/// Parse the `datetime` column of the log. Offsets are kept so hours read in the author's clock.
pub fn parse_log_datetime(input: &str) -> Option<DateTime<FixedOffset>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, fmt) {
            return Some(Utc.from_utc_datetime(&naive).fixed_offset());
        }
    }
    None
}

/// Parse a user-supplied date: RFC3339, `YYYY-MM-DD`, or a relative duration such as `2 weeks ago`.
pub fn parse_user_date(input: &str) -> Result<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt);
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(datetime) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&datetime).fixed_offset());
        }
    }

    if let Some(dt) = parse_log_datetime(input) {
        return Ok(dt);
    }

    if let Some(duration) = parse_natural_duration(input) {
        let target = SystemTime::now()
            .checked_sub(duration)
            .ok_or_else(|| LocmapError::InvalidDate(format!("Duration overflow for '{input}'")))?;
        return Ok(DateTime::<Utc>::from(target).fixed_offset());
    }

    Err(LocmapError::InvalidDate(format!(
        "'{input}' is not RFC3339, YYYY-MM-DD or a relative duration"
    )))
}

fn parse_natural_duration(input: &str) -> Option<Duration> {
    let input = input.trim().to_lowercase();
    let body = input.strip_suffix(" ago").unwrap_or(&input).trim();

    if let Some(months) = body.strip_suffix(" months") {
        if let Ok(n) = months.trim().parse::<u64>() {
            return Some(Duration::from_secs(n * 30 * 86400));
        }
    }

    humantime::parse_duration(body).ok()
}

/// Percentage with at most one decimal and trailing zeros trimmed: `0.5` -> `50%`, `1/3` -> `33.3%`.
pub fn format_share(ratio: f64) -> String {
    let pct = format!("{:.1}", ratio * 100.0);
    let pct = pct.trim_end_matches('0').trim_end_matches('.');
    format!("{pct}%")
}

/// Spinners only make sense for a human watching stderr.
pub fn show_progress(machine_output: bool) -> bool {
    !machine_output && console::Term::stderr().is_term()
}

pub fn hour_label(hour: u32) -> String {
    format!("{hour:02}:00")
}

pub fn commit_url(repo: Option<&str>, id: &str) -> Option<String> {
    repo.map(|slug| format!("https://github.com/{}/commit/{id}", slug.trim_matches('/')))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn log_datetime_keeps_offset() {
        let dt = parse_log_datetime("2024-02-03T14:30:00-08:00").unwrap();
        assert_eq!(dt.hour(), 14);
        assert_eq!(dt.offset().local_minus_utc(), -8 * 3600);
    }

    #[test]
    fn naive_log_datetime_is_utc() {
        let dt = parse_log_datetime("2024-02-03 09:15:00").unwrap();
        assert_eq!(dt.hour(), 9);
        assert_eq!(dt.offset().local_minus_utc(), 0);
    }

    #[test]
    fn user_date_accepts_relative_durations() {
        let now = Utc::now();
        let dt = parse_user_date("2 weeks ago").unwrap();
        let days = (now - dt.with_timezone(&Utc)).num_days();
        assert!((13..=14).contains(&days));
        assert!(parse_user_date("not a date").is_err());
    }

    #[test]
    fn share_trims_trailing_zeros() {
        assert_eq!(format_share(0.5), "50%");
        assert_eq!(format_share(1.0 / 3.0), "33.3%");
        assert_eq!(format_share(0.125), "12.5%");
        assert_eq!(format_share(1.0), "100%");
    }

    #[test]
    fn url_uses_repo_slug() {
        assert_eq!(
            commit_url(Some("me/site"), "abc").as_deref(),
            Some("https://github.com/me/site/commit/abc")
        );
        assert_eq!(commit_url(None, "abc"), None);
    }
}
