//! Git date parsing

use chrono::{DateTime, FixedOffset};

/// Parse a date as printed by git: RFC 3339 (`2024-01-15T10:00:00+00:00`) or
/// git's iso8601 (`2024-01-15 10:00:00 +0000`). The offset is kept.
pub fn parse_git_date(input: &str) -> Option<DateTime<FixedOffset>> {
    let input = input.trim();
    DateTime::parse_from_rfc3339(input)
        .or_else(|_| DateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S %z"))
        .ok()
}

/// Convert a git2 timestamp into a timezone-aware date
pub(crate) fn from_git_time(time: git2::Time) -> Option<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60)?;
    DateTime::from_timestamp(time.seconds(), 0).map(|utc| utc.with_timezone(&offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc3339() {
        let date = parse_git_date("2024-01-15T10:00:00+02:00").unwrap();
        assert_eq!(date.offset().local_minus_utc(), 7200);
    }

    #[test]
    fn test_git_iso8601() {
        let a = parse_git_date("2024-01-15 10:00:00 +0000").unwrap();
        let b = parse_git_date("2024-01-15T10:00:00Z").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_garbage() {
        assert!(parse_git_date("yesterday").is_none());
        assert!(parse_git_date("").is_none());
    }

    #[test]
    fn test_from_git_time_keeps_offset() {
        let date = from_git_time(git2::Time::new(1_705_312_800, -300)).unwrap();
        assert_eq!(date.offset().local_minus_utc(), -300 * 60);
        assert_eq!(date.timestamp(), 1_705_312_800);
    }
}
