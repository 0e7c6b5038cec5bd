//! Date parsing and formatting helpers

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

/// Parse a frontmatter date string in any of the formats the content files use
pub fn parse_date_string(s: &str) -> Option<DateTime<Local>> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    // Naive values are local wall-clock times; mapping them through the
    // local offset keeps the written date intact in any timezone
    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            if let Some(local) = Local.from_local_datetime(&dt).earliest() {
                return Some(local);
            }
        }
        if let Ok(d) = chrono::NaiveDate::parse_from_str(s, fmt) {
            if let Some(local) = d
                .and_hms_opt(0, 0, 0)
                .and_then(|dt| Local.from_local_datetime(&dt).earliest())
            {
                return Some(local);
            }
        }
    }

    // RFC 3339 / ISO 8601 with offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }

    None
}

/// Format a date as `YYYY-MM-DD`, the form used in sitemaps and listings
pub fn short_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_string() {
        let dt = parse_date_string("2024-01-15").unwrap();
        assert_eq!(short_date(&dt), "2024-01-15");

        let dt = parse_date_string("2024-01-15 10:30:00").unwrap();
        assert_eq!(short_date(&dt), "2024-01-15");

        assert!(parse_date_string("not a date").is_none());
    }

    #[test]
    fn test_parsed_date_keeps_local_wall_clock() {
        // The frontmatter date is a local wall-clock value; the day must
        // not shift with the machine's UTC offset
        let dt = parse_date_string("2024-01-15").unwrap();
        assert_eq!(dt.naive_local().format("%Y-%m-%d %H:%M").to_string(), "2024-01-15 00:00");

        let dt = parse_date_string("2024-06-01 10:30:00").unwrap();
        assert_eq!(
            dt.naive_local().format("%Y-%m-%d %H:%M:%S").to_string(),
            "2024-06-01 10:30:00"
        );
    }
}
