//! Calendar and timestamp utilities

use chrono::{
    DateTime, Datelike, Days, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc,
};

use crate::types::Timeframe;

/// Calendar date format accepted in query filters
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date, rejecting anything else
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Parse a `YYYY-MM-DD` date, falling back to 0001-01-01 on malformed input
///
/// Query filters never reject a request over a bad date; the zero date makes
/// a bad start bound match everything and a bad end bound match nothing.
pub fn parse_date_or_default(value: &str) -> NaiveDate {
    parse_date(value).unwrap_or_else(zero_date)
}

fn zero_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Midnight UTC at the start of `date`
pub fn start_of_day(date: NaiveDate) -> DateTime<FixedOffset> {
    Utc.fix().from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Midnight UTC at the start of the day after `date`
pub fn end_of_day(date: NaiveDate) -> DateTime<FixedOffset> {
    start_of_day(date.checked_add_days(Days::new(1)).unwrap_or(date))
}

/// Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let back = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

/// Bucket key for a timestamp, using the calendar date of its own offset
///
/// Daily and weekly keys are `YYYY-MM-DD` (weekly keys are the Monday),
/// monthly keys are `YYYY-MM`. All sort correctly as plain strings.
pub fn bucket_key(timestamp: &DateTime<FixedOffset>, timeframe: Timeframe) -> String {
    let date = timestamp.date_naive();
    match timeframe {
        Timeframe::Daily => date.format(DATE_FORMAT).to_string(),
        Timeframe::Weekly => week_start(date).format(DATE_FORMAT).to_string(),
        Timeframe::Monthly => date.format("%Y-%m").to_string(),
    }
}

/// Second-precision UTC rendering, e.g. `2024-01-02T10:00:00Z`
pub fn format_utc_seconds(timestamp: &DateTime<FixedOffset>) -> String {
    timestamp
        .with_timezone(&Utc)
        .format("%Y-%m-%dT%H:%M:%SZ")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_lenient() {
        assert_eq!(parse_date_or_default("2024-03-05"), date(2024, 3, 5));
        assert_eq!(parse_date_or_default("not-a-date"), date(1, 1, 1));
        assert_eq!(parse_date_or_default(""), date(1, 1, 1));
        assert!(parse_date("2024-13-01").is_none());
    }

    #[test]
    fn test_week_start_is_monday() {
        // 2024-01-03 is a Wednesday
        assert_eq!(week_start(date(2024, 1, 3)), date(2024, 1, 1));
        assert_eq!(week_start(date(2024, 1, 1)), date(2024, 1, 1));
        // Sunday belongs to the week that started six days earlier
        assert_eq!(week_start(date(2024, 1, 7)), date(2024, 1, 1));
        // Crosses a year boundary
        assert_eq!(week_start(date(2025, 1, 1)), date(2024, 12, 30));
    }

    #[test]
    fn test_bucket_keys() {
        let ts = DateTime::parse_from_rfc3339("2024-01-03T10:00:00+00:00").unwrap();
        assert_eq!(bucket_key(&ts, Timeframe::Daily), "2024-01-03");
        assert_eq!(bucket_key(&ts, Timeframe::Weekly), "2024-01-01");
        assert_eq!(bucket_key(&ts, Timeframe::Monthly), "2024-01");
    }

    #[test]
    fn test_bucket_key_uses_event_offset() {
        let ts = DateTime::parse_from_rfc3339("2024-01-01T23:30:00-07:00").unwrap();
        assert_eq!(bucket_key(&ts, Timeframe::Daily), "2024-01-01");
    }

    #[test]
    fn test_day_bounds() {
        let d = date(2024, 1, 2);
        assert_eq!(format_utc_seconds(&start_of_day(d)), "2024-01-02T00:00:00Z");
        assert_eq!(format_utc_seconds(&end_of_day(d)), "2024-01-03T00:00:00Z");
    }
}
