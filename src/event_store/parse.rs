//! Row parsing for the usage dataset
//!
//! Column order is fixed:
//! `id, created_at, company_id, type, content, attribute, updated_at, original_timestamp, value`.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};

use crate::types::{UsageEvent, UNKNOWN_COMPANY, UNKNOWN_ENDPOINT, UNKNOWN_USER};

/// Number of columns in every data row
pub const COLUMN_COUNT: usize = 9;

/// Separator between the description and the `<Company> <email> <path>` part of `content`
const CONTENT_SEPARATOR: &str = " - ";

/// Accepted timestamp layouts, tried in order
///
/// `%.f` also matches when the fractional part is absent, so each layout
/// covers both the fractional and whole-second variants.
const TIMESTAMP_FORMATS: &[TimestampFormat] = &[
    TimestampFormat::WithOffset("%Y-%m-%d %H:%M:%S%.f%#z"),
    TimestampFormat::Utc("%Y-%m-%d %H:%M:%S%.fZ"),
    TimestampFormat::Utc("%Y-%m-%d %H:%M:%S%.f"),
];

#[derive(Debug, Clone, Copy)]
enum TimestampFormat {
    /// Carries an explicit offset such as `+00` or `-07`
    WithOffset(&'static str),
    /// No offset in the text; interpreted as UTC
    Utc(&'static str),
}

impl TimestampFormat {
    fn parse(&self, value: &str) -> Option<DateTime<FixedOffset>> {
        match self {
            TimestampFormat::WithOffset(fmt) => DateTime::parse_from_str(value, fmt).ok(),
            TimestampFormat::Utc(fmt) => NaiveDateTime::parse_from_str(value, fmt)
                .ok()
                .map(|naive| Utc.fix().from_utc_datetime(&naive)),
        }
    }
}

/// No accepted layout matched
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unable to parse timestamp: {value}")]
pub struct TimestampParseError {
    pub value: String,
}

/// Reasons a single row is skipped during load
#[derive(Debug, thiserror::Error)]
pub enum RowError {
    #[error("expected {expected} columns, found {found}")]
    ColumnCount { expected: usize, found: usize },

    #[error("invalid {field}: {source}")]
    Timestamp {
        field: &'static str,
        source: TimestampParseError,
    },

    #[error("malformed record: {0}")]
    Malformed(#[from] csv::Error),
}

/// Parse a timestamp using the first layout that matches
pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, TimestampParseError> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| format.parse(value))
        .ok_or_else(|| TimestampParseError {
            value: value.to_string(),
        })
}

/// Parse the optional measurement; empty, `null` and non-numeric all mean absent
pub fn parse_value(value: &str) -> Option<f64> {
    match value {
        "" | "null" => None,
        other => other.parse::<f64>().ok(),
    }
}

fn parse_field(field: &'static str, value: &str) -> Result<DateTime<FixedOffset>, RowError> {
    parse_timestamp(value).map_err(|source| RowError::Timestamp { field, source })
}

/// Parse one data row into an event
///
/// The event's `company_name` is left empty; it is resolved from the company
/// index when events are served.
pub fn parse_row(fields: &[&str]) -> Result<UsageEvent, RowError> {
    if fields.len() != COLUMN_COUNT {
        return Err(RowError::ColumnCount {
            expected: COLUMN_COUNT,
            found: fields.len(),
        });
    }

    let created_at = parse_field("created_at", fields[1])?;
    let updated_at = parse_field("updated_at", fields[6])?;
    let original_timestamp = parse_field("original_timestamp", fields[7])?;

    let content = fields[4];
    let (user, endpoint) = extract_user_and_endpoint(content);

    Ok(UsageEvent {
        id: fields[0].to_string(),
        created_at,
        company_id: fields[2].to_string(),
        company_name: String::new(),
        event_type: fields[3].to_string(),
        content: content.to_string(),
        attribute: fields[5].to_string(),
        user,
        endpoint,
        updated_at,
        original_timestamp,
        value: parse_value(fields[8]),
    })
}

/// The `<Company> <email> <path>` part of content, if present
fn company_part(content: &str) -> Option<&str> {
    content.split(CONTENT_SEPARATOR).nth(1)
}

/// Company name used to populate the company index
///
/// Content looks like `"User active CMMS - Acme alice@acme.com /work-orders"`;
/// the name is the text up to the first space after the separator.
pub fn extract_company_name(content: &str) -> String {
    match company_part(content) {
        Some(part) => part
            .split_once(' ')
            .map_or(part, |(name, _)| name)
            .to_string(),
        None => UNKNOWN_COMPANY.to_string(),
    }
}

/// Load-time user and endpoint derivation
///
/// User is the first token containing `@`, endpoint is everything after the
/// last space of the company part.
pub fn extract_user_and_endpoint(content: &str) -> (String, String) {
    let Some(part) = company_part(content) else {
        return (UNKNOWN_USER.to_string(), UNKNOWN_ENDPOINT.to_string());
    };

    let user = part
        .split_whitespace()
        .find(|token| token.contains('@'))
        .unwrap_or(UNKNOWN_USER);

    let endpoint = part
        .rfind(' ')
        .map_or(UNKNOWN_ENDPOINT, |idx| &part[idx + 1..]);

    (user.to_string(), endpoint.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_layouts() {
        let cases = [
            ("2024-01-01 10:00:00", "2024-01-01T10:00:00+00:00"),
            ("2024-01-01 10:00:00Z", "2024-01-01T10:00:00+00:00"),
            ("2024-01-01 10:00:00.123456", "2024-01-01T10:00:00.123456+00:00"),
            ("2024-01-01 10:00:00.5Z", "2024-01-01T10:00:00.500+00:00"),
            ("2024-01-01 10:00:00+00", "2024-01-01T10:00:00+00:00"),
            ("2024-01-01 10:00:00-07", "2024-01-01T10:00:00-07:00"),
            ("2024-01-01 10:00:00.25+02", "2024-01-01T10:00:00.250+02:00"),
        ];

        for (input, expected) in cases {
            let parsed = parse_timestamp(input).unwrap_or_else(|e| panic!("{input}: {e}"));
            let expected = DateTime::parse_from_rfc3339(expected).unwrap();
            assert_eq!(parsed, expected, "input {input}");
        }
    }

    #[test]
    fn test_parse_timestamp_keeps_offset() {
        let parsed = parse_timestamp("2024-01-01 23:00:00-07").unwrap();
        assert_eq!(parsed.offset().local_minus_utc(), -7 * 3600);
    }

    #[test]
    fn test_parse_timestamp_rejects_unknown_layout() {
        for input in ["", "yesterday", "2024/01/01 10:00:00", "2024-01-01"] {
            let err = parse_timestamp(input).unwrap_err();
            assert_eq!(err.value, input);
        }
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("null"), None);
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("abc"), None);
        assert_eq!(parse_value("42"), Some(42.0));
        assert_eq!(parse_value("-1.5"), Some(-1.5));
    }

    #[test]
    fn test_extract_company_name() {
        assert_eq!(
            extract_company_name("User - Acme alice@x.com /api/login"),
            "Acme"
        );
        assert_eq!(extract_company_name("User - Globex"), "Globex");
        assert_eq!(extract_company_name("no separator here"), UNKNOWN_COMPANY);
        // Only the second segment matters
        assert_eq!(
            extract_company_name("a - Initech bob@i.com /x - trailing"),
            "Initech"
        );
    }

    #[test]
    fn test_extract_user_and_endpoint() {
        let (user, endpoint) = extract_user_and_endpoint("User - Acme alice@x.com /api/login");
        assert_eq!(user, "alice@x.com");
        assert_eq!(endpoint, "/api/login");

        let (user, endpoint) = extract_user_and_endpoint("User - Acme");
        assert_eq!(user, UNKNOWN_USER);
        assert_eq!(endpoint, UNKNOWN_ENDPOINT);

        let (user, endpoint) = extract_user_and_endpoint("plain text");
        assert_eq!(user, UNKNOWN_USER);
        assert_eq!(endpoint, UNKNOWN_ENDPOINT);
    }

    #[test]
    fn test_parse_row() {
        let fields = [
            "e1",
            "2024-01-01 10:00:00",
            "c1",
            "login",
            "User - Acme alice@x.com /api/login",
            "",
            "2024-01-01 10:00:00",
            "2024-01-01 10:00:00",
            "null",
        ];
        let event = parse_row(&fields).unwrap();
        assert_eq!(event.id, "e1");
        assert_eq!(event.company_id, "c1");
        assert_eq!(event.event_type, "login");
        assert_eq!(event.user, "alice@x.com");
        assert_eq!(event.endpoint, "/api/login");
        assert!(event.company_name.is_empty());
        assert_eq!(event.value, None);
    }

    #[test]
    fn test_parse_row_errors() {
        let short = ["e1", "2024-01-01 10:00:00"];
        assert!(matches!(
            parse_row(&short),
            Err(RowError::ColumnCount { expected: 9, found: 2 })
        ));

        let bad_time = [
            "e1", "2024-01-01 10:00:00", "c1", "login", "", "",
            "not a time", "2024-01-01 10:00:00", "1",
        ];
        match parse_row(&bad_time) {
            Err(RowError::Timestamp { field, source }) => {
                assert_eq!(field, "updated_at");
                assert_eq!(source.value, "not a time");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
