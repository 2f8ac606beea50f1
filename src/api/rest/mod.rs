//! REST endpoints for the analytics dashboard
//!
//! - `GET /api/v1/events` - Filtered, paginated event listing
//! - `GET /api/v1/events/metrics` - Summary figures for the listing
//! - `GET /api/v1/trends` - Single-series time buckets
//! - `GET /api/v1/trends/multi-company` - Per-company time buckets
//! - `GET /api/v1/metrics` - Totals and event-type ranking
//! - `GET /api/v1/companies`, `GET /api/v1/event-types` - Global listings
//! - `GET /api/v1/analytics/*` - Top-N rankings

pub mod analytics;
pub mod events;
pub mod trends;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::utils::time::parse_date;

/// Default number of entries for the ranking endpoints
const DEFAULT_LIMIT: usize = 10;

/// Query string shared by every endpoint; each handler reads what it needs
///
/// Everything arrives as text so malformed numbers fall back to defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventQueryParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Comma-separated company names
    pub companies: Option<String>,
    /// Single company name, used when `companies` is absent
    pub company: Option<String>,
    /// Comma-separated event types
    pub event_types: Option<String>,
    pub query: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub limit: Option<String>,
    pub timeframe: Option<String>,
}

fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

impl EventQueryParams {
    pub fn start(&self) -> &str {
        self.start_date.as_deref().unwrap_or_default()
    }

    pub fn end(&self) -> &str {
        self.end_date.as_deref().unwrap_or_default()
    }

    pub fn search_query(&self) -> &str {
        self.query.as_deref().unwrap_or_default()
    }

    pub fn timeframe(&self) -> &str {
        self.timeframe.as_deref().unwrap_or_default()
    }

    pub fn companies(&self) -> Vec<String> {
        split_list(self.companies.as_deref())
    }

    /// `companies`, or the single `company` parameter when that is absent
    pub fn companies_or_single(&self) -> Vec<String> {
        let companies = self.companies();
        if !companies.is_empty() {
            return companies;
        }
        match self.company.as_deref().map(str::trim) {
            Some(company) if !company.is_empty() => vec![company.to_string()],
            _ => Vec::new(),
        }
    }

    pub fn event_types(&self) -> Vec<String> {
        split_list(self.event_types.as_deref())
    }

    pub fn page(&self) -> usize {
        parse_or(self.page.as_deref(), 1)
    }

    pub fn page_size(&self) -> usize {
        parse_or(self.page_size.as_deref(), crate::types::PaginationRequest::DEFAULT_PAGE_SIZE)
    }

    /// Ranking limit; zero or negative means unlimited
    pub fn limit(&self) -> usize {
        match self.limit.as_deref().map(|v| v.trim().parse::<i64>()) {
            Some(Ok(n)) if n > 0 => usize::try_from(n).unwrap_or(usize::MAX),
            Some(Ok(_)) => 0,
            _ => DEFAULT_LIMIT,
        }
    }

    /// In strict mode, any date bound that is present must be `YYYY-MM-DD`
    pub fn validate_dates(&self, strict: bool) -> Result<(), ApiError> {
        if !strict {
            return Ok(());
        }
        for (name, value) in [("startDate", self.start()), ("endDate", self.end())] {
            if !value.is_empty() && parse_date(value).is_none() {
                return Err(ApiError::invalid_date(format!(
                    "{name} must be a date in YYYY-MM-DD format (got '{value}')"
                )));
            }
        }
        Ok(())
    }
}

fn parse_or(value: Option<&str>, default: usize) -> usize {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

/// Error body: `{"error": {"code": ..., "message": ...}}`
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorDetails,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

impl ApiError {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetails {
                code: code.to_string(),
                message: message.into(),
            },
        }
    }

    pub fn missing_parameters(message: impl Into<String>) -> Self {
        Self::new("MISSING_PARAMETERS", message)
    }

    pub fn invalid_timeframe(message: impl Into<String>) -> Self {
        Self::new("INVALID_TIMEFRAME", message)
    }

    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::new("INVALID_DATE", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(companies: Option<&str>, company: Option<&str>) -> EventQueryParams {
        EventQueryParams {
            companies: companies.map(str::to_string),
            company: company.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_company_lists() {
        assert_eq!(
            params(Some(" Acme , Globex,"), None).companies(),
            vec!["Acme".to_string(), "Globex".to_string()]
        );
        assert_eq!(
            params(None, Some("Initech")).companies_or_single(),
            vec!["Initech".to_string()]
        );
        assert_eq!(
            params(Some("Acme"), Some("Initech")).companies_or_single(),
            vec!["Acme".to_string()]
        );
        assert!(params(None, Some("Initech")).companies().is_empty());
    }

    #[test]
    fn test_lenient_numbers() {
        let p = EventQueryParams {
            page: Some("abc".to_string()),
            page_size: Some("-3".to_string()),
            limit: Some("x".to_string()),
            ..Default::default()
        };
        assert_eq!(p.page(), 1);
        assert_eq!(p.page_size(), 20);
        assert_eq!(p.limit(), 10);

        let unlimited = EventQueryParams {
            limit: Some("-1".to_string()),
            ..Default::default()
        };
        assert_eq!(unlimited.limit(), 0);
    }

    #[test]
    fn test_strict_date_validation() {
        let p = EventQueryParams {
            start_date: Some("2024-13-01".to_string()),
            ..Default::default()
        };
        assert!(p.validate_dates(false).is_ok());
        let err = p.validate_dates(true).unwrap_err();
        assert_eq!(err.error.code, "INVALID_DATE");

        assert!(EventQueryParams::default().validate_dates(true).is_ok());
    }
}
