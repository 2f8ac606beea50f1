//! Typed query inputs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Calendar date bounds as received from callers (`YYYY-MM-DD`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl DateRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// A range is only applied when both bounds are present
    pub fn from_bounds(start: &str, end: &str) -> Option<Self> {
        if start.is_empty() || end.is_empty() {
            None
        } else {
            Some(Self::new(start, end))
        }
    }
}

/// Filter criteria for a search
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    #[serde(default)]
    pub companies: Vec<String>,
    #[serde(default)]
    pub event_types: Vec<String>,
}

/// Requested page, 1-based
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationRequest {
    pub page: usize,
    pub page_size: usize,
}

impl PaginationRequest {
    pub const DEFAULT_PAGE_SIZE: usize = 20;
    pub const MAX_PAGE_SIZE: usize = 100;

    pub fn new(page: usize, page_size: usize) -> Self {
        Self { page, page_size }
    }

    /// Page 0 becomes 1; a page size outside `1..=100` falls back to the default
    pub fn normalized(&self) -> (usize, usize) {
        let page = self.page.max(1);
        let page_size = if (1..=Self::MAX_PAGE_SIZE).contains(&self.page_size) {
            self.page_size
        } else {
            Self::DEFAULT_PAGE_SIZE
        };
        (page, page_size)
    }
}

impl Default for PaginationRequest {
    fn default() -> Self {
        Self::new(1, Self::DEFAULT_PAGE_SIZE)
    }
}

/// Search and filter request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub search_query: String,
    #[serde(default)]
    pub filters: SearchFilters,
    #[serde(default)]
    pub pagination: PaginationRequest,
}

/// Bucketing granularity for trend queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Daily,
    Weekly,
    Monthly,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Daily => "daily",
            Timeframe::Weekly => "weekly",
            Timeframe::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("timeframe must be one of: daily, weekly, monthly (got '{0}')")]
pub struct TimeframeParseError(pub String);

impl FromStr for Timeframe {
    type Err = TimeframeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Timeframe::Daily),
            "weekly" => Ok(Timeframe::Weekly),
            "monthly" => Ok(Timeframe::Monthly),
            other => Err(TimeframeParseError(other.to_string())),
        }
    }
}
