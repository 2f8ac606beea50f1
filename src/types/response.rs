//! Result structures produced by the query engine
//!
//! These are plain records; the HTTP layer decides how they are wrapped.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use super::{Timeframe, UsageEvent};

/// Pagination details for a search result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// Count of events for one event type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventTypeCount {
    #[serde(rename = "type")]
    pub event_type: String,
    pub count: usize,
}

/// Aggregations computed over the whole filtered set, not just the page
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchAggregations {
    pub total_events: usize,
    pub unique_companies: usize,
    pub event_types: Vec<EventTypeCount>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResponse {
    pub data: Vec<UsageEvent>,
    pub pagination: PaginationInfo,
    pub aggregations: SearchAggregations,
}

/// One bucket of a single-series trend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    pub timestamp: String,
    pub value: usize,
    pub event_type: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesResponse {
    pub data: Vec<TimeSeriesPoint>,
    pub timeframe: Timeframe,
    pub total_points: usize,
}

/// One bucket of a multi-company trend: `{"timestamp": ..., "<company>": count, ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MultiCompanyPoint {
    pub timestamp: String,
    #[serde(flatten)]
    pub counts: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiCompanyTimeSeriesResponse {
    pub data: Vec<MultiCompanyPoint>,
    pub timeframe: Timeframe,
    pub total_points: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResponse {
    pub total_events: usize,
    pub active_companies: usize,
    pub top_event_types: Vec<EventTypeCount>,
    pub time_range: TimeRange,
}

/// Summary figures for the filtered event listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredMetrics {
    pub total_events: usize,
    pub unique_companies: usize,
    pub unique_users: usize,
    pub top_event_type: String,
    pub top_event_count: usize,
    pub avg_events_per_company: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
    pub event_count: usize,
}

/// Company ranking entry over the whole dataset
#[derive(Debug, Clone, Serialize)]
pub struct CompanyAnalytics {
    pub company_id: String,
    pub name: String,
    pub event_count: usize,
    pub percentage: f64,
    pub last_activity: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventDistribution {
    #[serde(rename = "type")]
    pub event_type: String,
    pub count: usize,
    pub percentage: f64,
    pub companies: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActivity {
    pub user: String,
    pub event_count: usize,
    pub companies: usize,
    pub company_names: Vec<String>,
    pub last_activity: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointActivity {
    pub endpoint: String,
    pub event_count: usize,
    pub user_count: usize,
    pub company_count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyActivity {
    pub company_name: String,
    pub event_count: usize,
    pub user_count: usize,
    pub endpoint_count: usize,
    pub last_activity: DateTime<FixedOffset>,
}

/// `{data, total}` wrapper shared by the ranking responses
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub total: usize,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        let total = data.len();
        Self { data, total }
    }
}

impl<T> Default for ListResponse<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
