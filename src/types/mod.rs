//! Data types for the usage analytics engine
//!
//! This module contains the event model, the typed query inputs, and the
//! plain result structures returned by the query engine.

mod event;
mod request;
mod response;

pub use event::UsageEvent;
pub use request::{DateRange, PaginationRequest, SearchFilters, SearchRequest, Timeframe, TimeframeParseError};
pub use response::{
    Company, CompanyActivity, CompanyAnalytics, EndpointActivity,
    EventDistribution, EventTypeCount, FilteredMetrics, ListResponse, MetricsResponse,
    MultiCompanyPoint, MultiCompanyTimeSeriesResponse, PaginationInfo, SearchAggregations,
    SearchResponse, TimeRange, TimeSeriesPoint, TimeSeriesResponse, UserActivity,
};

/// Company name used when a company id does not resolve
pub const UNKNOWN_COMPANY: &str = "Unknown Company";

/// User placeholder when no user can be derived from content
pub const UNKNOWN_USER: &str = "Unknown User";

/// Endpoint placeholder produced by the load-time content parser
pub const UNKNOWN_ENDPOINT: &str = "Unknown Endpoint";

/// Endpoint placeholder produced by the read-time content parser
pub const NO_ENDPOINT: &str = "N/A";
