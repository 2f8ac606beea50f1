//! Query Engine - stateless reads over the loaded event snapshot
//!
//! Every operation re-scans the store; nothing is cached. Operations that
//! filter by company match the *resolved* company name, never the raw id.

mod aggregate;
mod extract;
mod filter;
mod group;
mod ranking;
mod search;
mod trends;

use std::sync::Arc;

pub use aggregate::TOP_COMPANIES_LIMIT;
pub use extract::{enhance_events, extract_endpoint_from_content, extract_user_from_content};
pub use filter::{matches_search, DateWindow, EventFilter};
pub use group::percentage;

use crate::event_store::{EventStore, StoreStats};
use crate::types::{
    Company, CompanyActivity, CompanyAnalytics, EndpointActivity, EventDistribution,
    EventTypeCount, FilteredMetrics, ListResponse, MetricsResponse,
    MultiCompanyTimeSeriesResponse, SearchRequest, SearchResponse, Timeframe,
    TimeSeriesResponse, UserActivity,
};

/// Read-only query front end shared by every request handler
#[derive(Debug, Clone)]
pub struct QueryEngine {
    store: Arc<EventStore>,
}

impl QueryEngine {
    /// Wrap a loaded store; it is never mutated afterwards
    pub fn new(store: EventStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn total_events(&self) -> usize {
        self.store.total_events()
    }

    pub fn stats(&self) -> StoreStats {
        self.store.stats()
    }

    /// Sorted, distinct company names known to the index
    pub fn all_company_names(&self) -> Vec<String> {
        self.store.company_names()
    }
}

// Operations live in the submodules; the engine only delegates.
impl QueryEngine {
    // Search (from search.rs)
    pub fn search_events(&self, request: &SearchRequest) -> SearchResponse {
        search::search_events(&self.store, request)
    }

    // Trends (from trends.rs)
    pub fn time_series(
        &self,
        timeframe: Timeframe,
        start: &str,
        end: &str,
        companies: &[String],
        event_types: &[String],
    ) -> TimeSeriesResponse {
        trends::time_series(&self.store, timeframe, start, end, companies, event_types)
    }

    pub fn multi_company_time_series(
        &self,
        timeframe: Timeframe,
        start: &str,
        end: &str,
        companies: &[String],
        event_types: &[String],
    ) -> MultiCompanyTimeSeriesResponse {
        trends::multi_company_time_series(&self.store, timeframe, start, end, companies, event_types)
    }

    // Aggregates (from aggregate.rs)
    pub fn metrics(
        &self,
        start: &str,
        end: &str,
        companies: &[String],
        event_types: &[String],
    ) -> MetricsResponse {
        aggregate::metrics(&self.store, start, end, companies, event_types)
    }

    pub fn filtered_metrics(&self, start: &str, end: &str, companies: &[String]) -> FilteredMetrics {
        aggregate::filtered_metrics(&self.store, start, end, companies)
    }

    pub fn unique_users(&self, start: &str, end: &str, companies: &[String]) -> usize {
        aggregate::unique_users(&self.store, start, end, companies)
    }

    pub fn companies(&self) -> ListResponse<Company> {
        aggregate::companies(&self.store)
    }

    pub fn top_active_companies(&self) -> ListResponse<CompanyAnalytics> {
        aggregate::top_active_companies(&self.store)
    }

    pub fn event_distribution(&self) -> ListResponse<EventDistribution> {
        aggregate::event_distribution(&self.store)
    }

    // Rankings (from ranking.rs); a limit of 0 means unlimited
    pub fn top_events_by_volume(
        &self,
        start: &str,
        end: &str,
        companies: &[String],
        limit: usize,
    ) -> Vec<EventTypeCount> {
        ranking::top_events_by_volume(&self.store, start, end, companies, limit)
    }

    pub fn most_active_users(
        &self,
        start: &str,
        end: &str,
        companies: &[String],
        limit: usize,
    ) -> Vec<UserActivity> {
        ranking::most_active_users(&self.store, start, end, companies, limit)
    }

    pub fn top_endpoints_by_usage(
        &self,
        start: &str,
        end: &str,
        companies: &[String],
        limit: usize,
    ) -> Vec<EndpointActivity> {
        ranking::top_endpoints_by_usage(&self.store, start, end, companies, limit)
    }

    pub fn top_active_companies_filtered(
        &self,
        start: &str,
        end: &str,
        companies: &[String],
        limit: usize,
    ) -> Vec<CompanyActivity> {
        ranking::top_active_companies_filtered(&self.store, start, end, companies, limit)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{engine, row, ACME_ROWS};
    use super::*;
    use crate::types::{DateRange, PaginationRequest, SearchFilters};

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    /// Seven companies with 7, 6, ..., 1 events each
    fn many_companies() -> String {
        let mut rows = String::new();
        let mut id = 0;
        for (n, company) in ["A", "B", "C", "D", "E", "F", "G"].iter().enumerate() {
            for _ in 0..(7 - n) {
                id += 1;
                rows.push_str(&row(
                    &format!("e{id}"),
                    &format!("2024-03-0{} 09:00:00", n + 1),
                    &format!("c{n}"),
                    "view",
                    &format!("Log - {company} u{n}@x.com /v1/items"),
                ));
            }
        }
        rows
    }

    #[test]
    fn test_metrics_scenario() {
        let engine = engine(ACME_ROWS);
        let metrics = engine.metrics("2024-01-01", "2024-01-02", &[], &[]);

        assert_eq!(metrics.total_events, 2);
        assert_eq!(metrics.active_companies, 1);
        assert_eq!(metrics.top_event_types.len(), 2);
        let types: Vec<(&str, usize)> = metrics
            .top_event_types
            .iter()
            .map(|t| (t.event_type.as_str(), t.count))
            .collect();
        assert!(types.contains(&("login", 1)));
        assert!(types.contains(&("logout", 1)));
        assert_eq!(metrics.time_range.start, "2024-01-01T10:00:00Z");
        assert_eq!(metrics.time_range.end, "2024-01-02T11:00:00Z");
    }

    #[test]
    fn test_metrics_empty_time_range() {
        let engine = engine(ACME_ROWS);
        let metrics = engine.metrics("2030-01-01", "2030-01-02", &[], &[]);
        assert_eq!(metrics.total_events, 0);
        assert_eq!(metrics.time_range.start, "");
        assert_eq!(metrics.time_range.end, "");
    }

    #[test]
    fn test_search_matches_company_name() {
        let engine = engine(ACME_ROWS);
        let request = SearchRequest {
            search_query: "acme".to_string(),
            ..Default::default()
        };

        let response = engine.search_events(&request);
        assert_eq!(response.pagination.total, 2);
        assert_eq!(response.data.len(), 2);
        assert!(response.data.iter().all(|e| e.company_name == "Acme"));
        assert_eq!(response.data[0].user, "alice@x.com");
        assert_eq!(response.data[0].endpoint, "/api/login");
    }

    #[test]
    fn test_search_no_filters_returns_everything_in_order() {
        let engine = engine(&many_companies());
        let response = engine.search_events(&SearchRequest {
            pagination: PaginationRequest::new(1, 100),
            ..Default::default()
        });

        assert_eq!(response.pagination.total, engine.total_events());
        assert!(response
            .data
            .windows(2)
            .all(|w| w[0].created_at <= w[1].created_at));
        assert_eq!(response.aggregations.unique_companies, 7);
    }

    #[test]
    fn test_search_pagination_past_end() {
        let engine = engine(&many_companies());
        let total = engine.total_events();

        let response = engine.search_events(&SearchRequest {
            pagination: PaginationRequest::new(50, 10),
            ..Default::default()
        });

        assert!(response.data.is_empty());
        assert_eq!(response.pagination.total, total);
        assert_eq!(response.pagination.total_pages, total.div_ceil(10));
        assert_eq!(response.aggregations.total_events, total);
    }

    #[test]
    fn test_search_page_size_out_of_range_uses_default() {
        let engine = engine(&many_companies());
        let response = engine.search_events(&SearchRequest {
            pagination: PaginationRequest::new(0, 500),
            ..Default::default()
        });

        assert_eq!(response.pagination.page, 1);
        assert_eq!(response.pagination.page_size, 20);
        assert_eq!(response.data.len(), 20);
    }

    #[test]
    fn test_start_of_range_is_exclusive() {
        let rows = [
            row("m1", "2024-01-01 00:00:00", "c1", "login", "User - Acme a@x.com /api/a"),
            row("m2", "2024-01-01 00:00:01", "c1", "login", "User - Acme a@x.com /api/a"),
            row("m3", "2024-01-02 23:59:59", "c1", "login", "User - Acme a@x.com /api/a"),
            row("m4", "2024-01-03 00:00:00", "c1", "login", "User - Acme a@x.com /api/a"),
        ]
        .concat();
        let engine = engine(&rows);
        let response = engine.search_events(&SearchRequest {
            filters: SearchFilters {
                date_range: Some(DateRange::new("2024-01-01", "2024-01-02")),
                ..Default::default()
            },
            ..Default::default()
        });

        let ids: Vec<&str> = response.data.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["m2", "m3"]);
    }

    #[test]
    fn test_filter_intersection_never_grows() {
        let engine = engine(&many_companies());
        let count = |companies: &[String], types: &[String]| {
            engine
                .search_events(&SearchRequest {
                    filters: SearchFilters {
                        companies: companies.to_vec(),
                        event_types: types.to_vec(),
                        ..Default::default()
                    },
                    ..Default::default()
                })
                .pagination
                .total
        };

        let companies = names(&["A", "C"]);
        let types = names(&["view"]);
        let both = count(&companies, &types);
        assert!(both <= count(&companies, &[]).min(count(&[], &types)));
        assert_eq!(count(&companies, &names(&["click"])), 0);
    }

    #[test]
    fn test_top_active_companies_limited_to_five() {
        let engine = engine(&many_companies());
        let top = engine.top_active_companies();

        assert_eq!(top.data.len(), TOP_COMPANIES_LIMIT);
        assert_eq!(top.total, TOP_COMPANIES_LIMIT);
        assert_eq!(top.data[0].name, "A");
        assert_eq!(top.data[0].event_count, 7);
        assert!(top
            .data
            .windows(2)
            .all(|w| w[0].event_count >= w[1].event_count));
    }

    #[test]
    fn test_weekly_trend_uses_monday() {
        // 2024-01-17 is a Wednesday
        let rows = [
            row("w1", "2024-01-17 12:00:00", "c1", "login", "User - Acme a@x.com /api/a"),
        ]
        .concat();
        let engine = engine(&rows);

        let series = engine.time_series(Timeframe::Weekly, "2024-01-01", "2024-01-31", &[], &[]);
        assert_eq!(series.total_points, 1);
        assert_eq!(series.data[0].timestamp, "2024-01-15");
        assert_eq!(series.data[0].value, 1);
        assert_eq!(series.data[0].event_type, "Action");
    }

    #[test]
    fn test_multi_company_fills_known_companies() {
        let rows = [
            row("x1", "2024-02-01 08:00:00", "c1", "view", "Log - Acme a@x.com /v1/a"),
            row("x2", "2024-02-02 08:00:00", "c2", "view", "Log - Globex b@y.com /v1/b"),
            row("x3", "2024-02-02 09:00:00", "c2", "view", "Log - Globex b@y.com /v1/b"),
        ]
        .concat();
        let engine = engine(&rows);
        let series =
            engine.multi_company_time_series(Timeframe::Daily, "2024-02-01", "2024-02-02", &[], &[]);

        assert_eq!(series.total_points, 2);
        let first = &series.data[0];
        assert_eq!(first.timestamp, "2024-02-01");
        assert_eq!(first.counts.get("Acme"), Some(&1));
        assert_eq!(first.counts.get("Globex"), Some(&0));
        let second = &series.data[1];
        assert_eq!(second.counts.get("Acme"), Some(&0));
        assert_eq!(second.counts.get("Globex"), Some(&2));
    }

    #[test]
    fn test_rankings_respect_limit_and_order() {
        let engine = engine(&many_companies());
        let all = names(&[]);

        let users = engine.most_active_users("2024-03-01", "2024-03-31", &all, 3);
        assert_eq!(users.len(), 3);
        assert_eq!(users[0].user, "u0@x.com");
        assert_eq!(users[0].event_count, 7);
        assert_eq!(users[0].company_names, vec!["A".to_string()]);

        let endpoints = engine.top_endpoints_by_usage("2024-03-01", "2024-03-31", &all, 0);
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].endpoint, "/v1/items");
        assert_eq!(endpoints[0].user_count, 7);
        assert_eq!(endpoints[0].company_count, 7);
        assert!((endpoints[0].percentage - 100.0).abs() < f64::EPSILON);

        let companies = engine.top_active_companies_filtered("2024-03-01", "2024-03-31", &all, 2);
        assert_eq!(companies.len(), 2);
        assert_eq!(companies[0].company_name, "A");
        assert_eq!(companies[0].user_count, 1);
        assert_eq!(companies[0].endpoint_count, 1);

        let events = engine.top_events_by_volume("2024-03-01", "2024-03-31", &all, 0);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].count, engine.total_events());
    }

    #[test]
    fn test_percentages_are_bounded() {
        let engine = engine(&many_companies());

        for d in engine.event_distribution().data {
            assert!((0.0..=100.0).contains(&d.percentage));
        }
        for c in engine.top_active_companies().data {
            assert!((0.0..=100.0).contains(&c.percentage));
        }
        let nothing = engine.top_endpoints_by_usage("2030-01-01", "2030-01-02", &[], 0);
        assert!(nothing.is_empty());
        assert_eq!(percentage(3, 0), 0.0);
    }

    #[test]
    fn test_filtered_metrics_and_unique_users() {
        let rows = [
            row("f1", "2024-05-01 08:00:00", "c1", "login", "Log - Acme a@x.com /v1/a"),
            row("f2", "2024-05-01 09:00:00", "c1", "login", "Log - Acme b@x.com /v1/a"),
            row("f3", "2024-05-01 10:00:00", "c2", "search", "Log - Globex nobody /v1/b"),
        ]
        .concat();
        let engine = engine(&rows);

        assert_eq!(engine.unique_users("2024-05-01", "2024-05-01", &[]), 2);

        let summary = engine.filtered_metrics("2024-05-01", "2024-05-01", &[]);
        assert_eq!(summary.total_events, 3);
        assert_eq!(summary.unique_companies, 2);
        assert_eq!(summary.unique_users, 2);
        assert_eq!(summary.top_event_type, "login");
        assert_eq!(summary.top_event_count, 2);
        assert_eq!(summary.avg_events_per_company, 1);

        let empty = engine.filtered_metrics("2030-01-01", "2030-01-01", &[]);
        assert_eq!(empty.top_event_type, "N/A");
        assert_eq!(empty.avg_events_per_company, 0);
    }

    #[test]
    fn test_companies_and_distribution() {
        let rows = [
            row("d1", "2024-05-01 08:00:00", "c1", "login", "Log - Acme a@x.com /v1/a"),
            row("d2", "2024-05-01 09:00:00", "c2", "login", "Log - Globex b@y.com /v1/a"),
            row("d3", "2024-05-01 10:00:00", "c2", "search", "Log - Globex b@y.com /v1/b"),
            row("d4", "2024-05-01 11:00:00", "c9", "search", "no separator here"),
        ]
        .concat();
        let engine = engine(&rows);

        let companies = engine.companies();
        assert_eq!(companies.total, 3);
        assert_eq!(companies.data[0].id, "c2");
        assert_eq!(companies.data[0].name, "Globex");
        assert_eq!(companies.data[0].event_count, 2);

        let distribution = engine.event_distribution();
        assert_eq!(distribution.total, 2);
        let login = distribution
            .data
            .iter()
            .find(|d| d.event_type == "login")
            .expect("login present");
        assert_eq!(login.count, 2);
        assert_eq!(login.companies, 2);
        assert!((login.percentage - 50.0).abs() < 1e-9);
    }
}
