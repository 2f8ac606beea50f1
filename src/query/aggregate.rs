//! Dataset-level metrics and distributions

use super::filter::EventFilter;
use super::group::{percentage, rank, Distinct, Grouping, LastActivity};
use super::search::{count_event_types, distinct_company_ids};
use crate::event_store::EventStore;
use crate::types::{
    Company, CompanyAnalytics, EventDistribution, FilteredMetrics, ListResponse, MetricsResponse,
    TimeRange, UNKNOWN_USER,
};
use crate::utils::time::format_utc_seconds;

/// How many companies the global activity ranking returns
pub const TOP_COMPANIES_LIMIT: usize = 5;

/// Placeholder for the top event type when nothing matched
const NO_EVENT_TYPE: &str = "N/A";

/// Totals, active companies and event-type ranking for the filtered set
pub fn metrics(
    store: &EventStore,
    start: &str,
    end: &str,
    companies: &[String],
    event_types: &[String],
) -> MetricsResponse {
    let filtered = EventFilter::new()
        .date_bounds(start, end)
        .companies(companies)
        .event_types(event_types)
        .apply(store);

    let time_range = match (filtered.first(), filtered.last()) {
        (Some(first), Some(last)) => TimeRange {
            start: format_utc_seconds(&first.created_at),
            end: format_utc_seconds(&last.created_at),
        },
        _ => TimeRange::default(),
    };

    MetricsResponse {
        total_events: filtered.len(),
        active_companies: distinct_company_ids(&filtered),
        top_event_types: count_event_types(&filtered),
        time_range,
    }
}

/// Summary figures for the event listing view
pub fn filtered_metrics(
    store: &EventStore,
    start: &str,
    end: &str,
    companies: &[String],
) -> FilteredMetrics {
    let metrics = metrics(store, start, end, companies, &[]);

    let (top_event_type, top_event_count) = metrics
        .top_event_types
        .first()
        .map(|top| (top.event_type.clone(), top.count))
        .unwrap_or_else(|| (NO_EVENT_TYPE.to_string(), 0));

    let avg_events_per_company = metrics
        .total_events
        .checked_div(metrics.active_companies)
        .unwrap_or(0);

    FilteredMetrics {
        total_events: metrics.total_events,
        unique_companies: metrics.active_companies,
        unique_users: unique_users(store, start, end, companies),
        top_event_type,
        top_event_count,
        avg_events_per_company,
    }
}

/// Distinct known users in the filtered set
///
/// The `"Unknown User"` placeholder and empty users are not counted.
pub fn unique_users(store: &EventStore, start: &str, end: &str, companies: &[String]) -> usize {
    let filtered = EventFilter::new()
        .date_bounds(start, end)
        .companies(companies)
        .apply(store);

    let mut users = Distinct::default();
    for event in filtered.iter().filter(|e| e.user != UNKNOWN_USER) {
        users.insert_non_empty(&event.user);
    }
    users.len()
}

/// Every company id seen in events with its event count, busiest first
pub fn companies(store: &EventStore) -> ListResponse<Company> {
    let mut counts: Grouping<usize> = Grouping::new();
    for event in store.events() {
        *counts.entry(&event.company_id) += 1;
    }

    let records = counts.into_records(|id, event_count| Company {
        name: store.resolve_company(&id).to_string(),
        id,
        event_count,
    });

    ListResponse::new(rank(records, |c| c.event_count, |c| c.id.as_str(), 0))
}

struct CompanyIdTally {
    count: usize,
    last_activity: LastActivity,
}

/// The five busiest company ids across the whole dataset
pub fn top_active_companies(store: &EventStore) -> ListResponse<CompanyAnalytics> {
    let mut grouping: Grouping<CompanyIdTally> = Grouping::new();
    for event in store.events() {
        let tally = grouping.entry_with(&event.company_id, || CompanyIdTally {
            count: 0,
            last_activity: LastActivity::new(event.created_at),
        });
        tally.count += 1;
        tally.last_activity.observe(event.created_at);
    }

    let total = store.total_events();
    let records = grouping.into_records(|company_id, tally| CompanyAnalytics {
        name: store.resolve_company(&company_id).to_string(),
        company_id,
        event_count: tally.count,
        percentage: percentage(tally.count, total),
        last_activity: tally.last_activity.get(),
    });

    ListResponse::new(rank(
        records,
        |c| c.event_count,
        |c| c.company_id.as_str(),
        TOP_COMPANIES_LIMIT,
    ))
}

/// Share of every event type across the whole dataset
pub fn event_distribution(store: &EventStore) -> ListResponse<EventDistribution> {
    let mut companies_by_type: Grouping<Distinct> = Grouping::new();
    for event in store.events() {
        companies_by_type
            .entry(&event.event_type)
            .insert(&event.company_id);
    }
    let mut companies_by_type: std::collections::HashMap<String, usize> = companies_by_type
        .into_records(|event_type, ids| (event_type, ids.len()))
        .into_iter()
        .collect();

    let total = store.total_events();
    let records: Vec<EventDistribution> = store
        .event_type_counts()
        .iter()
        .map(|(event_type, &count)| EventDistribution {
            event_type: event_type.clone(),
            count,
            percentage: percentage(count, total),
            companies: companies_by_type.remove(event_type).unwrap_or(0),
        })
        .collect();

    ListResponse::new(rank(records, |d| d.count, |d| d.event_type.as_str(), 0))
}
