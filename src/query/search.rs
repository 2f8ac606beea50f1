//! Search operation: filter, paginate, enrich, aggregate

use std::collections::HashSet;

use tracing::debug;

use super::extract::enhance_events;
use super::filter::EventFilter;
use super::group::{rank, Grouping};
use crate::event_store::EventStore;
use crate::types::{
    EventTypeCount, PaginationInfo, SearchAggregations, SearchRequest, SearchResponse, UsageEvent,
};

/// Search events with filters, free-text query and pagination
///
/// Aggregations cover the whole filtered set; only `data` is paginated.
/// A page past the end yields no data but still reports the full total.
pub fn search_events(store: &EventStore, request: &SearchRequest) -> SearchResponse {
    let filters = &request.filters;
    let filtered = EventFilter::new()
        .date_range(filters.date_range.as_ref())
        .companies(&filters.companies)
        .event_types(&filters.event_types)
        .search(&request.search_query)
        .apply(store);

    let (page, page_size) = request.pagination.normalized();
    let total = filtered.len();
    let start = (page - 1).saturating_mul(page_size);

    let page_events: &[&UsageEvent] = if start < total {
        &filtered[start..(start + page_size).min(total)]
    } else {
        &[]
    };

    debug!(total, page, page_size, returned = page_events.len(), "search");

    SearchResponse {
        data: enhance_events(store, page_events),
        pagination: PaginationInfo {
            page,
            page_size,
            total,
            total_pages: total.div_ceil(page_size),
        },
        aggregations: SearchAggregations {
            total_events: total,
            unique_companies: distinct_company_ids(&filtered),
            event_types: count_event_types(&filtered),
        },
    }
}

/// Occurrences per event type, most frequent first
pub(crate) fn count_event_types(events: &[&UsageEvent]) -> Vec<EventTypeCount> {
    let mut counts: Grouping<usize> = Grouping::new();
    for event in events {
        *counts.entry(&event.event_type) += 1;
    }

    let records = counts.into_records(|event_type, count| EventTypeCount { event_type, count });
    rank(records, |r| r.count, |r| r.event_type.as_str(), 0)
}

/// Number of distinct raw company ids
pub(crate) fn distinct_company_ids(events: &[&UsageEvent]) -> usize {
    events
        .iter()
        .map(|e| e.company_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}
