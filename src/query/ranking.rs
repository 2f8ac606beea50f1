//! Top-N rankings over the date- and company-filtered event set

use super::filter::EventFilter;
use super::group::{percentage, rank, Distinct, DistinctSorted, Grouping, LastActivity};
use super::search::count_event_types;
use crate::event_store::EventStore;
use crate::types::{CompanyActivity, EndpointActivity, EventTypeCount, UserActivity};

fn filtered<'s>(
    store: &'s EventStore,
    start: &str,
    end: &str,
    companies: &[String],
) -> Vec<&'s crate::types::UsageEvent> {
    EventFilter::new()
        .date_bounds(start, end)
        .companies(companies)
        .apply(store)
}

/// Most frequent event types
pub fn top_events_by_volume(
    store: &EventStore,
    start: &str,
    end: &str,
    companies: &[String],
    limit: usize,
) -> Vec<EventTypeCount> {
    let events = filtered(store, start, end, companies);
    rank(
        count_event_types(&events),
        |r| r.count,
        |r| r.event_type.as_str(),
        limit,
    )
}

struct UserTally {
    count: usize,
    company_ids: Distinct,
    company_names: DistinctSorted,
    last_activity: LastActivity,
}

/// Users with the most events
pub fn most_active_users(
    store: &EventStore,
    start: &str,
    end: &str,
    companies: &[String],
    limit: usize,
) -> Vec<UserActivity> {
    let mut grouping: Grouping<UserTally> = Grouping::new();
    for event in filtered(store, start, end, companies) {
        if event.user.is_empty() {
            continue;
        }
        let tally = grouping.entry_with(&event.user, || UserTally {
            count: 0,
            company_ids: Distinct::default(),
            company_names: DistinctSorted::default(),
            last_activity: LastActivity::new(event.created_at),
        });
        tally.count += 1;
        tally.company_ids.insert(&event.company_id);
        tally
            .company_names
            .insert(store.resolve_company(&event.company_id));
        tally.last_activity.observe(event.created_at);
    }

    let records = grouping.into_records(|user, tally| UserActivity {
        user,
        event_count: tally.count,
        companies: tally.company_ids.len(),
        company_names: tally.company_names.into_vec(),
        last_activity: tally.last_activity.get(),
    });

    rank(records, |r| r.event_count, |r| r.user.as_str(), limit)
}

#[derive(Default)]
struct EndpointTally {
    count: usize,
    users: Distinct,
    company_ids: Distinct,
}

/// Endpoints with the most events
pub fn top_endpoints_by_usage(
    store: &EventStore,
    start: &str,
    end: &str,
    companies: &[String],
    limit: usize,
) -> Vec<EndpointActivity> {
    let events = filtered(store, start, end, companies);

    let mut grouping: Grouping<EndpointTally> = Grouping::new();
    for event in events.iter().filter(|e| !e.endpoint.is_empty()) {
        let tally = grouping.entry(&event.endpoint);
        tally.count += 1;
        tally.users.insert_non_empty(&event.user);
        tally.company_ids.insert(&event.company_id);
    }

    let total = events.len();
    let records = grouping.into_records(|endpoint, tally| EndpointActivity {
        endpoint,
        event_count: tally.count,
        user_count: tally.users.len(),
        company_count: tally.company_ids.len(),
        percentage: percentage(tally.count, total),
    });

    rank(records, |r| r.event_count, |r| r.endpoint.as_str(), limit)
}

struct CompanyTally {
    count: usize,
    users: Distinct,
    endpoints: Distinct,
    last_activity: LastActivity,
}

/// Companies, by resolved name, with the most events
pub fn top_active_companies_filtered(
    store: &EventStore,
    start: &str,
    end: &str,
    companies: &[String],
    limit: usize,
) -> Vec<CompanyActivity> {
    let mut grouping: Grouping<CompanyTally> = Grouping::new();
    for event in filtered(store, start, end, companies) {
        let tally = grouping.entry_with(store.resolve_company(&event.company_id), || CompanyTally {
            count: 0,
            users: Distinct::default(),
            endpoints: Distinct::default(),
            last_activity: LastActivity::new(event.created_at),
        });
        tally.count += 1;
        tally.users.insert_non_empty(&event.user);
        tally.endpoints.insert_non_empty(&event.endpoint);
        tally.last_activity.observe(event.created_at);
    }

    let records = grouping.into_records(|company_name, tally| CompanyActivity {
        company_name,
        event_count: tally.count,
        user_count: tally.users.len(),
        endpoint_count: tally.endpoints.len(),
        last_activity: tally.last_activity.get(),
    });

    rank(records, |r| r.event_count, |r| r.company_name.as_str(), limit)
}
