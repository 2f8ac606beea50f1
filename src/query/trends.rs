//! Time-bucketed trend queries

use std::collections::BTreeMap;

use super::filter::{DateWindow, EventFilter};
use crate::event_store::EventStore;
use crate::types::{
    DateRange, MultiCompanyPoint, MultiCompanyTimeSeriesResponse, Timeframe, TimeSeriesPoint,
    TimeSeriesResponse,
};
use crate::utils::time::bucket_key;

/// Label attached to every single-series point
const SERIES_LABEL: &str = "Action";

/// Event counts per time bucket
///
/// Only buckets that contain events are returned, ascending by key.
pub fn time_series(
    store: &EventStore,
    timeframe: Timeframe,
    start: &str,
    end: &str,
    companies: &[String],
    event_types: &[String],
) -> TimeSeriesResponse {
    let range = DateRange::new(start, end);
    let filtered = EventFilter::new()
        .date_range(Some(&range))
        .companies(companies)
        .event_types(event_types)
        .apply(store);

    let mut buckets: BTreeMap<String, usize> = BTreeMap::new();
    for event in &filtered {
        *buckets.entry(bucket_key(&event.created_at, timeframe)).or_default() += 1;
    }

    let data: Vec<TimeSeriesPoint> = buckets
        .into_iter()
        .map(|(timestamp, value)| TimeSeriesPoint {
            timestamp,
            value,
            event_type: SERIES_LABEL.to_string(),
        })
        .collect();

    TimeSeriesResponse {
        total_points: data.len(),
        data,
        timeframe,
    }
}

/// Event counts per time bucket and company name
///
/// The window includes both of its ends. Every company in the index appears
/// in every returned bucket, with 0 when it had no events there; buckets
/// without any events are not synthesized.
pub fn multi_company_time_series(
    store: &EventStore,
    timeframe: Timeframe,
    start: &str,
    end: &str,
    companies: &[String],
    event_types: &[String],
) -> MultiCompanyTimeSeriesResponse {
    let window = DateWindow::from_bounds(start, end);
    let filtered = EventFilter::new()
        .companies(companies)
        .event_types(event_types)
        .apply(store);

    let mut buckets: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
    for event in filtered
        .iter()
        .filter(|e| window.contains_inclusive(&e.created_at))
    {
        let company = store.resolve_company(&event.company_id);
        *buckets
            .entry(bucket_key(&event.created_at, timeframe))
            .or_default()
            .entry(company.to_string())
            .or_default() += 1;
    }

    let known = store.company_names();
    let data: Vec<MultiCompanyPoint> = buckets
        .into_iter()
        .map(|(timestamp, mut counts)| {
            for name in &known {
                counts.entry(name.clone()).or_insert(0);
            }
            MultiCompanyPoint { timestamp, counts }
        })
        .collect();

    MultiCompanyTimeSeriesResponse {
        total_points: data.len(),
        data,
        timeframe,
    }
}
