//! Filter primitives and the filter pipeline
//!
//! Stages always run in the same order: date range, companies, event types,
//! free-text search. Every stage keeps the store's `created_at` ordering.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset};
use rayon::prelude::*;
use tracing::debug;

use crate::event_store::EventStore;
use crate::types::{DateRange, UsageEvent};
use crate::utils::time::{end_of_day, parse_date_or_default, start_of_day};

/// Above this many candidates a stage filters in parallel
const PARALLEL_FILTER_THRESHOLD: usize = 10_000;

/// A resolved calendar window: midnight of `start` up to midnight after `end`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
}

impl DateWindow {
    /// Resolve date strings leniently; malformed dates become 0001-01-01
    pub fn from_bounds(start: &str, end: &str) -> Self {
        Self {
            start: start_of_day(parse_date_or_default(start)),
            end: end_of_day(parse_date_or_default(end)),
        }
    }

    pub fn from_range(range: &DateRange) -> Self {
        Self::from_bounds(&range.start, &range.end)
    }

    /// Strictly after `start` and strictly before the day after `end`
    ///
    /// An event at exactly midnight of the start date does not match.
    pub fn contains(&self, timestamp: &DateTime<FixedOffset>) -> bool {
        *timestamp > self.start && *timestamp < self.end
    }

    /// Like `contains` but with both bounds included
    pub fn contains_inclusive(&self, timestamp: &DateTime<FixedOffset>) -> bool {
        *timestamp >= self.start && *timestamp <= self.end
    }
}

/// Case-insensitive substring match against the searchable fields of an event
pub fn matches_search(event: &UsageEvent, company_name: &str, needle: &str) -> bool {
    [
        event.content.as_str(),
        event.attribute.as_str(),
        event.event_type.as_str(),
        company_name,
        event.user.as_str(),
        event.endpoint.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

/// Composable filter over the store's events
#[derive(Debug, Clone, Default)]
pub struct EventFilter<'a> {
    window: Option<DateWindow>,
    companies: HashSet<&'a str>,
    event_types: HashSet<&'a str>,
    search: Option<String>,
}

impl<'a> EventFilter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a date window, if one is given
    pub fn date_range(mut self, range: Option<&DateRange>) -> Self {
        self.window = range.map(DateWindow::from_range);
        self
    }

    /// Restrict to a date window only when both bounds are non-empty
    pub fn date_bounds(self, start: &str, end: &str) -> Self {
        let range = DateRange::from_bounds(start, end);
        self.date_range(range.as_ref())
    }

    /// Restrict to events whose resolved company name is in `companies`
    pub fn companies(mut self, companies: &'a [String]) -> Self {
        self.companies = companies.iter().map(String::as_str).collect();
        self
    }

    /// Restrict to events whose type is in `event_types`
    pub fn event_types(mut self, event_types: &'a [String]) -> Self {
        self.event_types = event_types.iter().map(String::as_str).collect();
        self
    }

    /// Free-text search; an empty query matches everything
    pub fn search(mut self, query: &str) -> Self {
        self.search = if query.is_empty() {
            None
        } else {
            Some(query.to_lowercase())
        };
        self
    }

    /// Run the pipeline against the store
    pub fn apply<'s>(&self, store: &'s EventStore) -> Vec<&'s UsageEvent> {
        let mut events: Vec<&'s UsageEvent> = store.events().iter().collect();
        debug!(count = events.len(), "filter: start");

        if let Some(window) = self.window {
            events = retain(events, |e| window.contains(&e.created_at));
            debug!(count = events.len(), "filter: after date range");
        }

        if !self.companies.is_empty() {
            events = retain(events, |e| {
                self.companies.contains(store.resolve_company(&e.company_id))
            });
            debug!(count = events.len(), "filter: after companies");
        }

        if !self.event_types.is_empty() {
            events = retain(events, |e| self.event_types.contains(e.event_type.as_str()));
            debug!(count = events.len(), "filter: after event types");
        }

        if let Some(needle) = &self.search {
            events = retain(events, |e| {
                matches_search(e, store.resolve_company(&e.company_id), needle)
            });
            debug!(count = events.len(), "filter: after search");
        }

        events
    }
}

/// Keep the events matching `predicate`, preserving order
fn retain<'s, F>(events: Vec<&'s UsageEvent>, predicate: F) -> Vec<&'s UsageEvent>
where
    F: Fn(&UsageEvent) -> bool + Sync,
{
    if events.len() > PARALLEL_FILTER_THRESHOLD {
        events.into_par_iter().filter(|e| predicate(e)).collect()
    } else {
        events.into_iter().filter(|e| predicate(e)).collect()
    }
}
