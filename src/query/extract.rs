//! Read-time derivation of user and endpoint from event content
//!
//! These heuristics are independent of the load-time ones in
//! `event_store::parse` and have their own placeholders; search results are
//! enriched with these, overwriting the load-time values.

use crate::event_store::EventStore;
use crate::types::{UsageEvent, NO_ENDPOINT, UNKNOWN_USER};

/// Labels that precede a user identifier, in priority order
const USER_MARKERS: &[&str] = &["user_email:", "user_id:", "email:", "user:"];

/// Fragments that mark the start of an endpoint, in priority order
const ENDPOINT_MARKERS: &[&str] = &["/v1/", "/api/", "/work-orders", "/chat/", "/completions"];

/// Extract a user identifier from content
///
/// Looks for a labelled value first (`user_email:alice@x.com`), then for any
/// whitespace-delimited token containing `@`.
pub fn extract_user_from_content(content: &str) -> String {
    let lowered = content.to_ascii_lowercase();

    for marker in USER_MARKERS {
        if let Some(idx) = lowered.find(marker) {
            let rest = &content[idx + marker.len()..];
            let value = rest.split(' ').next().unwrap_or_default().trim();
            if !value.is_empty() {
                return value.to_string();
            }
        }
    }

    content
        .split_whitespace()
        .find(|token| token.contains('@'))
        .unwrap_or(UNKNOWN_USER)
        .to_string()
}

/// Extract an API endpoint from content
///
/// Looks for a known path fragment and takes it up to the next whitespace,
/// then falls back to the first token starting with `/`.
pub fn extract_endpoint_from_content(content: &str) -> String {
    let lowered = content.to_ascii_lowercase();

    for marker in ENDPOINT_MARKERS {
        if let Some(idx) = lowered.find(marker) {
            let rest = &content[idx..];
            let end = rest.find([' ', '\n', '\t']).unwrap_or(rest.len());
            let endpoint = rest[..end].trim();
            if !endpoint.is_empty() {
                return endpoint.to_string();
            }
        }
    }

    content
        .split_whitespace()
        .find(|token| token.starts_with('/') && token.len() > 1)
        .unwrap_or(NO_ENDPOINT)
        .to_string()
}

/// Copy events for output with company name, user and endpoint filled in
pub fn enhance_events(store: &EventStore, events: &[&UsageEvent]) -> Vec<UsageEvent> {
    events
        .iter()
        .map(|event| UsageEvent {
            company_name: store.resolve_company(&event.company_id).to_string(),
            user: extract_user_from_content(&event.content),
            endpoint: extract_endpoint_from_content(&event.content),
            ..(*event).clone()
        })
        .collect()
}
